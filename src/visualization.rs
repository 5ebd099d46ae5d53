//! Visualization utilities for tours, spanning trees and triangulations.
//!
//! Generates SVG documents on a canvas sized to the data's bounding box and
//! rasterises them with `resvg`. Source coordinates have their origin at the
//! bottom-left, so the Y axis is flipped.

use crate::error::{Error, Result};
use crate::geometry::{Edge, Point};
use crate::tour::Tour;
use crate::triangulation::Triangulation;
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{self, TreeParsing};
use resvg::FitTo;
use std::fmt::Write as _;
use std::path::Path;

/// SVG visualization generator
#[derive(Debug, Clone)]
pub struct Visualizer {
    /// Pixels per coordinate unit
    pub scale: f64,
    /// Blank border around the data, in pixels
    pub margin: f64,
    /// Point radius
    pub point_radius: f64,
    /// Stroke width of tour and tree lines
    pub line_width: f64,
}

impl Default for Visualizer {
    fn default() -> Self {
        Visualizer {
            scale: 1.0,
            margin: 10.0,
            point_radius: 2.0,
            line_width: 2.0,
        }
    }
}

/// Bounding box plus the transform into canvas pixels.
struct Canvas {
    min_x: f64,
    min_y: f64,
    width: f64,
    height: f64,
    scale: f64,
    margin: f64,
}

impl Canvas {
    fn fit<'a, I: IntoIterator<Item = &'a Point>>(points: I, scale: f64, margin: f64) -> Self {
        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for p in points {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }
        if !min_x.is_finite() {
            (min_x, max_x, min_y, max_y) = (0.0, 0.0, 0.0, 0.0);
        }

        Canvas {
            min_x,
            min_y,
            width: ((max_x - min_x) * scale + 2.0 * margin).ceil().max(1.0),
            height: ((max_y - min_y) * scale + 2.0 * margin).ceil().max(1.0),
            scale,
            margin,
        }
    }

    fn tx(&self, x: f64) -> f64 {
        self.margin + (x - self.min_x) * self.scale
    }

    fn ty(&self, y: f64) -> f64 {
        self.height - self.margin - (y - self.min_y) * self.scale
    }

    fn open(&self) -> String {
        format!(
            r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
<rect width="100%" height="100%" fill="#ffffff"/>
"##,
            w = self.width,
            h = self.height
        )
    }

    fn line(&self, svg: &mut String, a: &Point, b: &Point, class: &str) {
        let _ = writeln!(
            svg,
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" class="{}"/>"#,
            self.tx(a.x),
            self.ty(a.y),
            self.tx(b.x),
            self.ty(b.y),
            class
        );
    }
}

impl Visualizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scale(scale: f64) -> Self {
        Visualizer { scale, ..Self::default() }
    }

    fn style(&self) -> String {
        format!(
            r##"<style>
    .point {{ fill: #4d4d4d; }}
    .start {{ fill: #2c3e50; }}
    .tour {{ stroke: #ff0000; stroke-width: {lw}; fill: none; }}
    .edge {{ stroke: #000000; stroke-width: {lw}; }}
    .mesh {{ stroke: #000000; stroke-width: 1; }}
</style>
"##,
            lw = self.line_width
        )
    }

    fn points(&self, svg: &mut String, canvas: &Canvas, points: &[Point]) {
        for p in points {
            let _ = writeln!(
                svg,
                r#"<circle cx="{:.2}" cy="{:.2}" r="{}" class="point"/>"#,
                canvas.tx(p.x),
                canvas.ty(p.y),
                self.point_radius
            );
        }
    }

    /// Points plus the closed tour polyline back to the start.
    pub fn tour_svg(&self, tour: &Tour) -> String {
        let canvas = Canvas::fit(tour.points(), self.scale, self.margin);
        let mut svg = canvas.open();
        svg.push_str(&self.style());
        self.points(&mut svg, &canvas, tour.points());

        let start = tour.start();
        let mut path = String::new();
        for p in tour.points().iter().chain(std::iter::once(&start)) {
            let _ = write!(path, "{:.2},{:.2} ", canvas.tx(p.x), canvas.ty(p.y));
        }
        let _ = writeln!(svg, r#"<polyline points="{}" class="tour"/>"#, path.trim_end());
        let _ = writeln!(
            svg,
            r#"<circle cx="{:.2}" cy="{:.2}" r="{}" class="start"/>"#,
            canvas.tx(start.x),
            canvas.ty(start.y),
            self.point_radius * 2.0
        );
        svg.push_str("</svg>\n");
        svg
    }

    /// An edge set, typically the spanning tree.
    pub fn edges_svg(&self, edges: &[Edge]) -> String {
        let canvas = Canvas::fit(edges.iter().flat_map(|e| [&e.fst, &e.snd]), self.scale, self.margin);
        let mut svg = canvas.open();
        svg.push_str(&self.style());
        for edge in edges {
            canvas.line(&mut svg, &edge.fst, &edge.snd, "edge");
        }
        svg.push_str("</svg>\n");
        svg
    }

    /// Every triangulation edge once.
    pub fn triangulation_svg(&self, points: &[Point], triangulation: &Triangulation) -> String {
        let canvas = Canvas::fit(points, self.scale, self.margin);
        let mut svg = canvas.open();
        svg.push_str(&self.style());
        for (from, to) in triangulation.edges() {
            canvas.line(&mut svg, &points[from], &points[to], "mesh");
        }
        svg.push_str("</svg>\n");
        svg
    }

    pub fn save_svg<P: AsRef<Path>>(&self, svg: &str, path: P) -> Result<()> {
        std::fs::write(path.as_ref(), svg)?;
        log::info!("SVG saved to {:?}", path.as_ref());
        Ok(())
    }

    /// Rasterise an SVG document at its own size.
    pub fn save_png<P: AsRef<Path>>(&self, svg: &str, path: P) -> Result<()> {
        let tree = usvg::Tree::from_str(svg, &usvg::Options::default())
            .map_err(|e| Error::render(format!("usvg parse error: {}", e)))?;
        let (width, height) = (tree.size.width().ceil() as u32, tree.size.height().ceil() as u32);
        let mut pixmap = Pixmap::new(width.max(1), height.max(1))
            .ok_or_else(|| Error::render("failed to create pixmap"))?;

        resvg::render(&tree, FitTo::Original, Transform::default(), pixmap.as_mut())
            .ok_or_else(|| Error::render("resvg render failed"))?;
        pixmap
            .save_png(path.as_ref())
            .map_err(|e| Error::render(format!("save_png failed: {}", e)))?;
        log::info!("PNG saved to {:?}", path.as_ref());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_tour() -> Tour {
        Tour::new(vec![Point::new(0, 10.0, 10.0), Point::new(1, 30.0, 10.0), Point::new(2, 10.0, 50.0)]).unwrap()
    }

    #[test]
    fn test_canvas_fits_bounding_box() {
        let svg = Visualizer::with_scale(2.0).tour_svg(&triangle_tour());
        // 20 x 40 units at scale 2 plus a 10px margin on each side
        assert!(svg.contains(r#"width="60" height="100""#));
    }

    #[test]
    fn test_y_axis_is_inverted() {
        let svg = Visualizer::new().tour_svg(&triangle_tour());
        // lowest point sits at the bottom margin, highest at the top
        assert!(svg.contains(r#"<polyline points="10.00,50.00 30.00,50.00 10.00,10.00 10.00,50.00" class="tour"/>"#));
    }

    #[test]
    fn test_tour_svg_draws_every_point() {
        let svg = Visualizer::new().tour_svg(&triangle_tour());
        assert_eq!(svg.matches(r#"class="point""#).count(), 3);
        assert_eq!(svg.matches(r#"class="start""#).count(), 1);
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_edges_svg() {
        let tour = triangle_tour();
        let p = tour.points();
        let svg = Visualizer::new().edges_svg(&[Edge::new(p[0], p[1]), Edge::new(p[0], p[2])]);
        assert_eq!(svg.matches(r#"class="edge""#).count(), 2);
        assert!(Visualizer::new().edges_svg(&[]).contains(r#"width="20" height="20""#));
    }

    #[test]
    fn test_save_png_rasterises_at_svg_size() {
        let viz = Visualizer::with_scale(2.0);
        let path = std::env::temp_dir().join(format!("mst_tsp_tour_{}.png", std::process::id()));
        viz.save_png(&viz.tour_svg(&triangle_tour()), &path).unwrap();

        let pixmap = Pixmap::load_png(&path).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (60, 100));
        // white background was painted, not left transparent
        assert!(pixmap.pixels().iter().all(|p| p.alpha() == 255));
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(viz.save_png("not svg", &path), Err(Error::Render(_))));
    }

    #[test]
    fn test_triangulation_svg_draws_each_edge_once() {
        use crate::triangulation::{DelaunayTriangulator, Triangulator};
        let points = vec![
            Point::new(0, 0.0, 0.0),
            Point::new(1, 3.0, 0.0),
            Point::new(2, 3.0, 1.0),
            Point::new(3, 0.0, 1.2),
        ];
        let triangulation = DelaunayTriangulator::new().triangulate(&points).unwrap();
        let svg = Visualizer::with_scale(10.0).triangulation_svg(&points, &triangulation);
        assert_eq!(svg.matches(r#"class="mesh""#).count(), 5);
    }
}
