//! Point ingestion and tour persistence.
//!
//! Input is delimited text with one `id,x,y` record per point. Records whose
//! fields do not parse, a header line included, are skipped. The point with
//! id 0 becomes the pool's start.

use crate::error::Result;
use crate::geometry::{Point, PointId};
use crate::pool::Pool;
use crate::solution::Solution;
use crate::tour::Tour;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// How a tour is written out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TourFormat {
    /// `Path` header, one id per record
    #[default]
    Ids,
    /// `id,x,y` header, one point per record
    Coordinates,
}

pub fn read_pool<P: AsRef<Path>>(path: P) -> Result<Pool> {
    let file = File::open(path.as_ref())?;
    let pool = read_pool_from(file)?;
    log::info!("Loaded {} points from {:?}", pool.len(), path.as_ref());
    Ok(pool)
}

pub fn read_pool_from<R: Read>(reader: R) -> Result<Pool> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut pool = Pool::new();
    let mut skipped = 0usize;
    for record in reader.records() {
        let record = record?;
        match parse_point(&record) {
            Some(point) => {
                pool.add(point)?;
                if point.id == 0 {
                    pool.set_start(0)?;
                }
            }
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        log::debug!("Skipped {} malformed records", skipped);
    }
    Ok(pool)
}

fn parse_point(record: &csv::StringRecord) -> Option<Point> {
    let id = record.get(0)?.parse::<PointId>().ok()?;
    let x = record.get(1)?.parse::<f64>().ok()?;
    let y = record.get(2)?.parse::<f64>().ok()?;
    Some(Point::new(id, x, y))
}

pub fn write_tour<P: AsRef<Path>>(path: P, tour: &Tour, format: TourFormat) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_tour_to(file, tour, format)?;
    log::info!("Tour written to {:?}", path.as_ref());
    Ok(())
}

/// Write every point in tour order, then the start again so the closing
/// edge is explicit.
pub fn write_tour_to<W: Write>(writer: W, tour: &Tour, format: TourFormat) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    let closed = tour.points().iter().chain(std::iter::once(&tour.points()[0]));

    match format {
        TourFormat::Ids => {
            writer.write_record(["Path"])?;
            for point in closed {
                writer.serialize(point.id)?;
            }
        }
        TourFormat::Coordinates => {
            writer.write_record(["id", "x", "y"])?;
            for point in closed {
                writer.serialize(point)?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}

/// Pretty JSON summary of a solution
pub fn write_summary<P: AsRef<Path>>(path: P, solution: &Solution) -> Result<()> {
    let json = serde_json::to_string_pretty(solution)?;
    std::fs::write(path.as_ref(), json)?;
    log::info!("Summary written to {:?}", path.as_ref());
    Ok(())
}
