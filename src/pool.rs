//! The unordered point container tours are built from.

use crate::error::{Error, Result};
use crate::geometry::{distance, Point, PointId};
use ordered_float::OrderedFloat;
use std::collections::HashSet;

/// A set of distinct points plus a designated start point
#[derive(Debug, Clone, Default)]
pub struct Pool {
    points: Vec<Point>,
    ids: HashSet<PointId>,
    start: Option<PointId>,
}

impl Pool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pool from points in insertion order. The first point is the
    /// start unless one with id 0 is present.
    pub fn from_points<I: IntoIterator<Item = Point>>(points: I) -> Result<Self> {
        let mut pool = Pool::new();
        for point in points {
            pool.add(point)?;
            if point.id == 0 {
                pool.set_start(0)?;
            }
        }
        Ok(pool)
    }

    pub fn add(&mut self, point: Point) -> Result<()> {
        if !self.ids.insert(point.id) {
            return Err(Error::DuplicatePoint(point.id));
        }
        self.points.push(point);
        Ok(())
    }

    pub fn set_start(&mut self, id: PointId) -> Result<()> {
        if !self.ids.contains(&id) {
            return Err(Error::id_not_found(id));
        }
        self.start = Some(id);
        Ok(())
    }

    /// The designated start, or the first inserted point when none was set.
    pub fn start(&self) -> Result<Point> {
        match self.start {
            Some(id) => self.get(id).ok_or_else(|| Error::id_not_found(id)),
            None => self.points.first().copied().ok_or(Error::EmptyPool),
        }
    }

    pub fn get(&self, id: PointId) -> Option<Point> {
        if !self.ids.contains(&id) {
            return None;
        }
        self.points.iter().find(|p| p.id == id).copied()
    }

    /// Position of `id` in insertion order
    pub fn index_of(&self, id: PointId) -> Option<usize> {
        self.points.iter().position(|p| p.id == id)
    }

    pub fn remove_at(&mut self, index: usize) -> Result<Point> {
        if index >= self.points.len() {
            return Err(Error::index_not_found(index));
        }
        let point = self.points.remove(index);
        self.ids.remove(&point.id);
        Ok(point)
    }

    pub fn remove_by_id(&mut self, id: PointId) -> Result<Point> {
        let index = self.index_of(id).ok_or_else(|| Error::id_not_found(id))?;
        self.remove_at(index)
    }

    /// Closest point to `target` by plain Euclidean distance; ties go to the
    /// earliest inserted point.
    pub fn nearest(&self, target: &Point) -> Result<Point> {
        // min_by_key keeps the first of equal minima
        self.points
            .iter()
            .min_by_key(|p| OrderedFloat(distance(target, p)))
            .copied()
            .ok_or(Error::EmptyPool)
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn contains(&self, id: PointId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
