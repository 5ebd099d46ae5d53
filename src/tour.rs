//! Tour representation and segment reversal.
//!
//! A tour is an ordered sequence of distinct points read as a closed cycle:
//! the last point connects back to `points[0]`, the start. Optimizers never
//! move the start and never change the length of a tour.

use crate::error::{Error, Result};
use crate::geometry::{biased_distance, Point, PointId};
use crate::pool::Pool;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tour {
    points: Vec<Point>,
}

impl Tour {
    /// Create a tour from a point sequence. `points[0]` becomes the start.
    pub fn new(points: Vec<Point>) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::EmptyPool);
        }
        let mut seen = HashSet::with_capacity(points.len());
        for p in &points {
            if !seen.insert(p.id) {
                return Err(Error::DuplicatePoint(p.id));
            }
        }
        Ok(Tour { points })
    }

    /// The pool's start followed by every other point in insertion order.
    pub fn from_pool(pool: &Pool) -> Result<Self> {
        let start = pool.start()?;
        let mut points = Vec::with_capacity(pool.len());
        points.push(start);
        points.extend(pool.points().iter().filter(|p| p.id != start.id));
        Ok(Tour { points })
    }

    pub fn start(&self) -> Point {
        self.points[0]
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn ids(&self) -> Vec<PointId> {
        self.points.iter().map(|p| p.id).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; a tour holds at least its start.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn contains(&self, id: PointId) -> bool {
        self.points.iter().any(|p| p.id == id)
    }

    /// Whether the tour visits every pool point exactly once, starting at the
    /// pool's start.
    pub fn is_complete(&self, pool: &Pool) -> bool {
        if self.points.len() != pool.len() {
            return false;
        }
        match pool.start() {
            Ok(start) if start.id == self.points[0].id => {}
            _ => return false,
        }
        self.points.iter().all(|p| pool.contains(p.id))
    }

    /// Closed-cycle length under the biased metric. The edge leaving
    /// position `i` is scored with step `i + 1`.
    pub fn distance(&self) -> f64 {
        let n = self.points.len();
        (0..n)
            .map(|i| biased_distance(&self.points[i], &self.points[(i + 1) % n], i + 1))
            .sum()
    }

    /// Reverse `points[i..=k]` in place.
    ///
    /// Requires `0 < i <= k < len - 1`: neither the start nor the last
    /// position may move.
    pub fn reverse_segment(&mut self, i: usize, k: usize) -> Result<()> {
        if i == 0 || i > k || k >= self.points.len() - 1 {
            return Err(Error::InvalidRange { i, k, len: self.points.len() });
        }
        self.points[i..=k].reverse();
        Ok(())
    }

    /// Reverse `points[i..=k]` where `k` may be the last position.
    ///
    /// Equivalent to [`Tour::reverse_segment`] on the tour with its start
    /// repeated at the end, which is how the annealer sees the cycle.
    pub(crate) fn reverse_span(&mut self, i: usize, k: usize) -> Result<()> {
        if i == 0 || i > k || k >= self.points.len() {
            return Err(Error::InvalidRange { i, k, len: self.points.len() });
        }
        self.points[i..=k].reverse();
        Ok(())
    }

    /// Change in [`Tour::distance`] that reversing `points[i..=k]` would
    /// cause. Only edges leaving positions `i - 1 ..= k` are affected, so the
    /// cost is linear in the segment length. Returns 0.0 for a range outside
    /// `0 < i <= k < len`.
    pub fn reversal_delta(&self, i: usize, k: usize) -> f64 {
        let n = self.points.len();
        if i == 0 || i > k || k >= n {
            return 0.0;
        }
        let after_at = |q: usize| {
            if q >= i && q <= k {
                &self.points[i + k - q]
            } else {
                &self.points[q]
            }
        };

        let mut before = 0.0;
        let mut after = 0.0;
        for p in i - 1..=k {
            let next = (p + 1) % n;
            before += biased_distance(&self.points[p], &self.points[next], p + 1);
            after += biased_distance(after_at(p), after_at(next), p + 1);
        }
        after - before
    }
}

impl std::fmt::Display for Tour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<String> = self.points.iter().map(|p| p.id.to_string()).collect();
        write!(f, "[{}] -> {}", ids.join(", "), self.points[0].id)
    }
}
