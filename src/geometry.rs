//! Geometry primitives: points, edges and the two distance metrics.
//!
//! All tour scoring goes through [`biased_distance`]; the plain
//! [`distance`] is used for nearest-point queries and spanning-tree weights.

use serde::{Deserialize, Serialize};

/// Identity of a point. Not necessarily contiguous or ordered.
pub type PointId = i64;

/// Penalty applied by [`biased_distance`] on every tenth step.
pub const BIAS_FACTOR: f64 = 1.1;

/// Step period at which the penalty may apply.
pub const BIAS_PERIOD: usize = 10;

/// An immutable point in the plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Identity used for every lookup and equality test in the graph logic
    pub id: PointId,
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point {
    pub fn new(id: PointId, x: f64, y: f64) -> Self {
        Point { id, x, y }
    }

    /// Polar angle of the point seen from the coordinate origin.
    #[inline]
    pub fn origin_angle(&self) -> f64 {
        self.y.atan2(self.x)
    }
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: &Point, b: &Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Euclidean distance, multiplied by [`BIAS_FACTOR`] when `step` is a
/// multiple of [`BIAS_PERIOD`] and `from.id` is not prime according to
/// [`is_prime`].
#[inline]
pub fn biased_distance(from: &Point, to: &Point, step: usize) -> f64 {
    let d = distance(from, to);
    if step % BIAS_PERIOD == 0 && !is_prime(from.id) {
        d * BIAS_FACTOR
    } else {
        d
    }
}

/// Trial-division primality test with an exclusive `floor(sqrt(n))` bound.
///
/// The bound is exclusive, so squares of primes (4, 9, 25, ...) are reported
/// prime, as are 0, 1 and negative ids. Scores depend on this exact
/// classification.
pub fn is_prime(n: PointId) -> bool {
    // `as` saturates NaN (negative n) to 0, leaving the loop empty
    let limit = (n as f64).sqrt().floor() as PointId;
    let mut i = 2;
    while i < limit {
        if n % i == 0 {
            return false;
        }
        i += 1;
    }
    true
}

/// An unordered pair of points
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Edge {
    pub fst: Point,
    pub snd: Point,
}

impl Edge {
    pub fn new(fst: Point, snd: Point) -> Self {
        Edge { fst, snd }
    }

    /// Euclidean length of the edge
    #[inline]
    pub fn distance(&self) -> f64 {
        distance(&self.fst, &self.snd)
    }

    /// Whether `id` is one of the endpoints
    pub fn touches(&self, id: PointId) -> bool {
        self.fst.id == id || self.snd.id == id
    }

    /// The endpoint opposite to `id`, if `id` is an endpoint
    pub fn other(&self, id: PointId) -> Option<Point> {
        if self.fst.id == id {
            Some(self.snd)
        } else if self.snd.id == id {
            Some(self.fst)
        } else {
            None
        }
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        (self.fst.id == other.fst.id && self.snd.id == other.snd.id)
            || (self.fst.id == other.snd.id && self.snd.id == other.fst.id)
    }
}
