//! Error type shared by every stage of the solver.

use crate::geometry::PointId;
use thiserror::Error as ThisError;

/// What a failed lookup was searching for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Id(PointId),
    Index(usize),
}

impl std::fmt::Display for Lookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lookup::Id(id) => write!(f, "id {}", id),
            Lookup::Index(index) => write!(f, "index {}", index),
        }
    }
}

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("operation requires at least one point, but the pool is empty")]
    EmptyPool,
    #[error("no point with {0}")]
    NotFound(Lookup),
    #[error("point id {0} is already present")]
    DuplicatePoint(PointId),
    #[error("invalid segment [{i}, {k}] for a tour of {len} points")]
    InvalidRange { i: usize, k: usize, len: usize },
    #[error("triangulation failed: {0}")]
    Triangulation(String),
    #[error("malformed spanning tree: {0}")]
    GraphConsistency(String),
    #[error("render failed: {0}")]
    Render(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn id_not_found(id: PointId) -> Self {
        Self::NotFound(Lookup::Id(id))
    }

    pub fn index_not_found(index: usize) -> Self {
        Self::NotFound(Lookup::Index(index))
    }

    pub fn triangulation(message: impl Into<String>) -> Self {
        Self::Triangulation(message.into())
    }

    pub fn graph_consistency(message: impl Into<String>) -> Self {
        Self::GraphConsistency(message.into())
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self::Render(message.into())
    }
}
