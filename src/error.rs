//! Error taxonomy.
//!
//! Every variant except [`Error::Io`] is a configuration error: it is
//! raised before any search starts and is never produced mid-run.

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("at least 2 cities are required, got {count}")]
    TooFewCities { count: usize },

    #[error("invalid temperature: {0}")]
    InvalidTemperature(String),

    #[error("invalid cooling rate: {0}")]
    InvalidCoolingRate(String),

    #[error("invalid neighbor move: {0}")]
    InvalidNeighbor(String),

    #[error("run count must be at least 1, got {0}")]
    InvalidRunCount(usize),

    #[error("start city {start} out of range for {len} cities")]
    InvalidStartCity { start: usize, len: usize },

    #[error("invalid tour: {0}")]
    InvalidTour(String),

    #[error("size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("coordinate {index} is not finite")]
    InvalidCoordinate { index: usize },

    #[error("invalid distance matrix: {0}")]
    InvalidMatrix(String),

    #[error("thread pool: {0}")]
    ThreadPool(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_tour(message: impl Into<String>) -> Self {
        Self::InvalidTour(message.into())
    }

    pub fn invalid_matrix(message: impl Into<String>) -> Self {
        Self::InvalidMatrix(message.into())
    }

    /// Returns `true` for errors raised while validating inputs or
    /// configuration.
    pub fn is_config(&self) -> bool {
        !matches!(self, Error::Io(_) | Error::ThreadPool(_))
    }
}

/// Rejects instances that admit no meaningful tour.
pub(crate) fn ensure_cities(count: usize) -> Result<()> {
    if count < 2 {
        return Err(Error::TooFewCities { count });
    }
    Ok(())
}
