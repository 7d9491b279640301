//! Unified error type for embedders.
//!
//! Library crates keep the two-level taxonomy (business vs infrastructure);
//! this module flattens both into one enum for callers that do not care
//! which layer failed, while keeping the retryable/contention split intact.

use circulate_core::{CirculationError, StoreError};
use thiserror::Error;

/// All circulate errors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum Error {
    /// A circulation operation returned a negative business outcome.
    #[error(transparent)]
    Circulation(#[from] CirculationError),

    /// The storage gateway failed after retries.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for circulate operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Expected negative outcome under concurrent load; pick another book
    /// or try later.
    pub fn is_contention(&self) -> bool {
        matches!(self, Error::Circulation(e) if e.is_contention())
    }

    /// Whether the same call can reasonably be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Circulation(e) => e.is_retryable(),
            Error::Store(e) => e.is_retryable(),
        }
    }
}
