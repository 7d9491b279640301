//! Error taxonomy for the circulation system
//!
//! Two levels, never mixed:
//! - [`StoreError`]: infrastructure failures from the storage gateway
//!   (timeouts, unreachable replicas). Retryable a bounded number of times
//!   by the gateway layer, never swallowed as a business outcome.
//! - [`CirculationError`]: business outcomes of circulation operations.
//!   Contention variants are expected and frequent under load; they are
//!   normal negative results, not errors to log or retry automatically.
//!
//! Callers branch on variants, never on message text.

use crate::types::{BookId, ReservationId};
use thiserror::Error;

/// Infrastructure failure at the storage gateway boundary.
///
/// Distinct from "condition not met": a conditional insert losing its race
/// reports applied=false, not a StoreError.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    /// A read or write did not complete in time. The write may or may not
    /// have been applied; callers must not assume either.
    #[error("store timeout during {op}")]
    Timeout {
        /// Operation that timed out (statement name, not free text to parse)
        op: &'static str,
    },

    /// Not enough replicas were reachable to satisfy the operation.
    #[error("store unavailable: {reason}")]
    Unavailable {
        /// What the gateway observed
        reason: String,
    },

    /// Any other backend failure (protocol error, invalid schema, ...).
    #[error("store backend error: {message}")]
    Backend {
        /// Backend-reported message
        message: String,
    },
}

impl StoreError {
    /// Whether a retry with backoff can reasonably succeed.
    ///
    /// Timeouts and unavailability are transient; backend errors are not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Timeout { .. } | StoreError::Unavailable { .. })
    }
}

/// Result type for storage gateway operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Outcome of a circulation operation.
///
/// Canonical codes (frozen, used in wire/CLI output):
///
/// | Code | Meaning |
/// |------|---------|
/// | InvalidBookId | Input not parseable as a book identifier |
/// | AlreadyBorrowed | Borrow marker present, no lock attempted |
/// | BookLocked | Conditional lock insert lost the race |
/// | BookUnavailable | Lock ownership re-read did not confirm the caller |
/// | ReservationNotFound | No matching row in the by-holder view |
/// | Store | Infrastructure failure, retries exhausted |
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CirculationError {
    /// Malformed book identifier; failed before any store round-trip.
    #[error("invalid book id: {input:?}")]
    InvalidBookId {
        /// The rejected input
        input: String,
    },

    /// The borrow-marker pre-check found the book already checked out.
    #[error("book {book_id} is already borrowed")]
    AlreadyBorrowed {
        /// The contended book
        book_id: BookId,
    },

    /// Another actor holds the short-lived lock right now.
    #[error("book {book_id} is currently locked")]
    BookLocked {
        /// The contended book
        book_id: BookId,
    },

    /// The post-acquire ownership re-read did not come back as the caller.
    #[error("book {book_id} is not available")]
    BookUnavailable {
        /// The contended book
        book_id: BookId,
    },

    /// No reservation under (holder, reservation_id); wrong id, wrong
    /// holder, or already returned.
    #[error("reservation {reservation_id} not found")]
    ReservationNotFound {
        /// The id that failed to resolve
        reservation_id: ReservationId,
    },

    /// Infrastructure failure surfaced after the gateway's retries ran out.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CirculationError {
    /// Canonical code for wire/CLI output.
    pub fn code(&self) -> &'static str {
        match self {
            CirculationError::InvalidBookId { .. } => "InvalidBookId",
            CirculationError::AlreadyBorrowed { .. } => "AlreadyBorrowed",
            CirculationError::BookLocked { .. } => "BookLocked",
            CirculationError::BookUnavailable { .. } => "BookUnavailable",
            CirculationError::ReservationNotFound { .. } => "ReservationNotFound",
            CirculationError::Store(_) => "Store",
        }
    }

    /// Expected negative outcome under concurrent load.
    ///
    /// Contention is never auto-retried by the core; the caller decides
    /// (e.g. pick a different book).
    pub fn is_contention(&self) -> bool {
        matches!(
            self,
            CirculationError::AlreadyBorrowed { .. }
                | CirculationError::BookLocked { .. }
                | CirculationError::BookUnavailable { .. }
        )
    }

    /// Whether retrying the same call can reasonably succeed.
    ///
    /// Only exhausted-infrastructure failures qualify. Note the ambiguity
    /// documented on borrow: a retry after a timeout can come back as
    /// `AlreadyBorrowed` because the first attempt actually applied.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CirculationError::Store(e) if e.is_retryable())
    }
}

/// Result type for circulation operations.
pub type CirculationResult<T> = std::result::Result<T, CirculationError>;
