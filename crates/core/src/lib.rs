//! Core types for the circulation system
//!
//! This crate defines the vocabulary shared by every layer:
//! - Identifier newtypes ([`BookId`], [`ReservationId`], [`HolderId`])
//! - Domain rows ([`Book`], [`LockRow`], [`Reservation`], [`BorrowMarker`])
//! - The two-level error taxonomy ([`StoreError`], [`CirculationError`])
//! - Tunable durations ([`CirculationConfig`], [`RetryPolicy`])

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod types;

pub use config::{CirculationConfig, RetryPolicy};
pub use error::{CirculationError, CirculationResult, StoreError, StoreResult};
pub use types::{Book, BookId, BorrowMarker, HolderId, LockRow, Reservation, ReservationId};
