//! # Circulate
//!
//! Distributed reservation-locking core for shared-library circulation.
//!
//! Many uncoordinated actors borrow, renew and return books against a
//! replicated key-value store that offers only per-partition conditional
//! writes and per-row TTL — no cross-partition transactions, no server-side
//! locks. Circulate turns those two primitives into an exclusive-borrowing
//! protocol:
//!
//! 1. a short-lived, TTL-bounded lock is claimed via CAS;
//! 2. a won claim is converted into a durable reservation materialized in
//!    three denormalized views;
//! 3. renewal and return locate the record through the by-holder view and
//!    mutate the others.
//!
//! ## Quick start
//!
//! ```
//! use circulate::prelude::*;
//! use std::sync::Arc;
//!
//! let store = Arc::new(MemoryGateway::new());
//! let library = ReservationCoordinator::new(store, CirculationConfig::new());
//!
//! let book_id = BookId::new();
//! let alice: HolderId = "alice".into();
//!
//! let reservation = library.borrow(book_id, &alice).unwrap();
//! match library.borrow(book_id, &"bob".into()) {
//!     Err(e) if e.is_contention() => {} // expected under contention
//!     other => panic!("unexpected: {:?}", other),
//! }
//! library.return_book(reservation.reservation_id, &alice).unwrap();
//! ```
//!
//! The gateway is injected at construction; production deployments swap
//! [`MemoryGateway`] for a driver against the real cluster, optionally
//! wrapped in [`Retrying`] for bounded backoff over transient failures.

#![warn(missing_docs)]

mod error;

pub mod prelude;

pub use error::{Error, Result};

// Re-export the protocol surface
pub use circulate_circulation::{LockManager, ReservationCoordinator};
pub use circulate_core::{
    Book, BookId, BorrowMarker, CirculationConfig, CirculationError, HolderId, LockRow,
    Reservation, ReservationId, RetryPolicy, StoreError,
};
pub use circulate_store::{MemoryGateway, Retrying, Statement, StorageGateway};
