//! Convenience re-exports for embedders.
//!
//! ```
//! use circulate::prelude::*;
//! ```

pub use crate::{
    Book, BookId, BorrowMarker, CirculationConfig, CirculationError, Error, HolderId, LockManager,
    MemoryGateway, Reservation, ReservationCoordinator, ReservationId, Result, Retrying,
    RetryPolicy, Statement, StorageGateway, StoreError,
};
