//! The storage gateway contract
//!
//! Everything the circulation core needs from the replicated store, and
//! nothing more. The store offers no exclusivity or transaction guarantee
//! beyond two primitives:
//!
//! - **Per-partition CAS**: a conditional insert evaluated atomically within
//!   one partition, reporting applied / not-applied rather than erroring on
//!   contention.
//! - **Row TTL**: automatic expiry of a row a fixed duration after insert,
//!   independent of any explicit delete.
//!
//! Batches are durably logged as a unit and eventually fully applied, but
//! readers may observe partial application mid-flight. Nothing in the core
//! depends on sub-batch states being invisible, only on convergence.
//!
//! All results are decoded to typed rows at this boundary; callers never see
//! dynamic field access.

use circulate_core::error::StoreResult;
use circulate_core::types::{Book, BookId, BorrowMarker, HolderId, LockRow, Reservation, ReservationId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One write in a logged batch.
///
/// Mirrors the store-side prepared statements: three reservation-view
/// inserts, the catalog insert used by seeding, the due-date update used by
/// renew, and the deletes used by borrow (lock) and return (row + marker).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// Insert a catalog entry (seeding only).
    InsertBook(Book),

    /// Insert into the by-book reservation view, keyed
    /// `(book_id, reservation_id)`.
    InsertReservationByBook(Reservation),

    /// Insert into the by-holder reservation view, keyed
    /// `(holder, reservation_id)`.
    InsertReservationByHolder(Reservation),

    /// Insert the availability marker, keyed `book_id`.
    InsertBorrowMarker(BorrowMarker),

    /// Overwrite due_at in the by-book view. Applies only when the row
    /// exists; the store-side statement is keyed, not conditional.
    UpdateDueDateByBook {
        /// Partition key
        book_id: BookId,
        /// Clustering key
        reservation_id: ReservationId,
        /// New due date
        due_at: DateTime<Utc>,
    },

    /// Delete the lock row for a book. Idempotent.
    DeleteLock(BookId),

    /// Delete one row from the by-book view.
    DeleteReservationByBook {
        /// Partition key
        book_id: BookId,
        /// Clustering key
        reservation_id: ReservationId,
    },

    /// Delete the availability marker for a book. Idempotent.
    DeleteBorrowMarker(BookId),
}

/// Gateway to the replicated store.
///
/// Implementations must be shareable across actor threads; every method is
/// a synchronous round-trip that may fail with an infrastructure
/// [`StoreError`](circulate_core::StoreError), which is always distinct from
/// "condition not met".
pub trait StorageGateway: Send + Sync {
    /// Conditional insert of a lock row, `IF NOT EXISTS USING TTL` semantics.
    ///
    /// Returns `Ok(true)` when the row was applied, `Ok(false)` when a live
    /// lock already exists for the book. An expired row counts as absent.
    fn try_insert_lock(&self, row: LockRow, ttl: Duration) -> StoreResult<bool>;

    /// Point read of the current lock holder; `None` when no live lock row
    /// exists.
    fn lock_owner(&self, book_id: BookId) -> StoreResult<Option<HolderId>>;

    /// Unconditional delete of the lock row. Deleting an absent row is not
    /// an error.
    fn delete_lock(&self, book_id: BookId) -> StoreResult<()>;

    /// Execute a logged batch: durable as a unit, applied statement by
    /// statement, not isolated from concurrent readers.
    fn execute_batch(&self, batch: Vec<Statement>) -> StoreResult<()>;

    /// Point read of the availability marker.
    fn borrow_marker(&self, book_id: BookId) -> StoreResult<Option<BorrowMarker>>;

    /// Keyed read of one reservation in the by-holder view. This is the
    /// lookup renew/return authorize against.
    fn reservation(
        &self,
        holder: &HolderId,
        reservation_id: ReservationId,
    ) -> StoreResult<Option<Reservation>>;

    /// All reservations recorded under a holder in the by-holder view.
    fn reservations_for_holder(&self, holder: &HolderId) -> StoreResult<Vec<Reservation>>;

    /// All reservations recorded under a book in the by-book view.
    fn reservations_for_book(&self, book_id: BookId) -> StoreResult<Vec<Reservation>>;

    /// Point read of a catalog entry.
    fn book(&self, book_id: BookId) -> StoreResult<Option<Book>>;

    /// Full catalog scan.
    fn books(&self) -> StoreResult<Vec<Book>>;

    /// Truncate every table (catalog included). Seeding and the stress
    /// harnesses reset through this.
    fn truncate(&self) -> StoreResult<()>;
}

// Shared handles are gateways too, so a coordinator can run over
// `Arc<MemoryGateway>` while tests keep their own handle to the same store.
impl<G: StorageGateway + ?Sized> StorageGateway for std::sync::Arc<G> {
    fn try_insert_lock(&self, row: LockRow, ttl: Duration) -> StoreResult<bool> {
        (**self).try_insert_lock(row, ttl)
    }

    fn lock_owner(&self, book_id: BookId) -> StoreResult<Option<HolderId>> {
        (**self).lock_owner(book_id)
    }

    fn delete_lock(&self, book_id: BookId) -> StoreResult<()> {
        (**self).delete_lock(book_id)
    }

    fn execute_batch(&self, batch: Vec<Statement>) -> StoreResult<()> {
        (**self).execute_batch(batch)
    }

    fn borrow_marker(&self, book_id: BookId) -> StoreResult<Option<BorrowMarker>> {
        (**self).borrow_marker(book_id)
    }

    fn reservation(
        &self,
        holder: &HolderId,
        reservation_id: ReservationId,
    ) -> StoreResult<Option<Reservation>> {
        (**self).reservation(holder, reservation_id)
    }

    fn reservations_for_holder(&self, holder: &HolderId) -> StoreResult<Vec<Reservation>> {
        (**self).reservations_for_holder(holder)
    }

    fn reservations_for_book(&self, book_id: BookId) -> StoreResult<Vec<Reservation>> {
        (**self).reservations_for_book(book_id)
    }

    fn book(&self, book_id: BookId) -> StoreResult<Option<Book>> {
        (**self).book(book_id)
    }

    fn books(&self) -> StoreResult<Vec<Book>> {
        (**self).books()
    }

    fn truncate(&self) -> StoreResult<()> {
        (**self).truncate()
    }
}
