//! Reservation coordinator: borrow, renew, return
//!
//! The coordinator converts a held lock into a durable reservation and
//! later locates/mutates/removes that reservation across the three views.
//! It holds no in-process shared mutable state and takes no in-process
//! locks; every exclusivity claim comes from the store's per-partition CAS.
//!
//! ## Borrow sequence
//!
//! ```text
//! 1. parse book id              -> InvalidBookId, no store call
//! 2. read borrow marker         -> AlreadyBorrowed (no lock attempted)
//! 3. CAS lock insert with TTL   -> BookLocked when not applied
//! 4. re-read lock owner         -> BookUnavailable unless it is us
//! 5. re-read borrow marker      -> AlreadyBorrowed, lock released
//! 6. fresh reservation id, due = now + loan period
//! 7. one logged batch: three view inserts + lock delete
//! ```
//!
//! Step 5 closes the window where a rival's whole batch lands between our
//! pre-check and our CAS: the freed lock is winnable, but the marker the
//! rival wrote is already visible to a holder of the new lock. Without it,
//! N concurrent borrows can yield two reservations.
//!
//! The batch is durable as a unit but not isolated; a reader racing step 6
//! may see a subset of the views. No read path here depends on that being
//! impossible, only on convergence.
//!
//! If the process dies between steps 3 and 6 the lock row expires on its
//! own and the book reverts to available. That path has no code on purpose.
//!
//! ## Ambiguous timeouts
//!
//! After a store timeout the write may or may not have applied. A caller
//! that retries `borrow` and gets `AlreadyBorrowed` back should treat the
//! combination as success: the first attempt won.

use crate::lock::LockManager;
use crate::views;
use circulate_core::config::CirculationConfig;
use circulate_core::error::{CirculationError, CirculationResult};
use circulate_core::types::{Book, BookId, HolderId, Reservation, ReservationId};
use circulate_store::{Statement, StorageGateway};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// The core state machine over one storage gateway.
///
/// Construct one per gateway handle; instances are cheap and independent,
/// and many threads may share one behind an `Arc`.
pub struct ReservationCoordinator<G> {
    gateway: Arc<G>,
    locks: LockManager<G>,
    config: CirculationConfig,
}

impl<G: StorageGateway> ReservationCoordinator<G> {
    /// Create a coordinator with an injected gateway and configuration.
    pub fn new(gateway: Arc<G>, config: CirculationConfig) -> Self {
        let locks = LockManager::new(Arc::clone(&gateway), &config);
        Self {
            gateway,
            locks,
            config,
        }
    }

    /// The lock manager this coordinator claims through.
    pub fn locks(&self) -> &LockManager<G> {
        &self.locks
    }

    /// Borrow a book identified by raw user input.
    ///
    /// Identical to [`borrow`](Self::borrow) after parsing; malformed input
    /// fails with `InvalidBookId` before any store round-trip.
    pub fn borrow_by_str(&self, input: &str, holder: &HolderId) -> CirculationResult<Reservation> {
        let book_id: BookId = input
            .parse()
            .map_err(|_| CirculationError::InvalidBookId {
                input: input.to_string(),
            })?;
        self.borrow(book_id, holder)
    }

    /// Borrow a book: claim the lock, materialize the reservation in all
    /// three views, release the lock in the same batch.
    ///
    /// Contention surfaces as `AlreadyBorrowed`, `BookLocked` or
    /// `BookUnavailable`; all three are normal negative outcomes under
    /// load, logged at debug and never retried here.
    pub fn borrow(&self, book_id: BookId, holder: &HolderId) -> CirculationResult<Reservation> {
        // Fast pre-check against the marker view; skips a doomed CAS.
        if self.gateway.borrow_marker(book_id)?.is_some() {
            tracing::debug!(%book_id, %holder, "already borrowed");
            return Err(CirculationError::AlreadyBorrowed { book_id });
        }

        if !self.locks.acquire(book_id, holder)? {
            return Err(CirculationError::BookLocked { book_id });
        }

        // Defensive re-read of the winner. A stale replica can answer with
        // no row or a rival's row; either way we walk away and let the TTL
        // clean up whatever we wrote.
        match self.locks.owner_of(book_id)? {
            Some(owner) if owner == *holder => {}
            _ => {
                tracing::debug!(%book_id, %holder, "lock ownership not confirmed");
                return Err(CirculationError::BookUnavailable { book_id });
            }
        }

        // Marker re-check while holding the lock. The pre-check above can
        // predate a rival's completed batch (marker written, lock deleted),
        // in which case our CAS won a lock on an already-borrowed book.
        if self.gateway.borrow_marker(book_id)?.is_some() {
            self.locks.release(book_id)?;
            tracing::debug!(%book_id, %holder, "borrowed while we raced for the lock");
            return Err(CirculationError::AlreadyBorrowed { book_id });
        }

        let reservation = Reservation {
            book_id,
            reservation_id: ReservationId::new(),
            holder: holder.clone(),
            due_at: Utc::now() + self.config.loan_period(),
        };
        self.gateway.execute_batch(views::borrow_batch(&reservation))?;

        tracing::info!(
            %book_id,
            %holder,
            reservation_id = %reservation.reservation_id,
            due_at = %reservation.due_at,
            "book borrowed"
        );
        Ok(reservation)
    }

    /// Extend a reservation by one loan period from its current due date.
    ///
    /// The by-holder lookup doubles as the authorization check: a holder
    /// can only renew a reservation filed under their own name. The due
    /// date itself is read from and written to the by-book view, so
    /// consecutive renewals stack; the by-holder copy keeps its original
    /// date forever (reference behavior, preserved). A reservation whose
    /// by-book row is gone (returned) can no longer be renewed.
    pub fn renew(
        &self,
        reservation_id: ReservationId,
        holder: &HolderId,
    ) -> CirculationResult<DateTime<Utc>> {
        let reservation = self
            .gateway
            .reservation(holder, reservation_id)?
            .ok_or(CirculationError::ReservationNotFound { reservation_id })?;

        // The by-book row carries the authoritative due date; the copy we
        // just authorized against goes stale after the first renewal.
        let current = self
            .gateway
            .reservations_for_book(reservation.book_id)?
            .into_iter()
            .find(|row| row.reservation_id == reservation_id)
            .ok_or(CirculationError::ReservationNotFound { reservation_id })?;

        let new_due = current.due_at + self.config.loan_period();
        self.gateway
            .execute_batch(vec![views::renew_update(&reservation, new_due)])?;

        tracing::info!(
            book_id = %reservation.book_id,
            %holder,
            %reservation_id,
            due_at = %new_due,
            "reservation renewed"
        );
        Ok(new_due)
    }

    /// Return a book, freeing it for the next borrower.
    ///
    /// The book is identified by the reservation record itself, not by
    /// caller input: the by-holder lookup recovers the book id, then one
    /// batch deletes the by-book row and the availability marker. The
    /// by-holder row survives (reference behavior, preserved), so returned
    /// checkouts remain visible in listings.
    pub fn return_book(
        &self,
        reservation_id: ReservationId,
        holder: &HolderId,
    ) -> CirculationResult<BookId> {
        let reservation = self
            .gateway
            .reservation(holder, reservation_id)?
            .ok_or(CirculationError::ReservationNotFound { reservation_id })?;

        self.gateway.execute_batch(views::return_batch(&reservation))?;

        tracing::info!(
            book_id = %reservation.book_id,
            %holder,
            %reservation_id,
            "book returned"
        );
        Ok(reservation.book_id)
    }

    /// Full catalog listing (read-only projection).
    pub fn books(&self) -> CirculationResult<Vec<Book>> {
        Ok(self.gateway.books()?)
    }

    /// Catalog lookup for one book.
    pub fn book(&self, book_id: BookId) -> CirculationResult<Option<Book>> {
        Ok(self.gateway.book(book_id)?)
    }

    /// Everything filed under a holder in the by-holder view. Includes
    /// returned reservations, because return never deletes that row.
    pub fn reservations_for(&self, holder: &HolderId) -> CirculationResult<Vec<Reservation>> {
        Ok(self.gateway.reservations_for_holder(holder)?)
    }

    /// Reservations recorded under one book in the by-book view.
    pub fn reservations_on(&self, book_id: BookId) -> CirculationResult<Vec<Reservation>> {
        Ok(self.gateway.reservations_for_book(book_id)?)
    }

    /// Wipe every table and batch-insert a fresh catalog.
    pub fn seed_catalog(&self, books: Vec<Book>) -> CirculationResult<usize> {
        self.gateway.truncate()?;
        let count = books.len();
        let batch: Vec<Statement> = books.into_iter().map(Statement::InsertBook).collect();
        self.gateway.execute_batch(batch)?;
        tracing::info!(count, "catalog seeded");
        Ok(count)
    }

    /// Wipe every table (stress harness reset).
    pub fn reset(&self) -> CirculationResult<()> {
        Ok(self.gateway.truncate()?)
    }
}
