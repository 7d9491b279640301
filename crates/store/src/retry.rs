//! Bounded-backoff retry wrapper for storage gateways
//!
//! Infrastructure failures (timeouts, unreachable replicas) are transient
//! and retried here, at the gateway layer, with exponential backoff. The
//! circulation core above never retries: a contention outcome is final for
//! the attempt, and by the time a `StoreError` crosses the trait boundary
//! the retries are already spent.
//!
//! Retrying a write after a timeout is inherently ambiguous — the original
//! attempt may have applied. The wrapper makes no attempt to hide that;
//! callers of `borrow` must treat timeout-retry followed by
//! `AlreadyBorrowed` as success.

use crate::gateway::{Statement, StorageGateway};
use circulate_core::config::RetryPolicy;
use circulate_core::error::{StoreError, StoreResult};
use circulate_core::types::{Book, BookId, BorrowMarker, HolderId, LockRow, Reservation, ReservationId};
use std::time::Duration;

/// Gateway decorator that retries retryable failures per a [`RetryPolicy`].
///
/// Non-retryable errors and business outcomes (CAS not applied, row absent)
/// pass straight through on the first attempt.
pub struct Retrying<G> {
    inner: G,
    policy: RetryPolicy,
}

impl<G: StorageGateway> Retrying<G> {
    /// Wrap a gateway with the given policy.
    pub fn new(inner: G, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// The wrapped gateway.
    pub fn inner(&self) -> &G {
        &self.inner
    }

    fn run<T>(&self, op: &'static str, mut call: impl FnMut(&G) -> StoreResult<T>) -> StoreResult<T> {
        let mut last: Option<StoreError> = None;
        for attempt in 1..=self.policy.max_attempts.max(1) {
            let delay = self.policy.delay_before(attempt);
            if delay > Duration::ZERO {
                std::thread::sleep(delay);
            }
            match call(&self.inner) {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < self.policy.max_attempts => {
                    tracing::warn!(op, attempt, error = %err, "retryable store failure, backing off");
                    last = Some(err);
                }
                Err(err) => return Err(err),
            }
        }
        // max_attempts >= 1, so at least one call ran and failed.
        Err(last.unwrap_or(StoreError::Unavailable {
            reason: format!("{}: retries exhausted", op),
        }))
    }
}

impl<G: StorageGateway> StorageGateway for Retrying<G> {
    fn try_insert_lock(&self, row: LockRow, ttl: Duration) -> StoreResult<bool> {
        self.run("insert_lock", |g| g.try_insert_lock(row.clone(), ttl))
    }

    fn lock_owner(&self, book_id: BookId) -> StoreResult<Option<HolderId>> {
        self.run("select_lock_owner", |g| g.lock_owner(book_id))
    }

    fn delete_lock(&self, book_id: BookId) -> StoreResult<()> {
        self.run("delete_lock", |g| g.delete_lock(book_id))
    }

    fn execute_batch(&self, batch: Vec<Statement>) -> StoreResult<()> {
        self.run("batch", |g| g.execute_batch(batch.clone()))
    }

    fn borrow_marker(&self, book_id: BookId) -> StoreResult<Option<BorrowMarker>> {
        self.run("select_borrowed", |g| g.borrow_marker(book_id))
    }

    fn reservation(
        &self,
        holder: &HolderId,
        reservation_id: ReservationId,
    ) -> StoreResult<Option<Reservation>> {
        self.run("select_reservation", |g| g.reservation(holder, reservation_id))
    }

    fn reservations_for_holder(&self, holder: &HolderId) -> StoreResult<Vec<Reservation>> {
        self.run("select_reservations_by_holder", |g| {
            g.reservations_for_holder(holder)
        })
    }

    fn reservations_for_book(&self, book_id: BookId) -> StoreResult<Vec<Reservation>> {
        self.run("select_reservations_by_book", |g| g.reservations_for_book(book_id))
    }

    fn book(&self, book_id: BookId) -> StoreResult<Option<Book>> {
        self.run("select_book", |g| g.book(book_id))
    }

    fn books(&self) -> StoreResult<Vec<Book>> {
        self.run("select_all_books", |g| g.books())
    }

    fn truncate(&self) -> StoreResult<()> {
        self.run("truncate", |g| g.truncate())
    }
}
