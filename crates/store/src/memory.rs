//! In-process simulator of the replicated store
//!
//! `MemoryGateway` reproduces the store contract the circulation core is
//! written against, table by table:
//!
//! - partition = DashMap entry; the entry lock makes the conditional lock
//!   insert atomic per partition, exactly the guarantee (and the only
//!   guarantee) the real store gives
//! - lock rows carry an absolute expiry instant and are treated as absent
//!   once it passes (lazy TTL, checked on every read and CAS)
//! - batches are counted as logged first, then applied one statement at a
//!   time with no global lock, so concurrent readers can observe partial
//!   application — matching the logged-batch contract
//!
//! A fault hook lets tests make the next N calls fail with a timeout, to
//! exercise the retry wrapper and ambiguous-outcome handling.

use crate::gateway::{Statement, StorageGateway};
use circulate_core::error::{StoreError, StoreResult};
use circulate_core::types::{Book, BookId, BorrowMarker, HolderId, LockRow, Reservation, ReservationId};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Lock row plus the instant the store will consider it expired.
#[derive(Debug, Clone)]
struct TtlRow {
    row: LockRow,
    expires_at: Instant,
}

impl TtlRow {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

/// In-memory replicated-store stand-in.
///
/// Thread-safe; actors share it behind an `Arc`. Per-book partitions never
/// contend with each other.
pub struct MemoryGateway {
    /// Catalog, keyed by book
    books: DashMap<BookId, Book>,
    /// Lock table, keyed by book; rows expire per TTL
    locks: DashMap<BookId, TtlRow>,
    /// By-book reservation view: partition per book, rows clustered by
    /// reservation id
    by_book: DashMap<BookId, FxHashMap<ReservationId, Reservation>>,
    /// By-holder reservation view: partition per holder
    by_holder: DashMap<HolderId, FxHashMap<ReservationId, Reservation>>,
    /// Availability markers, keyed by book
    markers: DashMap<BookId, BorrowMarker>,
    /// Batches durably logged (observability hook for tests)
    batches_logged: AtomicU64,
    /// Remaining injected timeouts; every gateway call consumes one
    injected_timeouts: Mutex<u32>,
}

impl MemoryGateway {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            books: DashMap::new(),
            locks: DashMap::new(),
            by_book: DashMap::new(),
            by_holder: DashMap::new(),
            markers: DashMap::new(),
            batches_logged: AtomicU64::new(0),
            injected_timeouts: Mutex::new(0),
        }
    }

    /// Make the next `n` gateway calls fail with a timeout.
    pub fn inject_timeouts(&self, n: u32) {
        *self.injected_timeouts.lock() = n;
    }

    /// Number of batches logged so far.
    pub fn batches_logged(&self) -> u64 {
        self.batches_logged.load(Ordering::Relaxed)
    }

    fn fault_check(&self, op: &'static str) -> StoreResult<()> {
        let mut remaining = self.injected_timeouts.lock();
        if *remaining > 0 {
            *remaining -= 1;
            return Err(StoreError::Timeout { op });
        }
        Ok(())
    }

    fn apply(&self, statement: Statement) {
        match statement {
            Statement::InsertBook(book) => {
                self.books.insert(book.book_id, book);
            }
            Statement::InsertReservationByBook(reservation) => {
                self.by_book
                    .entry(reservation.book_id)
                    .or_default()
                    .insert(reservation.reservation_id, reservation);
            }
            Statement::InsertReservationByHolder(reservation) => {
                self.by_holder
                    .entry(reservation.holder.clone())
                    .or_default()
                    .insert(reservation.reservation_id, reservation);
            }
            Statement::InsertBorrowMarker(marker) => {
                self.markers.insert(marker.book_id, marker);
            }
            Statement::UpdateDueDateByBook {
                book_id,
                reservation_id,
                due_at,
            } => {
                if let Some(mut partition) = self.by_book.get_mut(&book_id) {
                    if let Some(row) = partition.get_mut(&reservation_id) {
                        row.due_at = due_at;
                    }
                }
            }
            Statement::DeleteLock(book_id) => {
                self.locks.remove(&book_id);
            }
            Statement::DeleteReservationByBook {
                book_id,
                reservation_id,
            } => {
                if let Some(mut partition) = self.by_book.get_mut(&book_id) {
                    partition.remove(&reservation_id);
                }
            }
            Statement::DeleteBorrowMarker(book_id) => {
                self.markers.remove(&book_id);
            }
        }
    }
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageGateway for MemoryGateway {
    fn try_insert_lock(&self, row: LockRow, ttl: Duration) -> StoreResult<bool> {
        self.fault_check("insert_lock")?;
        let now = Instant::now();
        let fresh = TtlRow {
            row,
            expires_at: now + ttl,
        };
        // The entry holds the partition's shard lock across the
        // check-and-insert, which is what makes this a CAS.
        let applied = match self.locks.entry(fresh.row.book_id) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_live(now) {
                    false
                } else {
                    occupied.insert(fresh);
                    true
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(fresh);
                true
            }
        };
        Ok(applied)
    }

    fn lock_owner(&self, book_id: BookId) -> StoreResult<Option<HolderId>> {
        self.fault_check("select_lock_owner")?;
        let now = Instant::now();
        Ok(self
            .locks
            .get(&book_id)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.row.holder.clone()))
    }

    fn delete_lock(&self, book_id: BookId) -> StoreResult<()> {
        self.fault_check("delete_lock")?;
        self.locks.remove(&book_id);
        Ok(())
    }

    fn execute_batch(&self, batch: Vec<Statement>) -> StoreResult<()> {
        self.fault_check("batch")?;
        // Logged first: from here the whole batch is durable and will be
        // applied. Application is per-statement, so readers racing this
        // loop may see a subset.
        self.batches_logged.fetch_add(1, Ordering::Relaxed);
        for statement in batch {
            self.apply(statement);
        }
        Ok(())
    }

    fn borrow_marker(&self, book_id: BookId) -> StoreResult<Option<BorrowMarker>> {
        self.fault_check("select_borrowed")?;
        Ok(self.markers.get(&book_id).map(|entry| entry.clone()))
    }

    fn reservation(
        &self,
        holder: &HolderId,
        reservation_id: ReservationId,
    ) -> StoreResult<Option<Reservation>> {
        self.fault_check("select_reservation")?;
        Ok(self
            .by_holder
            .get(holder)
            .and_then(|partition| partition.get(&reservation_id).cloned()))
    }

    fn reservations_for_holder(&self, holder: &HolderId) -> StoreResult<Vec<Reservation>> {
        self.fault_check("select_reservations_by_holder")?;
        Ok(self
            .by_holder
            .get(holder)
            .map(|partition| partition.values().cloned().collect())
            .unwrap_or_default())
    }

    fn reservations_for_book(&self, book_id: BookId) -> StoreResult<Vec<Reservation>> {
        self.fault_check("select_reservations_by_book")?;
        Ok(self
            .by_book
            .get(&book_id)
            .map(|partition| partition.values().cloned().collect())
            .unwrap_or_default())
    }

    fn book(&self, book_id: BookId) -> StoreResult<Option<Book>> {
        self.fault_check("select_book")?;
        Ok(self.books.get(&book_id).map(|entry| entry.clone()))
    }

    fn books(&self) -> StoreResult<Vec<Book>> {
        self.fault_check("select_all_books")?;
        Ok(self.books.iter().map(|entry| entry.value().clone()).collect())
    }

    fn truncate(&self) -> StoreResult<()> {
        self.fault_check("truncate")?;
        self.books.clear();
        self.locks.clear();
        self.by_book.clear();
        self.by_holder.clear();
        self.markers.clear();
        Ok(())
    }
}
