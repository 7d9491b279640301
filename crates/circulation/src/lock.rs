//! Short-lived exclusive claims on one book
//!
//! The lock table is the only row two actors ever race to write. A claim is
//! a conditional insert with a TTL: if the holder crashes between claiming
//! and converting the claim into a reservation, the row expires on its own
//! and the book frees itself. Nothing else recovers from a dead holder.

use circulate_core::config::CirculationConfig;
use circulate_core::error::StoreResult;
use circulate_core::types::{BookId, HolderId, LockRow};
use circulate_store::StorageGateway;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

/// Acquire/release/inspect locks through the storage gateway.
///
/// Holds no state beyond the gateway handle and the TTL; exclusivity lives
/// entirely in the store's per-partition CAS.
pub struct LockManager<G> {
    gateway: Arc<G>,
    ttl: Duration,
}

impl<G: StorageGateway> LockManager<G> {
    /// Create a manager writing locks with the configured TTL.
    pub fn new(gateway: Arc<G>, config: &CirculationConfig) -> Self {
        Self {
            gateway,
            ttl: config.lock_ttl,
        }
    }

    /// Attempt an exclusive claim on a book.
    ///
    /// Returns `Ok(true)` only when no live lock row existed; `Ok(false)` is
    /// the normal loss of a race, not an error. The inserted row expires
    /// after the TTL unless a borrow batch deletes it first.
    pub fn acquire(&self, book_id: BookId, holder: &HolderId) -> StoreResult<bool> {
        let row = LockRow {
            book_id,
            holder: holder.clone(),
            acquired_at: Utc::now(),
        };
        let applied = self.gateway.try_insert_lock(row, self.ttl)?;
        if applied {
            tracing::debug!(%book_id, %holder, "lock acquired");
        } else {
            tracing::debug!(%book_id, %holder, "lock held by someone else");
        }
        Ok(applied)
    }

    /// Current live holder of the lock, if any.
    ///
    /// Used right after a successful acquire as a sanity re-read: a stale
    /// read under lowered consistency can fail to confirm the CAS winner,
    /// and callers treat an unconfirmed claim as unavailable.
    pub fn owner_of(&self, book_id: BookId) -> StoreResult<Option<HolderId>> {
        self.gateway.lock_owner(book_id)
    }

    /// Drop the lock row. Idempotent; releasing an absent or expired lock
    /// is a no-op.
    pub fn release(&self, book_id: BookId) -> StoreResult<()> {
        self.gateway.delete_lock(book_id)
    }

    /// The TTL stamped on every claim.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
