//! Domain types for the circulation system
//!
//! One logical reservation is materialized in three differently-keyed views;
//! the row types here are the typed shapes decoded at the storage gateway
//! boundary, never dynamic "row-as-object" access.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a catalog entry (a book).
///
/// Partition key for the by-book reservation view, the borrow-marker view
/// and the lock table. Parsed from user input before any store round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BookId(Uuid);

impl BookId {
    /// Create a new random BookId using UUID v4
    pub fn new() -> Self {
        BookId(Uuid::new_v4())
    }

    /// Wrap an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        BookId(uuid)
    }

    /// The underlying UUID
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for BookId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BookId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(BookId(Uuid::parse_str(s.trim())?))
    }
}

/// Unique identifier for one checkout.
///
/// A fresh ReservationId is generated for every successful borrow; together
/// with the holder it forms the key of the by-holder view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReservationId(Uuid);

impl ReservationId {
    /// Create a new random ReservationId using UUID v4
    pub fn new() -> Self {
        ReservationId(Uuid::new_v4())
    }

    /// Wrap an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        ReservationId(uuid)
    }
}

impl Default for ReservationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ReservationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ReservationId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ReservationId(Uuid::parse_str(s.trim())?))
    }
}

/// The actor holding (or trying to hold) a lock or reservation.
///
/// Plain username; the store never authenticates it, callers are trusted to
/// pass their own name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HolderId(String);

impl HolderId {
    /// Wrap a username
    pub fn new(name: impl Into<String>) -> Self {
        HolderId(name.into())
    }

    /// The username as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for HolderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for HolderId {
    fn from(s: &str) -> Self {
        HolderId(s.to_string())
    }
}

impl From<String> for HolderId {
    fn from(s: String) -> Self {
        HolderId(s)
    }
}

/// Immutable catalog entry.
///
/// Seeded once, never mutated or deleted by the circulation core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Catalog identifier
    pub book_id: BookId,
    /// First listed author
    pub author: String,
    /// Title
    pub title: String,
    /// ISBN (0 when unknown, as seeded)
    pub isbn: i64,
}

/// Ephemeral exclusive claim on one book.
///
/// At most one live row exists per book at any instant; the store's
/// conditional insert enforces that, not this type. A row that is never
/// converted into a reservation expires on its own after the lock TTL, which
/// is the only recovery path from a crashed or slow holder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockRow {
    /// Book being claimed
    pub book_id: BookId,
    /// Claiming actor
    pub holder: HolderId,
    /// When the claim was written
    pub acquired_at: DateTime<Utc>,
}

/// One durable checkout, the logical fact behind all three views.
///
/// Created only by a successful borrow, due date extended only by renew,
/// removed only by return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    /// Book checked out
    pub book_id: BookId,
    /// Unique per checkout
    pub reservation_id: ReservationId,
    /// Actor in possession
    pub holder: HolderId,
    /// When the book is due back
    pub due_at: DateTime<Utc>,
}

/// Thin existence marker in the availability view.
///
/// Keyed by book alone; its presence is the fast "already borrowed"
/// pre-check that avoids a doomed lock attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowMarker {
    /// Book checked out
    pub book_id: BookId,
    /// Actor in possession
    pub holder: HolderId,
}
