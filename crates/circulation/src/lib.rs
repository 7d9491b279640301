//! Reservation-locking protocol for circulate
//!
//! This crate is the concurrency core:
//! - [`LockManager`]: short-lived exclusive claims via CAS-with-TTL, the
//!   only primitive giving any actor exclusivity
//! - [`ReservationCoordinator`]: converts a held lock into a durable
//!   reservation and locates/mutates/removes it for renew and return,
//!   propagating every change across the denormalized views
//! - [`views`]: the "one logical fact, three physical rows" mapping in one
//!   reusable place
//!
//! Per-resource state machine, from the coordinator's point of view:
//!
//! ```text
//! Available -(lock acquired)-> Claimed -(views written)-> Borrowed
//! Borrowed -(renew)*-> Borrowed -(return)-> Available
//! ```
//!
//! A `Claimed` that never reaches `Borrowed` reverts to `Available` when the
//! lock TTL lapses; no code path handles it because none needs to. It is a
//! frequent, valid outcome under contention, not an anomaly.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod coordinator;
pub mod lock;
pub mod views;

pub use coordinator::ReservationCoordinator;
pub use lock::LockManager;
