//! Reservation protocol integration tests.
//!
//! Covers the full borrow/renew/return lifecycle, lock TTL expiry, the
//! three-view consistency invariant, and the preserved single-view quirks
//! of renewal and return.

mod common;

mod expiry;
mod views;
