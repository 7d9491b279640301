//! The "one logical fact, three physical rows" mapping
//!
//! A reservation exists in three differently-keyed views the store cannot
//! update as one isolated unit. This module is the single place that knows
//! which statements create the fact, which ones remove it, and which view
//! renewal touches. The coordinator never assembles view statements inline.

use circulate_core::types::{BorrowMarker, Reservation};
use circulate_store::Statement;
use chrono::{DateTime, Utc};

/// Statements that materialize a new reservation everywhere it must exist,
/// plus the lock delete that closes the claim, submitted as one logged
/// batch.
///
/// Order matters only to readers racing partial application; the marker
/// goes last so the fast pre-check is the last fact to appear.
pub fn borrow_batch(reservation: &Reservation) -> Vec<Statement> {
    vec![
        Statement::InsertReservationByBook(reservation.clone()),
        Statement::InsertReservationByHolder(reservation.clone()),
        Statement::InsertBorrowMarker(BorrowMarker {
            book_id: reservation.book_id,
            holder: reservation.holder.clone(),
        }),
        Statement::DeleteLock(reservation.book_id),
    ]
}

/// Statements that remove a returned reservation.
///
/// Deletes the by-book row and the availability marker. The by-holder row
/// is deliberately left behind: returned checkouts stay visible in a
/// holder's listing, matching the reference behavior.
pub fn return_batch(reservation: &Reservation) -> Vec<Statement> {
    vec![
        Statement::DeleteReservationByBook {
            book_id: reservation.book_id,
            reservation_id: reservation.reservation_id,
        },
        Statement::DeleteBorrowMarker(reservation.book_id),
    ]
}

/// The single-view due-date update renewal performs.
///
/// Only the by-book view is touched; the by-holder copy keeps its original
/// due date (reference behavior, asserted in tests rather than corrected).
pub fn renew_update(reservation: &Reservation, new_due: DateTime<Utc>) -> Statement {
    Statement::UpdateDueDateByBook {
        book_id: reservation.book_id,
        reservation_id: reservation.reservation_id,
        due_at: new_due,
    }
}
