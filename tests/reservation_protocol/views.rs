//! Three-view consistency, including the preserved single-view quirks.

use crate::common::*;
use circulate::prelude::*;

// ============================================================================
// All three views agree after borrow
// ============================================================================

#[test]
fn borrow_materializes_the_fact_in_all_three_views() {
    let t = TestLibrary::new();
    let alice = holder("alice");
    let book_id = BookId::new();
    let reservation = t.library.borrow(book_id, &alice).unwrap();

    // Availability marker, with the holder recorded.
    let marker = t.store.borrow_marker(book_id).unwrap().unwrap();
    assert_eq!(marker.book_id, book_id);
    assert_eq!(marker.holder, alice);

    // By-book view.
    let by_book = t.store.reservations_for_book(book_id).unwrap();
    assert_eq!(by_book.len(), 1);
    assert_eq!(by_book[0], reservation);

    // By-holder view.
    let by_holder = t
        .store
        .reservation(&alice, reservation.reservation_id)
        .unwrap()
        .unwrap();
    assert_eq!(by_holder, reservation);
}

#[test]
fn borrow_batch_releases_the_lock_with_the_same_write() {
    let t = TestLibrary::new();
    let book_id = BookId::new();

    t.library.borrow(book_id, &holder("alice")).unwrap();
    assert_eq!(
        t.store.lock_owner(book_id).unwrap(),
        None,
        "lock row is deleted by the borrow batch, not left to expire"
    );
}

// ============================================================================
// Return deletes two of the three rows
// ============================================================================

#[test]
fn return_clears_marker_and_by_book_views() {
    let t = TestLibrary::new();
    let alice = holder("alice");
    let book_id = BookId::new();
    let reservation = t.library.borrow(book_id, &alice).unwrap();

    t.library.return_book(reservation.reservation_id, &alice).unwrap();

    assert!(t.store.borrow_marker(book_id).unwrap().is_none());
    assert!(t.store.reservations_for_book(book_id).unwrap().is_empty());
}

#[test]
fn returned_reservation_stays_listed_under_the_holder() {
    // return never deletes the by-holder row; the reference app keeps
    // returned checkouts in "my borrowed books" forever.
    let t = TestLibrary::new();
    let alice = holder("alice");
    let reservation = t.library.borrow(BookId::new(), &alice).unwrap();

    t.library.return_book(reservation.reservation_id, &alice).unwrap();

    let mine = t.library.reservations_for(&alice).unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].reservation_id, reservation.reservation_id);
}

#[test]
fn stale_return_clobbers_the_next_holders_marker() {
    // The surviving by-holder row still authorizes a second return, and
    // the marker delete is keyed by book alone. A holder re-returning an
    // old checkout therefore erases whoever holds the book now from the
    // marker view, while the by-book row stays.
    let t = TestLibrary::new();
    let alice = holder("alice");
    let bob = holder("bob");
    let book_id = BookId::new();

    let old = t.library.borrow(book_id, &alice).unwrap();
    t.library.return_book(old.reservation_id, &alice).unwrap();
    t.library.borrow(book_id, &bob).unwrap();

    t.library.return_book(old.reservation_id, &alice).unwrap();

    assert!(t.store.borrow_marker(book_id).unwrap().is_none());
    assert_eq!(
        t.store.reservations_for_book(book_id).unwrap().len(),
        1,
        "bob's by-book row survives; the views now disagree"
    );
}

// ============================================================================
// Renewal touches only the by-book view
// ============================================================================

#[test]
fn renew_updates_the_by_book_view() {
    let t = TestLibrary::new();
    let alice = holder("alice");
    let book_id = BookId::new();
    let reservation = t.library.borrow(book_id, &alice).unwrap();

    let new_due = t.library.renew(reservation.reservation_id, &alice).unwrap();

    let by_book = t.store.reservations_for_book(book_id).unwrap();
    assert_eq!(by_book[0].due_at, new_due);
}

#[test]
fn renew_leaves_by_holder_due_date_stale() {
    // The renewal write goes to the by-book view only; the by-holder row
    // keeps its original due date while successive renewals stack on the
    // by-book copy.
    let t = TestLibrary::new();
    let alice = holder("alice");
    let book_id = BookId::new();
    let reservation = t.library.borrow(book_id, &alice).unwrap();

    let first = t.library.renew(reservation.reservation_id, &alice).unwrap();
    let second = t.library.renew(reservation.reservation_id, &alice).unwrap();

    let by_holder = t
        .store
        .reservation(&alice, reservation.reservation_id)
        .unwrap()
        .unwrap();
    assert_eq!(by_holder.due_at, reservation.due_at, "by-holder copy never moves");
    assert_eq!(first, reservation.due_at + chrono::Duration::days(30));
    assert_eq!(second, first + chrono::Duration::days(30));
}

// ============================================================================
// Listings
// ============================================================================

#[test]
fn catalog_listing_reflects_seeded_books() {
    let t = TestLibrary::new();
    let books: Vec<Book> = (0..3)
        .map(|i| Book {
            book_id: BookId::new(),
            author: format!("Author {}", i),
            title: format!("Title {}", i),
            isbn: 0,
        })
        .collect();
    t.library.seed_catalog(books.clone()).unwrap();

    let mut listed = t.library.books().unwrap();
    listed.sort_by(|a, b| a.title.cmp(&b.title));
    assert_eq!(listed, books);
}

#[test]
fn holder_listing_spans_multiple_books() {
    let t = TestLibrary::new();
    let alice = holder("alice");

    let a = t.library.borrow(BookId::new(), &alice).unwrap();
    let b = t.library.borrow(BookId::new(), &alice).unwrap();

    let mut mine: Vec<ReservationId> = t
        .library
        .reservations_for(&alice)
        .unwrap()
        .into_iter()
        .map(|r| r.reservation_id)
        .collect();
    let mut expected = vec![a.reservation_id, b.reservation_id];
    mine.sort_by_key(|id| id.to_string());
    expected.sort_by_key(|id| id.to_string());
    assert_eq!(mine, expected);
}
