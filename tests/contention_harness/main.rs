//! Concurrent contention harnesses.
//!
//! Ports of the reference stress drivers, run as assertions instead of
//! printed tallies: rapid same-request spam, randomized multi-actor mix,
//! and two actors exhaustively racing over a whole catalog.

use circulate::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

fn library() -> (Arc<MemoryGateway>, ReservationCoordinator<MemoryGateway>) {
    let store = Arc::new(MemoryGateway::new());
    let library = ReservationCoordinator::new(Arc::clone(&store), CirculationConfig::new());
    (store, library)
}

fn catalog(library: &ReservationCoordinator<MemoryGateway>, n: usize) -> Vec<BookId> {
    let books: Vec<Book> = (0..n)
        .map(|i| Book {
            book_id: BookId::new(),
            author: format!("Author {}", i),
            title: format!("Title {}", i),
            isbn: 0,
        })
        .collect();
    library.seed_catalog(books.clone()).unwrap();
    books.into_iter().map(|b| b.book_id).collect()
}

// ============================================================================
// Stress 1 — rapid same-request spam
// ============================================================================

#[test]
fn five_thousand_borrows_from_sixteen_actors_yield_exactly_one_success() {
    const REQUESTS: usize = 5000;
    const WORKERS: usize = 16;

    let (store, library) = library();
    let book_id = catalog(&library, 1)[0];
    let tester: HolderId = "tester".into();

    let successes = AtomicUsize::new(0);
    let contentions = AtomicUsize::new(0);

    thread::scope(|scope| {
        for worker in 0..WORKERS {
            // Distribute the remainder so exactly REQUESTS calls are issued.
            let iterations = REQUESTS / WORKERS + usize::from(worker < REQUESTS % WORKERS);
            let (library, tester) = (&library, &tester);
            let (successes, contentions) = (&successes, &contentions);
            scope.spawn(move || {
                for _ in 0..iterations {
                    match library.borrow(book_id, &tester) {
                        Ok(_) => {
                            successes.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(e) if e.is_contention() => {
                            contentions.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(e) => panic!("unexpected failure: {}", e),
                    }
                }
            });
        }
    });

    assert_eq!(successes.load(Ordering::Relaxed), 1);
    assert_eq!(contentions.load(Ordering::Relaxed), REQUESTS - 1);

    // Final state: borrowed by tester, one record in every view.
    let marker = store.borrow_marker(book_id).unwrap().unwrap();
    assert_eq!(marker.holder, tester);
    assert_eq!(store.reservations_for_book(book_id).unwrap().len(), 1);
    assert_eq!(store.reservations_for_holder(&tester).unwrap().len(), 1);
}

// ============================================================================
// Stress 2 — randomized multi-actor mix
// ============================================================================

#[test]
fn randomized_borrow_return_renew_mix_never_double_books() {
    const REQUESTS: usize = 2000;
    const WORKERS: usize = 20;

    let (store, library) = library();
    let books = catalog(&library, 10);
    let users: Vec<HolderId> = (1..=10).map(|i| HolderId::new(format!("user_{}", i))).collect();

    thread::scope(|scope| {
        for _ in 0..WORKERS {
            scope.spawn(|| {
                let mut rng = rand::thread_rng();
                // Reservations this worker borrowed and has not returned.
                // Returning only our own live checkouts keeps the driver
                // from re-returning a stale by-holder row, which the
                // protocol tolerates but which would clobber a rival's
                // marker and muddy the post-conditions below.
                let mut live: Vec<(HolderId, ReservationId)> = Vec::new();
                for _ in 0..REQUESTS / WORKERS {
                    match rng.gen_range(0..3) {
                        0 => {
                            let user = users.choose(&mut rng).unwrap();
                            let book_id = *books.choose(&mut rng).unwrap();
                            match library.borrow(book_id, user) {
                                Ok(r) => live.push((user.clone(), r.reservation_id)),
                                Err(e) if e.is_contention() => {}
                                Err(e) => panic!("unexpected failure: {}", e),
                            }
                        }
                        1 => {
                            if live.is_empty() {
                                continue;
                            }
                            let idx = rng.gen_range(0..live.len());
                            let (user, reservation_id) = live.swap_remove(idx);
                            library.return_book(reservation_id, &user).unwrap();
                        }
                        _ => {
                            if let Some((user, reservation_id)) = live.choose(&mut rng) {
                                library.renew(*reservation_id, user).unwrap();
                            }
                        }
                    }
                }
            });
        }
    });

    // Post-condition: no book has more than one live reservation, and
    // every marker agrees with its by-book row.
    for book_id in books {
        let live = store.reservations_for_book(book_id).unwrap();
        assert!(
            live.len() <= 1,
            "book {} has {} concurrent reservations",
            book_id,
            live.len()
        );
        if let Some(reservation) = live.first() {
            let marker = store.borrow_marker(book_id).unwrap();
            if let Some(marker) = marker {
                assert_eq!(marker.holder, reservation.holder);
            }
        }
    }
}

// ============================================================================
// Stress 3 — two actors race over the whole catalog
// ============================================================================

#[test]
fn two_rivals_split_the_catalog_with_no_book_borrowed_twice() {
    let (store, library) = library();
    let books = catalog(&library, 20);

    thread::scope(|scope| {
        for name in ["alice", "bob"] {
            let books = &books;
            let library = &library;
            scope.spawn(move || {
                let rival: HolderId = name.into();
                for &book_id in books {
                    match library.borrow(book_id, &rival) {
                        Ok(_) => {}
                        Err(e) if e.is_contention() => {}
                        Err(e) => panic!("unexpected failure: {}", e),
                    }
                }
            });
        }
    });

    let alice = store.reservations_for_holder(&"alice".into()).unwrap().len();
    let bob = store.reservations_for_holder(&"bob".into()).unwrap().len();
    assert_eq!(alice + bob, books.len(), "every book claimed exactly once");

    for book_id in books {
        assert_eq!(
            store.reservations_for_book(book_id).unwrap().len(),
            1,
            "exactly one reservation per book"
        );
        assert!(store.borrow_marker(book_id).unwrap().is_some());
    }
}
