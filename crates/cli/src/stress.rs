//! Concurrent contention harnesses.
//!
//! Ports of the three reference stress drivers. Each one reseeds the store,
//! hammers the coordinator from many threads, and prints an outcome tally.
//! Contention counts are the interesting output: under correct operation
//! the spam driver ends with exactly one success per book.

use crate::seed;
use anyhow::Result;
use circulate_circulation::ReservationCoordinator;
use circulate_core::{CirculationError, HolderId};
use circulate_store::StorageGateway;
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Instant;

const SPAM_REQUESTS: usize = 5000;
const SPAM_WORKERS: usize = 16;
const MIX_REQUESTS: usize = 5000;
const MIX_WORKERS: usize = 20;

#[derive(Default)]
struct Tally {
    success: AtomicUsize,
    contention: AtomicUsize,
    not_found: AtomicUsize,
    failure: AtomicUsize,
}

impl Tally {
    fn record<T>(&self, outcome: &Result<T, CirculationError>) {
        match outcome {
            Ok(_) => self.success.fetch_add(1, Ordering::Relaxed),
            Err(e) if e.is_contention() => self.contention.fetch_add(1, Ordering::Relaxed),
            Err(CirculationError::ReservationNotFound { .. }) => {
                self.not_found.fetch_add(1, Ordering::Relaxed)
            }
            Err(_) => self.failure.fetch_add(1, Ordering::Relaxed),
        };
    }

    fn print(&self, label: &str, elapsed: std::time::Duration) {
        println!(
            "{}: {:.2?} — {} succeeded, {} contended, {} not found, {} failed",
            label,
            elapsed,
            self.success.load(Ordering::Relaxed),
            self.contention.load(Ordering::Relaxed),
            self.not_found.load(Ordering::Relaxed),
            self.failure.load(Ordering::Relaxed),
        );
    }
}

/// Stress 1 — rapid same-request spam: 5000 borrows of one book from 16
/// threads under a single username. Exactly one should succeed.
pub fn rapid_spam<G: StorageGateway>(library: &ReservationCoordinator<G>) -> Result<()> {
    seed::run_seed(library, None, 20)?;
    let book_id = library.books()?[0].book_id;
    let tester: HolderId = "tester".into();
    let tally = Tally::default();

    let start = Instant::now();
    thread::scope(|scope| {
        for _ in 0..SPAM_WORKERS {
            scope.spawn(|| {
                for _ in 0..SPAM_REQUESTS / SPAM_WORKERS {
                    tally.record(&library.borrow(book_id, &tester));
                }
            });
        }
    });
    tally.print("spam", start.elapsed());

    let holders = library.reservations_on(book_id)?;
    println!(
        "final state: {} reservation(s) on the contended book",
        holders.len()
    );
    library.reset()?;
    Ok(())
}

/// Stress 2 — randomized concurrent clients: ten users issuing a random
/// borrow/return/renew mix from twenty workers.
pub fn randomized_mix<G: StorageGateway>(library: &ReservationCoordinator<G>) -> Result<()> {
    seed::run_seed(library, None, 20)?;
    let books = library.books()?;
    let users: Vec<HolderId> = (1..=10).map(|i| format!("user_{}", i).into()).collect();
    let tally = Tally::default();

    let start = Instant::now();
    thread::scope(|scope| {
        for _ in 0..MIX_WORKERS {
            scope.spawn(|| {
                let mut rng = rand::thread_rng();
                for _ in 0..MIX_REQUESTS / MIX_WORKERS {
                    let user = &users[rng.gen_range(0..users.len())];
                    match rng.gen_range(0..3) {
                        0 => {
                            let book = &books[rng.gen_range(0..books.len())];
                            tally.record(&library.borrow(book.book_id, user));
                        }
                        1 => {
                            if let Ok(mine) = library.reservations_for(user) {
                                if let Some(r) = mine.choose(&mut rng) {
                                    tally.record(&library.return_book(r.reservation_id, user));
                                }
                            }
                        }
                        _ => {
                            if let Ok(mine) = library.reservations_for(user) {
                                if let Some(r) = mine.choose(&mut rng) {
                                    tally.record(&library.renew(r.reservation_id, user));
                                }
                            }
                        }
                    }
                }
            });
        }
    });
    tally.print("mixed", start.elapsed());
    library.reset()?;
    Ok(())
}

/// Stress 3 — two actors race to borrow every book in the catalog.
pub fn two_rivals<G: StorageGateway>(library: &ReservationCoordinator<G>) -> Result<()> {
    seed::run_seed(library, None, 20)?;
    let books = library.books()?;

    let start = Instant::now();
    thread::scope(|scope| {
        for name in ["alice", "bob"] {
            let books = &books;
            scope.spawn(move || {
                let holder: HolderId = name.into();
                for book in books {
                    let _ = library.borrow(book.book_id, &holder);
                }
            });
        }
    });
    let elapsed = start.elapsed();

    let alice = library.reservations_for(&"alice".into())?.len();
    let bob = library.reservations_for(&"bob".into())?.len();
    println!("rivals: {:.2?}", elapsed);
    println!("alice borrowed {} books", alice);
    println!("bob borrowed {} books", bob);
    println!("together: {} of {}", alice + bob, books.len());
    library.reset()?;
    Ok(())
}
