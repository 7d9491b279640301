//! Lock TTL expiry: the only recovery path from a crashed holder.

use crate::common::*;
use circulate::prelude::*;
use std::thread;
use std::time::Duration;

const SHORT_TTL: Duration = Duration::from_millis(40);

#[test]
fn abandoned_lock_blocks_until_ttl_then_frees() {
    let t = TestLibrary::with_lock_ttl(SHORT_TTL);
    let book_id = BookId::new();

    // Claim and never convert — models a crash between lock and batch.
    assert!(t.library.locks().acquire(book_id, &holder("crashed")).unwrap());

    // Before expiry: borrowable by no one.
    let err = t.library.borrow(book_id, &holder("alice")).unwrap_err();
    assert_eq!(err, CirculationError::BookLocked { book_id });

    thread::sleep(SHORT_TTL * 2);

    // After expiry: a different holder goes through.
    t.library.borrow(book_id, &holder("alice")).unwrap();
}

#[test]
fn expired_lock_does_not_resurrect_for_its_old_holder() {
    let t = TestLibrary::with_lock_ttl(SHORT_TTL);
    let book_id = BookId::new();
    let alice = holder("alice");

    assert!(t.library.locks().acquire(book_id, &alice).unwrap());
    thread::sleep(SHORT_TTL * 2);

    assert_eq!(t.library.locks().owner_of(book_id).unwrap(), None);
}

#[test]
fn release_is_idempotent_even_after_expiry() {
    let t = TestLibrary::with_lock_ttl(SHORT_TTL);
    let book_id = BookId::new();

    assert!(t.library.locks().acquire(book_id, &holder("alice")).unwrap());
    thread::sleep(SHORT_TTL * 2);

    // Releasing an expired (hence absent) lock is a no-op, not an error.
    t.library.locks().release(book_id).unwrap();
    t.library.locks().release(book_id).unwrap();
}

#[test]
fn reacquire_after_release_does_not_wait_for_ttl() {
    let t = TestLibrary::with_lock_ttl(Duration::from_secs(30));
    let book_id = BookId::new();

    assert!(t.library.locks().acquire(book_id, &holder("alice")).unwrap());
    t.library.locks().release(book_id).unwrap();
    assert!(t.library.locks().acquire(book_id, &holder("bob")).unwrap());
}
