//! Interactive circulation menu.
//!
//! Line-oriented prompt mirroring the reference console app: list the
//! catalog, list your reservations, borrow, return, renew, run a stress
//! test, exit. Contention outcomes print as normal messages, never as
//! errors.

use crate::{format, seed, stress};
use anyhow::Result;
use circulate_circulation::ReservationCoordinator;
use circulate_core::{CirculationError, HolderId, Reservation, ReservationId};
use circulate_store::StorageGateway;
use std::io::{self, BufRead, Write};

const MENU: &str = "\n1: Show all books\n\
2: Show your borrowed books\n\
3: Borrow a book\n\
4: Return a book\n\
5: Extend a reservation\n\
6: Run stress tests\n\
0: Exit\n> ";

/// Run the menu loop until the user exits or stdin closes.
pub fn run_menu<G: StorageGateway>(
    library: &ReservationCoordinator<G>,
    user: &HolderId,
) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("{}", MENU);
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let choice = line?.trim().to_string();

        match choice.as_str() {
            "1" => print!("{}", format::catalog_table(&library.books()?)),
            "2" => show_borrowed(library, user)?,
            "3" => {
                print!("Enter book ID to borrow: ");
                io::stdout().flush()?;
                let Some(input) = lines.next() else { break };
                borrow(library, user, input?.trim());
            }
            "4" => {
                print!("Enter reservation ID to return: ");
                io::stdout().flush()?;
                let Some(input) = lines.next() else { break };
                return_book(library, user, input?.trim());
            }
            "5" => {
                print!("Enter reservation ID to extend: ");
                io::stdout().flush()?;
                let Some(input) = lines.next() else { break };
                renew(library, user, input?.trim());
            }
            "6" => {
                println!("\nAvailable stress tests:");
                println!("1: Same client rapid requests");
                println!("2: Randomized multi-client requests");
                println!("3: Competing clients fill all reservations");
                print!("Select test number: ");
                io::stdout().flush()?;
                let Some(input) = lines.next() else { break };
                match input?.trim() {
                    "1" => stress::rapid_spam(library)?,
                    "2" => stress::randomized_mix(library)?,
                    "3" => stress::two_rivals(library)?,
                    other => println!("Unknown test {:?}.", other),
                }
            }
            "7" => {
                // Undocumented helper: reseed with sample data.
                seed::run_seed(library, None, 20)?;
            }
            "0" => {
                println!("Goodbye!");
                break;
            }
            _ => println!("Unknown option. Try again."),
        }
    }
    Ok(())
}

fn show_borrowed<G: StorageGateway>(
    library: &ReservationCoordinator<G>,
    user: &HolderId,
) -> Result<()> {
    let reservations = library.reservations_for(user)?;
    if reservations.is_empty() {
        println!("{} has no borrowed books.", user);
        return Ok(());
    }
    println!("\nBorrowed books for {}", user);
    let rows: Vec<(Reservation, Option<String>)> = reservations
        .into_iter()
        .map(|reservation| {
            let title = library
                .book(reservation.book_id)
                .ok()
                .flatten()
                .map(|book| book.title);
            (reservation, title)
        })
        .collect();
    print!("{}", format::reservations_table(&rows));
    Ok(())
}

fn borrow<G: StorageGateway>(library: &ReservationCoordinator<G>, user: &HolderId, input: &str) {
    match library.borrow_by_str(input, user) {
        Ok(reservation) => println!(
            "Borrowed. Reservation {} due {}.",
            reservation.reservation_id,
            format::due_date(&reservation.due_at)
        ),
        Err(e) => report(e),
    }
}

fn return_book<G: StorageGateway>(
    library: &ReservationCoordinator<G>,
    user: &HolderId,
    input: &str,
) {
    let Ok(reservation_id) = input.parse::<ReservationId>() else {
        println!("Invalid reservation ID");
        return;
    };
    match library.return_book(reservation_id, user) {
        Ok(book_id) => println!("Returned book {}.", book_id),
        Err(e) => report(e),
    }
}

fn renew<G: StorageGateway>(library: &ReservationCoordinator<G>, user: &HolderId, input: &str) {
    let Ok(reservation_id) = input.parse::<ReservationId>() else {
        println!("Invalid reservation ID");
        return;
    };
    match library.renew(reservation_id, user) {
        Ok(new_due) => println!("Renewed until {}.", format::due_date(&new_due)),
        Err(e) => report(e),
    }
}

fn report(e: CirculationError) {
    match e {
        CirculationError::InvalidBookId { .. } => println!("Invalid book ID"),
        CirculationError::AlreadyBorrowed { .. } => println!("Book already borrowed"),
        CirculationError::BookLocked { .. } => println!("Book is currently locked"),
        CirculationError::BookUnavailable { .. } => println!("Book is not available"),
        CirculationError::ReservationNotFound { .. } => println!("Reservation not found"),
        CirculationError::Store(e) => println!("Store failure: {}", e),
    }
}
