//! Console table rendering for catalog and reservation listings.
//!
//! Column widths match the reference console app: 36 for UUIDs, 20/30/40
//! for names and titles, truncating rather than wrapping.

use circulate_core::{Book, Reservation};
use chrono::{DateTime, Utc};

fn clip(s: &str, width: usize) -> String {
    s.chars().take(width).collect()
}

/// Render the full catalog as a table.
pub fn catalog_table(books: &[Book]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "\n{:36} | {:20} | {:40}\n",
        "Book ID", "Author", "Title"
    ));
    out.push_str(&"-".repeat(100));
    out.push('\n');
    for book in books {
        out.push_str(&format!(
            "{:36} | {:20} | {:40}\n",
            book.book_id.to_string(),
            clip(&book.author, 20),
            clip(&book.title, 40),
        ));
    }
    out
}

/// Render one holder's reservations, with titles resolved where known.
///
/// `titles` pairs each reservation with the catalog title, `None` when the
/// catalog row is missing (seeded away, for instance).
pub fn reservations_table(rows: &[(Reservation, Option<String>)]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "\n{:36} | {:30} | {:10}\n",
        "Reservation ID", "Title", "Due Date"
    ));
    out.push_str(&"-".repeat(80));
    out.push('\n');
    for (reservation, title) in rows {
        out.push_str(&format!(
            "{:36} | {:30} | {:10}\n",
            reservation.reservation_id.to_string(),
            clip(title.as_deref().unwrap_or("(unknown)"), 30),
            due_date(&reservation.due_at),
        ));
    }
    out
}

/// Due dates display as day/month/year, as the reference app prints them.
pub fn due_date(due_at: &DateTime<Utc>) -> String {
    due_at.format("%d/%m/%Y").to_string()
}
