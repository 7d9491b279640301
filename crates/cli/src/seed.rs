//! Catalog seeding.
//!
//! Loads `book_id,authors,title` rows from a flat CSV file (keeping only the
//! first listed author), or falls back to a generated sample catalog when no
//! file is given. Seeding truncates every table first.

use anyhow::{Context, Result};
use circulate_circulation::ReservationCoordinator;
use circulate_core::{Book, BookId};
use circulate_store::StorageGateway;
use std::fs;
use std::path::Path;

/// Seed `count` books from `file` (or generated data) into a freshly
/// truncated store.
pub fn run_seed<G: StorageGateway>(
    library: &ReservationCoordinator<G>,
    file: Option<&str>,
    count: usize,
) -> Result<()> {
    let mut books = match file {
        Some(path) => load_catalog(Path::new(path))?,
        None => sample_catalog(),
    };
    books.truncate(count);

    let seeded = library
        .seed_catalog(books)
        .context("seeding the catalog")?;
    println!("Seeded {} books.", seeded);
    Ok(())
}

/// Parse a `book_id,authors,title`-style CSV.
///
/// Plain comma splitting. A multi-author cell produces surplus fields;
/// those are attributed to the authors column and only the first listed
/// author is kept. Rows with too few fields are skipped with a warning
/// rather than failing the whole seed.
pub fn load_catalog(path: &Path) -> Result<Vec<Book>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading catalog file {}", path.display()))?;
    let mut lines = text.lines();

    let header = lines.next().context("catalog file is empty")?;
    let columns: Vec<&str> = header.split(',').map(str::trim).collect();
    let want = |name: &str| {
        columns
            .iter()
            .position(|c| *c == name)
            .with_context(|| format!("catalog file has no {:?} column", name))
    };
    let id_col = want("book_id")?;
    let authors_col = want("authors")?;
    let title_col = want("title")?;
    let width = columns.len();

    let mut books = Vec::new();
    for (number, line) in lines.enumerate() {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() < width {
            tracing::warn!(line = number + 2, "skipping malformed catalog row");
            continue;
        }
        // Splitting on every comma cuts a multi-author cell into several
        // fields. The surplus belongs to the authors column, so columns
        // after it shift right; the piece at the column itself is the
        // first listed author.
        let extra = fields.len() - width;
        let col = |c: usize| if c > authors_col { c + extra } else { c };
        let Ok(book_id) = fields[col(id_col)].parse::<u128>() else {
            tracing::warn!(line = number + 2, "skipping row with non-numeric book_id");
            continue;
        };
        // Source ids are small integers; map them into the UUID space.
        let book_id = BookId::from_uuid(uuid::Uuid::from_u128(book_id));
        let author = fields[authors_col].to_string();
        let title = fields[col(title_col)].to_string();
        if title.is_empty() || author.is_empty() {
            continue;
        }
        books.push(Book {
            book_id,
            author,
            title,
            isbn: 0,
        });
    }
    Ok(books)
}

/// Generated catalog for file-less seeding and the stress drivers.
pub fn sample_catalog() -> Vec<Book> {
    let titles: [(&str, &str); 20] = [
        ("Ursula K. Le Guin", "The Dispossessed"),
        ("Stanisław Lem", "Solaris"),
        ("Jorge Luis Borges", "Ficciones"),
        ("Octavia E. Butler", "Kindred"),
        ("Italo Calvino", "Invisible Cities"),
        ("Mary Shelley", "Frankenstein"),
        ("Fyodor Dostoevsky", "The Idiot"),
        ("Virginia Woolf", "Orlando"),
        ("James Baldwin", "Giovanni's Room"),
        ("Toni Morrison", "Beloved"),
        ("Gabriel García Márquez", "One Hundred Years of Solitude"),
        ("Franz Kafka", "The Castle"),
        ("Herman Melville", "Moby-Dick"),
        ("Emily Brontë", "Wuthering Heights"),
        ("Chinua Achebe", "Things Fall Apart"),
        ("Clarice Lispector", "The Hour of the Star"),
        ("Yukio Mishima", "The Sound of Waves"),
        ("Willa Cather", "My Ántonia"),
        ("Joseph Conrad", "Nostromo"),
        ("George Eliot", "Middlemarch"),
    ];
    titles
        .iter()
        .map(|(author, title)| Book {
            book_id: BookId::new(),
            author: (*author).to_string(),
            title: (*title).to_string(),
            isbn: 0,
        })
        .collect()
}
