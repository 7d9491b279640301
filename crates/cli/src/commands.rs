//! CLI definition.
//!
//! Builder-style clap tree; parsing of values happens at the call sites.

use clap::{Arg, ArgAction, Command};

/// Build the top-level CLI.
pub fn build_cli() -> Command {
    Command::new("circulate")
        .about("Distributed reservation-locking demo and stress driver")
        .subcommand(
            Command::new("menu")
                .about("Interactive circulation menu")
                .arg(
                    Arg::new("user")
                        .long("user")
                        .short('u')
                        .help("Username to act as")
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            Command::new("seed")
                .about("Truncate the store and seed the catalog")
                .arg(
                    Arg::new("file")
                        .long("file")
                        .help("CSV file with book_id,authors,title columns")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("count")
                        .long("count")
                        .short('n')
                        .help("Number of books to seed")
                        .value_parser(clap::value_parser!(usize))
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            Command::new("stress")
                .about("Concurrent contention harnesses")
                .subcommand(Command::new("spam").about("One book, 5000 borrows from 16 threads"))
                .subcommand(
                    Command::new("mixed")
                        .about("Randomized borrow/return/renew mix from 20 workers"),
                )
                .subcommand(
                    Command::new("rivals").about("Two actors racing over the whole catalog"),
                ),
        )
}
