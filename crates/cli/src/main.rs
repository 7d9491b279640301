//! Circulate CLI — interactive front end and stress drivers.
//!
//! Three modes:
//! - **Menu mode**: `circulate menu --user alice` — interactive prompt
//! - **Seed mode**: `circulate seed --file books.csv --count 20`
//! - **Stress mode**: `circulate stress spam|mixed|rivals`
//!
//! The CLI runs against the in-process store simulator, which makes it a
//! demonstration and harness driver rather than a cluster client; the menu
//! and display mirror the reference console app.

mod commands;
mod format;
mod menu;
mod seed;
mod stress;

use std::process;
use std::sync::Arc;

use circulate_circulation::ReservationCoordinator;
use circulate_core::{CirculationConfig, HolderId};
use circulate_store::MemoryGateway;

use commands::build_cli;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let matches = build_cli().get_matches();

    let gateway = Arc::new(MemoryGateway::new());
    let library = ReservationCoordinator::new(gateway, CirculationConfig::new());

    let exit_code = match matches.subcommand() {
        Some(("menu", sub)) => {
            let user: HolderId = sub
                .get_one::<String>("user")
                .cloned()
                .unwrap_or_else(|| "guest".to_string())
                .into();
            run(menu::run_menu(&library, &user))
        }
        Some(("seed", sub)) => {
            let count = *sub.get_one::<usize>("count").unwrap_or(&20);
            let file = sub.get_one::<String>("file").cloned();
            run(seed::run_seed(&library, file.as_deref(), count))
        }
        Some(("stress", sub)) => match sub.subcommand() {
            Some(("spam", _)) => run(stress::rapid_spam(&library)),
            Some(("mixed", _)) => run(stress::randomized_mix(&library)),
            Some(("rivals", _)) => run(stress::two_rivals(&library)),
            _ => {
                eprintln!("unknown stress test; expected spam, mixed or rivals");
                2
            }
        },
        _ => {
            // No subcommand: menu as guest, matching the reference app.
            run(menu::run_menu(&library, &"guest".into()))
        }
    };

    process::exit(exit_code);
}

fn run(result: anyhow::Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{:#}", e);
            1
        }
    }
}
