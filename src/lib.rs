pub mod archive;
pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metadata;
pub mod runner;
pub mod ui;
pub mod utils;

#[cfg(test)]
mod testing;

use clap::Parser;
use std::process::exit;

/// Status for any failed or cancelled run
const EXIT_FAILURE: i32 = 1;

/// Run reimage CLI entrypoint.
pub fn run_cli() {
    // 1. Parse (usage errors exit with clap's own status)
    let args = cli::args::Cli::parse();

    // 2. Logging
    utils::logger::init(args.verbose);

    // 3. Signal handling (children share the process group and stop too)
    if let Err(e) = ctrlc::set_handler(|| {
        eprintln!();
        ui::error("Operation cancelled by user.");
        exit(EXIT_FAILURE);
    }) {
        tracing::warn!("Could not install Ctrl-C handler: {}", e);
    }

    // 4. Run
    if let Err(e) = cli::dispatcher::dispatch(&args) {
        tracing::error!("{}", e);
        ui::error(&format!("{}", e));
        exit(EXIT_FAILURE);
    }

    ui::success("Done");
}
