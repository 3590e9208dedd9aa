//! Command dispatcher
//!
//! Turns the parsed command line into a run configuration, wires the real
//! process runner, terminal prompt and environment store, and hands over
//! to the item dispatcher.

use crate::catalog::{self, Catalog};
use crate::cli::args::Cli;
use crate::commands::Session;
use crate::config::{ItemFilter, RunConfig, Settings};
use crate::error::Result;
use crate::handlers::HandlerRegistry;
use crate::runner::{Runner, SystemExecutor};
use crate::ui;
use crate::ui::tty::TerminalPrompt;
use crate::utils::platform;

/// Dispatch the parsed CLI to the selected operation
pub fn dispatch(args: &Cli) -> Result<()> {
    let settings = Settings::load(args.settings.as_deref())?;
    let config = build_config(args, settings);

    let handlers = HandlerRegistry::with_defaults();
    let catalog = load_catalog(args, &handlers)?;

    print_summary(&config, &catalog);

    let executor = SystemExecutor;
    let runner = Runner::new(&executor, config.dry_run);
    let prompt = TerminalPrompt;
    let env = platform::user_environment(&runner)?;

    Session {
        config: &config,
        catalog: &catalog,
        handlers: &handlers,
        runner: &runner,
        prompt: &prompt,
        env: env.as_ref(),
    }
    .run()
}

pub(crate) fn build_config(args: &Cli, settings: Settings) -> RunConfig {
    RunConfig {
        operation: args.operation,
        archive: args.archive.clone(),
        metadata_path: args.metadata.clone(),
        filter: ItemFilter::from_lists(&args.only, &args.exclude),
        encrypt: args.encrypt,
        dry_run: args.dry_run,
        verbose: args.verbose,
        settings,
    }
}

fn load_catalog(args: &Cli, handlers: &HandlerRegistry) -> Result<Catalog> {
    let catalog = catalog::load_catalog(args.catalog.as_deref())?;
    catalog.validate_handlers(handlers)?;
    Ok(catalog)
}

fn print_summary(config: &RunConfig, catalog: &Catalog) {
    ui::header(&format!("reimage {}", config.operation));
    ui::keyval("Archive", &config.archive.display().to_string());
    ui::keyval("Metadata", &config.metadata_path.display().to_string());

    let selected: Vec<&str> = catalog
        .entries()
        .iter()
        .filter(|entry| config.filter.admits(&entry.name))
        .map(|entry| entry.name.as_str())
        .collect();
    ui::keyval("Items", &selected.join(", "));

    if config.dry_run {
        ui::keyval("Mode", "dry run");
    }
}
