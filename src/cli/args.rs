use crate::config::Operation;
use crate::metadata::DEFAULT_METADATA_FILE;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "reimage",
    about = "Back up, restore and reinstall personal configuration",
    long_about = "Personal configuration snapshot tool: archives selected files into a 7z \
                  archive, records editor and environment state as JSON metadata, and \
                  replays both onto a fresh machine",
    version,
    next_line_help = false,
    term_width = 80
)]
pub struct Cli {
    /// What to do with the selected items
    #[arg(value_enum)]
    pub operation: Operation,

    /// Archive to create or read
    #[arg(long, value_name = "FILE", default_value = "backup.7z")]
    pub archive: PathBuf,

    /// Only process these items (repeatable)
    #[arg(short = 'o', long = "only", value_name = "ITEM")]
    pub only: Vec<String>,

    /// Skip these items (repeatable, wins over --only)
    #[arg(short = 'x', long = "exclude", value_name = "ITEM")]
    pub exclude: Vec<String>,

    /// Protect the archive with a password
    #[arg(short = 'e', long)]
    pub encrypt: bool,

    /// Log destructive commands instead of running them
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Verbose output
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Metadata JSON file written next to the archive
    #[arg(long, value_name = "FILE", default_value = DEFAULT_METADATA_FILE, help_heading = "Advanced")]
    pub metadata: PathBuf,

    /// Item catalog (KDL) replacing the built-in one
    #[arg(long, value_name = "FILE", help_heading = "Advanced")]
    pub catalog: Option<PathBuf>,

    /// Settings file (KDL) overriding tool locations
    #[arg(long, value_name = "FILE", help_heading = "Advanced")]
    pub settings: Option<PathBuf>,
}
