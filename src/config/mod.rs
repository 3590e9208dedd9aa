//! Run configuration
//!
//! Built once from the command line and the settings file, then passed by
//! reference to every component for the rest of the run.

pub mod kdl;
pub mod settings;

pub use settings::Settings;

use clap::ValueEnum;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Operation {
    /// Archive items and capture application metadata
    Backup,
    /// Run the restore handler of every item with an installer
    Install,
    /// Extract archived paths and replay application metadata
    Restore,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Backup => "backup",
            Operation::Install => "install",
            Operation::Restore => "restore",
        })
    }
}

/// Which catalog items take part in a run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ItemFilter {
    #[default]
    All,
    Only(Vec<String>),
    Exclude(Vec<String>),
}

impl ItemFilter {
    /// Exclusion wins when both lists are given.
    pub fn from_lists(only: &[String], exclude: &[String]) -> Self {
        if !exclude.is_empty() {
            if !only.is_empty() {
                tracing::warn!("Both --only and --exclude given; --only is ignored");
            }
            ItemFilter::Exclude(exclude.to_vec())
        } else if !only.is_empty() {
            ItemFilter::Only(only.to_vec())
        } else {
            ItemFilter::All
        }
    }

    pub fn admits(&self, name: &str) -> bool {
        match self {
            ItemFilter::All => true,
            ItemFilter::Only(names) => names.iter().any(|n| n == name),
            ItemFilter::Exclude(names) => !names.iter().any(|n| n == name),
        }
    }

    /// Names given on the command line.
    pub fn names(&self) -> &[String] {
        match self {
            ItemFilter::All => &[],
            ItemFilter::Only(names) | ItemFilter::Exclude(names) => names,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub operation: Operation,
    pub archive: PathBuf,
    pub metadata_path: PathBuf,
    pub filter: ItemFilter,
    pub encrypt: bool,
    pub dry_run: bool,
    pub verbose: bool,
    pub settings: Settings,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_lists_admit_everything() {
        let filter = ItemFilter::from_lists(&[], &[]);
        assert_eq!(filter, ItemFilter::All);
        assert!(filter.admits("ssh"));
    }

    #[test]
    fn only_admits_listed_names() {
        let filter = ItemFilter::from_lists(&names(&["ssh"]), &[]);
        assert!(filter.admits("ssh"));
        assert!(!filter.admits("git"));
    }

    #[test]
    fn exclude_rejects_listed_names() {
        let filter = ItemFilter::from_lists(&[], &names(&["ssh"]));
        assert!(!filter.admits("ssh"));
        assert!(filter.admits("git"));
    }

    #[test]
    fn exclude_takes_precedence_over_only() {
        let filter = ItemFilter::from_lists(&names(&["ssh"]), &names(&["git"]));
        assert_eq!(filter, ItemFilter::Exclude(names(&["git"])));
        assert!(filter.admits("vscode"));
    }
}
