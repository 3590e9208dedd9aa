//! Item catalog
//!
//! The fixed list of named things a run can back up, restore or install.
//! Each item archives a set of paths, delegates to a registered handler, or
//! does nothing beyond carrying an installer URL.

mod builtin;
mod loader;

pub use builtin::builtin_catalog;
pub use loader::{load_catalog, parse_catalog};

use crate::config::ItemFilter;
use crate::error::{ReimageError, Result};
use crate::handlers::HandlerRegistry;
use std::collections::HashSet;
use std::path::PathBuf;

/// Paths handed to the archive tool verbatim
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArchiveSpec {
    pub paths: Vec<PathBuf>,
    /// Archive tool exclusion switches, e.g. `-xr!*.log`
    pub filters: Vec<String>,
}

/// How an item is backed up and restored
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mechanism {
    /// Install-only placeholder
    #[default]
    Nothing,
    Archive(ArchiveSpec),
    /// Id of a handler in the [`HandlerRegistry`]
    Handler(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    pub mechanism: Mechanism,
    /// Where to download the application; only ever shown to the user
    pub installer: Option<String>,
}

impl CatalogEntry {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            mechanism: Mechanism::Nothing,
            installer: None,
        }
    }

    pub fn paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.mechanism = Mechanism::Archive(ArchiveSpec {
            paths: paths.into_iter().map(Into::into).collect(),
            filters: Vec::new(),
        });
        self
    }

    pub fn filters(mut self, filters: &[&str]) -> Self {
        if let Mechanism::Archive(spec) = &mut self.mechanism {
            spec.filters = filters.iter().map(|f| f.to_string()).collect();
        }
        self
    }

    pub fn handler(mut self, id: &str) -> Self {
        self.mechanism = Mechanism::Handler(id.to_string());
        self
    }

    pub fn installer(mut self, url: &str) -> Self {
        self.installer = Some(url.to_string());
        self
    }
}

/// Ordered, name-unique list of items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.name.as_str()) {
                return Err(ReimageError::ConfigError(format!(
                    "Duplicate catalog item: '{}'",
                    entry.name
                )));
            }
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Items admitted by `filter`, in catalog order.
    pub fn select(&self, filter: &ItemFilter) -> Vec<&CatalogEntry> {
        for name in filter.names() {
            if self.get(name).is_none() {
                tracing::warn!("'{}' does not match any catalog item", name);
            }
        }

        self.entries
            .iter()
            .filter(|e| filter.admits(&e.name))
            .collect()
    }

    /// Every handler id used by an item must be registered.
    pub fn validate_handlers(&self, handlers: &HandlerRegistry) -> Result<()> {
        for entry in &self.entries {
            if let Mechanism::Handler(id) = &entry.mechanism
                && !handlers.contains(id)
            {
                return Err(ReimageError::ConfigError(format!(
                    "Item '{}' uses unknown handler '{}'",
                    entry.name, id
                )));
            }
        }
        Ok(())
    }
}
