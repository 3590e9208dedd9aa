//! Metadata side-car
//!
//! Handlers record application state here during backup (extension lists,
//! settings objects, filtered PATH entries) and read it back on restore. The
//! document is keyed by catalog item name. Path-only items never add a key.

use crate::error::{ReimageError, Result};
use crate::utils::file_ops;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Default side-car location, relative to the working directory
pub const DEFAULT_METADATA_FILE: &str = "metadata.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataDocument {
    items: Map<String, Value>,
}

impl MetadataDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.items.get(key)
    }

    /// Store `payload` under `key`, replacing anything recorded before.
    pub fn insert(&mut self, key: impl Into<String>, payload: Value) {
        self.items.insert(key.into(), payload);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn to_pretty_string(&self) -> Result<String> {
        file_ops::to_pretty_json(self)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ReimageError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;

        serde_json::from_str(&content).map_err(|e| ReimageError::ParseError {
            file: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Overwrite `path` with the whole document.
    ///
    /// Not subject to dry-run: metadata capture always lands on disk.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_pretty_string()?;
        tracing::debug!("metadata:\n{}", content);
        tracing::info!("Writing {}", path.display());
        file_ops::write_atomically(path, &content)
    }
}
