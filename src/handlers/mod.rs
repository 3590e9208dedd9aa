//! # Application handlers
//!
//! Items whose state is more than a set of files delegate to a handler. A
//! handler is a backup/restore pair that reads or writes the item's entry in
//! the [`MetadataDocument`], and may run external commands or touch OS state
//! along the way.
//!
//! Handlers are registered by id in a [`HandlerRegistry`]; catalog items refer
//! to them by that id.
//!
//! ## Adding a New Handler
//!
//! 1. Create `src/handlers/<name>.rs` with a struct implementing [`ItemHandler`]
//! 2. Register it in [`HandlerRegistry::with_defaults`]
//! 3. Point a catalog item at it with `handler "<id>"`

mod editor;
mod environment;

pub use editor::EditorHandler;
pub use environment::EnvironmentHandler;

use crate::config::RunConfig;
use crate::error::{ReimageError, Result};
use crate::metadata::MetadataDocument;
use crate::runner::Runner;
use crate::utils::platform::EnvironmentStore;
use std::collections::HashMap;

/// What a handler may reach during a run
pub struct HandlerContext<'a> {
    pub config: &'a RunConfig,
    pub runner: &'a Runner<'a>,
    pub env: &'a dyn EnvironmentStore,
}

pub trait ItemHandler {
    /// Record state for `item` into `metadata`.
    fn backup(
        &self,
        item: &str,
        ctx: &HandlerContext<'_>,
        metadata: &mut MetadataDocument,
    ) -> Result<()>;

    /// Replay the state recorded for `item`.
    fn restore(&self, item: &str, ctx: &HandlerContext<'_>, metadata: &MetadataDocument)
    -> Result<()>;
}

pub struct HandlerRegistry {
    handlers: HashMap<String, Box<dyn ItemHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("environment", EnvironmentHandler);
        registry.register("editor", EditorHandler);
        registry
    }

    pub fn register(&mut self, id: &str, handler: impl ItemHandler + 'static) {
        self.handlers.insert(id.to_string(), Box::new(handler));
    }

    pub fn contains(&self, id: &str) -> bool {
        self.handlers.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Result<&dyn ItemHandler> {
        self.handlers
            .get(id)
            .map(|h| h.as_ref())
            .ok_or_else(|| ReimageError::UnknownHandler(id.to_string()))
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Payload recorded for `item`, or `None` (with a warning) when the backup never stored one.
fn recorded_payload<'m>(item: &str, metadata: &'m MetadataDocument) -> Option<&'m serde_json::Value> {
    let payload = metadata.get(item);
    if payload.is_none() {
        tracing::warn!("No metadata recorded for {}, skipping", item);
    }
    payload
}

/// String array stored under `field` of a payload object.
fn string_list(payload: &serde_json::Value, field: &str) -> Vec<String> {
    payload
        .get(field)
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
