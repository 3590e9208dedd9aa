use super::{HandlerContext, ItemHandler, recorded_payload, string_list};
use crate::error::{ReimageError, Result};
use crate::metadata::MetadataDocument;
use crate::runner::{CommandLine, Effect};
use crate::utils::file_ops;
use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;

const EXTENSIONS_KEY: &str = "extensions";
const SETTINGS_KEY: &str = "settings";

/// Editor extensions and user settings
pub struct EditorHandler;

impl EditorHandler {
    fn locate(ctx: &HandlerContext<'_>) -> Option<PathBuf> {
        let editor = &ctx.config.settings.editor;
        let found = ctx.runner.resolve(editor);
        if found.is_none() {
            tracing::error!("{} not installed, skipping", editor);
        }
        found
    }
}

impl ItemHandler for EditorHandler {
    fn backup(
        &self,
        item: &str,
        ctx: &HandlerContext<'_>,
        metadata: &mut MetadataDocument,
    ) -> Result<()> {
        let Some(editor) = Self::locate(ctx) else {
            return Ok(());
        };

        let listing = ctx.runner.run(
            &CommandLine::new(&editor).arg("--list-extensions"),
            Effect::ReadOnly,
        )?;
        let extensions: Vec<Value> = listing
            .split_whitespace()
            .map(|ext| Value::String(ext.to_string()))
            .collect();

        let mut payload = Map::new();
        payload.insert(EXTENSIONS_KEY.to_string(), Value::Array(extensions));

        let settings_path = &ctx.config.settings.editor_settings;
        if settings_path.exists() {
            let content = fs::read_to_string(settings_path).map_err(|e| ReimageError::IoError {
                path: settings_path.clone(),
                source: e,
            })?;
            let settings: Value =
                serde_json::from_str(&content).map_err(|e| ReimageError::ParseError {
                    file: settings_path.display().to_string(),
                    message: e.to_string(),
                })?;
            payload.insert(SETTINGS_KEY.to_string(), settings);
        } else {
            tracing::warn!(
                "No editor settings at {}, recording extensions only",
                settings_path.display()
            );
        }

        metadata.insert(item, Value::Object(payload));
        Ok(())
    }

    fn restore(
        &self,
        item: &str,
        ctx: &HandlerContext<'_>,
        metadata: &MetadataDocument,
    ) -> Result<()> {
        let Some(editor) = Self::locate(ctx) else {
            return Ok(());
        };
        let Some(payload) = recorded_payload(item, metadata) else {
            return Ok(());
        };

        for extension in string_list(payload, EXTENSIONS_KEY) {
            tracing::info!("Installing editor extension: {}", extension);
            ctx.runner.run(
                &CommandLine::new(&editor)
                    .arg("--install-extension")
                    .arg(&extension),
                Effect::Destructive,
            )?;
        }

        if let Some(settings) = payload.get(SETTINGS_KEY) {
            file_ops::write_file(
                &ctx.config.settings.editor_settings,
                &file_ops::to_pretty_json(settings)?,
                ctx.config.dry_run,
            )?;
        }

        Ok(())
    }
}
