use super::{HandlerContext, ItemHandler, recorded_payload, string_list};
use crate::error::Result;
use crate::metadata::MetadataDocument;
use crate::utils::platform::PATH_DELIMITER;
use serde_json::json;

const PATH_KEY: &str = "path";

/// Carries the user's own PATH entries (those on the marked drive) across a reimage
pub struct EnvironmentHandler;

impl ItemHandler for EnvironmentHandler {
    fn backup(
        &self,
        item: &str,
        ctx: &HandlerContext<'_>,
        metadata: &mut MetadataDocument,
    ) -> Result<()> {
        let settings = &ctx.config.settings;
        let current = ctx.env.read(&settings.env_variable)?.unwrap_or_default();

        let mut entries: Vec<String> = current
            .split(PATH_DELIMITER)
            .filter(|entry| entry.contains(settings.env_marker.as_str()))
            .map(str::to_string)
            .collect();
        entries.extend(settings.env_extra.iter().cloned());

        tracing::debug!("Keeping {} entries of {}", entries.len(), settings.env_variable);
        metadata.insert(item, json!({ PATH_KEY: entries }));
        Ok(())
    }

    fn restore(
        &self,
        item: &str,
        ctx: &HandlerContext<'_>,
        metadata: &MetadataDocument,
    ) -> Result<()> {
        let Some(payload) = recorded_payload(item, metadata) else {
            return Ok(());
        };

        if !payload.get(PATH_KEY).is_some_and(|entries| entries.is_array()) {
            tracing::warn!("No {} list recorded for {}, skipping", PATH_KEY, item);
            return Ok(());
        }

        let variable = &ctx.config.settings.env_variable;
        let value = string_list(payload, PATH_KEY).join(&PATH_DELIMITER.to_string());

        if ctx.config.dry_run {
            tracing::info!("Dry run: set {} to {}", variable, value);
            return Ok(());
        }

        tracing::info!("Setting {}", variable);
        ctx.env.write(variable, &value)
    }
}
