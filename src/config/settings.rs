//! Settings Module
//!
//! Tool locations and environment handling knobs, read from an optional
//! `settings.kdl`:
//!
//! ```kdl
//! settings {
//!     seven-zip "C:/Program Files/7-Zip/7z.exe"
//!     editor "code"
//!     editor-settings "~/AppData/Roaming/Code/User/settings.json"
//!     env-variable "Path"
//!     env-marker "S:"
//!     env-extra "C:/Program Files/7-Zip"
//! }
//! ```

use crate::config::kdl;
use crate::error::{ReimageError, Result};
use crate::utils::paths;
use std::fs;
use std::path::{Path, PathBuf};

const VALID_KEYS: [&str; 6] = [
    "seven-zip",
    "editor",
    "editor-settings",
    "env-variable",
    "env-marker",
    "env-extra",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Archive tool executable
    pub seven_zip: PathBuf,
    /// Editor executable, looked up on the search path
    pub editor: String,
    /// Editor's user settings.json
    pub editor_settings: PathBuf,
    /// User-scope PATH-like variable captured by the environment handler
    pub env_variable: String,
    /// Only entries containing this substring are kept
    pub env_marker: String,
    /// Directories always appended to the captured entries
    pub env_extra: Vec<String>,
}

impl Settings {
    pub fn platform_defaults() -> Result<Self> {
        let seven_zip = if cfg!(windows) {
            PathBuf::from(r"C:\Program Files\7-Zip\7z.exe")
        } else {
            PathBuf::from("7z")
        };

        Ok(Self {
            env_extra: default_extra_dirs(&seven_zip),
            seven_zip,
            editor: "code".to_string(),
            editor_settings: paths::user_config_dir()?
                .join("Code")
                .join("User")
                .join("settings.json"),
            env_variable: if cfg!(windows) { "Path" } else { "PATH" }.to_string(),
            env_marker: "S:".to_string(),
        })
    }

    /// Load settings on top of the platform defaults.
    ///
    /// An explicit path must exist; the default location is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let defaults = Self::platform_defaults()?;

        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = paths::settings_file()?;
                if !path.exists() {
                    return Ok(defaults);
                }
                path
            }
        };

        let content = fs::read_to_string(&path).map_err(|e| ReimageError::IoError {
            path: path.clone(),
            source: e,
        })?;
        tracing::debug!("Loading settings from {}", path.display());
        Self::parse(&content, &path.display().to_string(), defaults)
    }

    /// Apply the `settings { ... }` block of `content` over `base`.
    pub fn parse(content: &str, file: &str, base: Self) -> Result<Self> {
        let doc = kdl::parse_document(content, file)?;
        let mut settings = base;
        let mut extra: Option<Vec<String>> = None;
        let mut seven_zip_changed = false;

        for node in doc.nodes() {
            if node.name().value() != "settings" {
                return Err(ReimageError::ConfigError(format!(
                    "Unexpected node '{}' in {} (expected a settings block)",
                    node.name().value(),
                    file
                )));
            }

            let Some(children) = node.children() else {
                continue;
            };

            for child in children.nodes() {
                let key = child.name().value();
                validate_key(key)?;
                let value = kdl::required_string(child, file)?;
                validate_value(key, &value)?;

                match key {
                    "seven-zip" => {
                        settings.seven_zip = paths::expand_home(Path::new(&value))?;
                        seven_zip_changed = true;
                    }
                    "editor" => settings.editor = value,
                    "editor-settings" => {
                        settings.editor_settings = paths::expand_home(Path::new(&value))?
                    }
                    "env-variable" => settings.env_variable = value,
                    "env-marker" => settings.env_marker = value,
                    "env-extra" => extra.get_or_insert_with(Vec::new).push(value),
                    _ => {}
                }
            }
        }

        settings.env_extra = match extra {
            Some(dirs) => dirs,
            None if seven_zip_changed => default_extra_dirs(&settings.seven_zip),
            None => settings.env_extra,
        };

        Ok(settings)
    }
}

/// On Windows the archive tool's own directory goes onto the user PATH.
fn default_extra_dirs(seven_zip: &Path) -> Vec<String> {
    if !cfg!(windows) {
        return Vec::new();
    }
    seven_zip
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| vec![dir.to_string_lossy().into_owned()])
        .unwrap_or_default()
}

fn validate_key(key: &str) -> Result<()> {
    if !VALID_KEYS.contains(&key) {
        return Err(ReimageError::ConfigError(format!(
            "Unknown setting: '{}'. Valid settings: {}",
            key,
            VALID_KEYS.join(", ")
        )));
    }
    Ok(())
}

fn validate_value(key: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ReimageError::ConfigError(format!(
            "Setting '{}' cannot be empty",
            key
        )));
    }
    Ok(())
}
