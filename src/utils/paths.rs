use crate::error::{ReimageError, Result};
use directories::{BaseDirs, ProjectDirs, UserDirs};
use std::path::{Path, PathBuf};

pub fn expand_home(path: &Path) -> Result<PathBuf> {
    let path_str = path.to_string_lossy();

    if !path_str.starts_with('~') {
        return Ok(path.to_path_buf());
    }

    let home = home_dir()?;

    if path_str == "~" {
        return Ok(home);
    }

    let stripped = path_str
        .strip_prefix("~/")
        .or_else(|| path_str.strip_prefix("~\\"))
        .ok_or_else(|| ReimageError::PathError(format!("Invalid path format: {}", path_str)))?;

    Ok(home.join(stripped))
}

pub fn home_dir() -> Result<PathBuf> {
    let user_dirs = UserDirs::new().ok_or_else(|| {
        ReimageError::PathError("Could not determine user home directory".to_string())
    })?;
    Ok(user_dirs.home_dir().to_path_buf())
}

fn base_dirs() -> Result<BaseDirs> {
    BaseDirs::new()
        .ok_or_else(|| ReimageError::PathError("Could not determine user directories".to_string()))
}

/// Roaming application data (`%APPDATA%`, `~/.config`, `~/Library/Application Support`)
pub fn user_config_dir() -> Result<PathBuf> {
    Ok(base_dirs()?.config_dir().to_path_buf())
}

/// Machine-local application data (`%LOCALAPPDATA%`, `~/.local/share`)
pub fn local_data_dir() -> Result<PathBuf> {
    Ok(base_dirs()?.data_local_dir().to_path_buf())
}

/// Directory holding this tool's own settings and catalog
pub fn config_dir() -> Result<PathBuf> {
    let proj = ProjectDirs::from("com", "reimage", "reimage").ok_or_else(|| {
        ReimageError::PathError("Could not determine config directory".to_string())
    })?;
    Ok(proj.config_dir().to_path_buf())
}

pub fn settings_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("settings.kdl"))
}

pub fn catalog_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("catalog.kdl"))
}
