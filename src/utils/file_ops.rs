use crate::error::{ReimageError, Result};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Serialize as pretty JSON with four-space indentation.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(|e| ReimageError::ConfigError(format!("Invalid UTF-8 in JSON: {}", e)))
}

/// Write `data` to `path`, or only log it when `dry_run` is set.
pub fn write_file(path: &Path, data: &str, dry_run: bool) -> Result<()> {
    tracing::info!("Writing {}", path.display());

    if dry_run {
        tracing::debug!("Dry run:\n{}", data);
        return Ok(());
    }

    write_atomically(path, data)
}

/// Replace `path` through a sibling temp file so readers never see half a file.
pub fn write_atomically(path: &Path, data: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    fs::create_dir_all(dir).map_err(|e| ReimageError::IoError {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let file_name = path
        .file_name()
        .ok_or_else(|| ReimageError::PathError(format!("Not a file path: {}", path.display())))?;
    let tmp_path = dir.join(format!(".{}.tmp", file_name.to_string_lossy()));

    let mut tmp_file = fs::File::create(&tmp_path).map_err(|e| ReimageError::IoError {
        path: tmp_path.clone(),
        source: e,
    })?;
    tmp_file
        .write_all(data.as_bytes())
        .and_then(|()| tmp_file.sync_all())
        .map_err(|e| ReimageError::IoError {
            path: tmp_path.clone(),
            source: e,
        })?;
    drop(tmp_file);

    fs::rename(&tmp_path, path).map_err(|e| ReimageError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
