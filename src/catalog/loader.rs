use super::{ArchiveSpec, Catalog, CatalogEntry, Mechanism, builtin_catalog};
use crate::config::kdl;
use crate::error::{ReimageError, Result};
use crate::utils::paths;
use ::kdl::KdlNode;
use std::fs;
use std::path::Path;

/// Catalog for this run: `explicit` if given, else `catalog.kdl` in the
/// config directory when present, else the built-in list.
pub fn load_catalog(explicit: Option<&Path>) -> Result<Catalog> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let path = paths::catalog_file()?;
            if !path.exists() {
                tracing::debug!("Using built-in catalog");
                return builtin_catalog();
            }
            path
        }
    };

    let content = fs::read_to_string(&path).map_err(|e| ReimageError::IoError {
        path: path.clone(),
        source: e,
    })?;
    tracing::debug!("Loading catalog from {}", path.display());
    parse_catalog(&content, &path.display().to_string())
}

/// Parse a catalog file:
///
/// ```kdl
/// item "syncthing" {
///     path "~/AppData/Local/Syncthing"
///     filter "-xr!*.log"
///     installer "https://example.com/SyncTrayzorSetup-x64.exe"
/// }
/// item "vscode" {
///     handler "editor"
/// }
/// ```
pub fn parse_catalog(content: &str, file: &str) -> Result<Catalog> {
    let doc = kdl::parse_document(content, file)?;
    let mut entries = Vec::new();

    for node in doc.nodes() {
        if node.name().value() != "item" {
            return Err(ReimageError::ConfigError(format!(
                "Unexpected node '{}' in {} (expected item)",
                node.name().value(),
                file
            )));
        }
        entries.push(parse_item(node, file)?);
    }

    Catalog::new(entries)
}

fn parse_item(node: &KdlNode, file: &str) -> Result<CatalogEntry> {
    let name = kdl::required_string(node, file)?;
    let context = format!("item '{}'", name);

    let mut spec = ArchiveSpec::default();
    let mut handler: Option<String> = None;
    let mut installer: Option<String> = None;

    if let Some(children) = node.children() {
        for child in children.nodes() {
            let value = kdl::required_string(child, &context)?;
            match child.name().value() {
                "path" => spec.paths.push(paths::expand_home(Path::new(&value))?),
                "filter" => spec.filters.push(value),
                "handler" => {
                    if handler.replace(value).is_some() {
                        return Err(ReimageError::ConfigError(format!(
                            "{} declares more than one handler",
                            context
                        )));
                    }
                }
                "installer" => installer = Some(value),
                other => {
                    return Err(ReimageError::ConfigError(format!(
                        "Unknown field '{}' in {}",
                        other, context
                    )));
                }
            }
        }
    }

    if spec.paths.is_empty() && !spec.filters.is_empty() {
        return Err(ReimageError::ConfigError(format!(
            "{} declares filters without paths",
            context
        )));
    }

    let mechanism = match (handler, spec.paths.is_empty()) {
        (Some(_), false) => {
            return Err(ReimageError::ConfigError(format!(
                "{} declares both paths and a handler",
                context
            )));
        }
        (Some(id), true) => Mechanism::Handler(id),
        (None, false) => Mechanism::Archive(spec),
        (None, true) => Mechanism::Nothing,
    };

    Ok(CatalogEntry {
        name,
        mechanism,
        installer,
    })
}
