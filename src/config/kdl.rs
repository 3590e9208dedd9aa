//! Shared KDL plumbing for the settings file and the item catalog

use crate::error::{ReimageError, Result};
use kdl::{KdlDocument, KdlError, KdlNode};
use std::fmt::Write;

/// Parse a KDL document, turning diagnostics into `file:line:col: message` lines.
pub fn parse_document(content: &str, file: &str) -> Result<KdlDocument> {
    content.parse().map_err(|e: KdlError| ReimageError::ParseError {
        file: file.to_string(),
        message: format_diagnostics(content, file, &e),
    })
}

fn format_diagnostics(content: &str, file: &str, error: &KdlError) -> String {
    if error.diagnostics.is_empty() {
        return "Failed to parse KDL document".to_string();
    }

    let mut report = String::new();
    for diag in &error.diagnostics {
        let (line, col) = offset_to_line_col(content, diag.span.offset());
        let message = diag
            .message
            .clone()
            .unwrap_or_else(|| "Parse error".to_string());
        let _ = write!(&mut report, "\n  {}:{}:{}: {}", file, line, col, message);
        if let Some(help) = &diag.help {
            let _ = write!(&mut report, " (hint: {})", help);
        }
    }
    report
}

fn offset_to_line_col(content: &str, offset: usize) -> (usize, usize) {
    let before = &content[..offset.min(content.len())];
    let line = before.matches('\n').count() + 1;
    let col = before.rfind('\n').map_or(before.len(), |nl| before.len() - nl - 1) + 1;
    (line, col)
}

/// Get first string value from a KDL node
pub fn first_string(node: &KdlNode) -> Option<String> {
    if let Some(entry) = node.entries().first()
        && let Some(val) = entry.value().as_string()
    {
        return Some(val.to_string());
    }
    None
}

/// First string argument, or an error naming the node and its context.
pub fn required_string(node: &KdlNode, context: &str) -> Result<String> {
    first_string(node).ok_or_else(|| {
        ReimageError::ConfigError(format!(
            "'{}' in {} expects a string value",
            node.name().value(),
            context
        ))
    })
}
