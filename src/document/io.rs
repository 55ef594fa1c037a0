use super::{InputDocument, OutputDocument};
use crate::error::DocumentError;
use serde::Serialize;
use serde::ser::Error as _;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Loads an editor document from a JSON file.
pub fn load_document(path: impl AsRef<Path>) -> Result<InputDocument, DocumentError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| DocumentError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(&content)
}

/// Parses an editor document from a JSON string.
pub fn parse_document(json: &str) -> Result<InputDocument, DocumentError> {
    serde_json::from_str(json).map_err(DocumentError::Parse)
}

/// Pretty-prints the output document with `indent` spaces per level.
pub fn to_pretty_json(document: &OutputDocument, indent: usize) -> Result<String, DocumentError> {
    let indent = " ".repeat(indent);
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    document
        .serialize(&mut serializer)
        .map_err(DocumentError::Serialize)?;
    String::from_utf8(buf).map_err(|e| DocumentError::Serialize(serde_json::Error::custom(e)))
}

/// Writes the output document to `path`.
///
/// The document is rendered fully in memory, written to a temporary file next
/// to the destination and then renamed over it, so a failure never leaves a
/// truncated configuration behind.
pub fn store_document(
    path: impl AsRef<Path>,
    document: &OutputDocument,
    indent: usize,
) -> Result<(), DocumentError> {
    let path = path.as_ref();
    let json = to_pretty_json(document, indent)?;

    let write_error = |source: std::io::Error| DocumentError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir).map_err(write_error)?;
    staged.write_all(json.as_bytes()).map_err(write_error)?;
    staged.flush().map_err(write_error)?;
    staged.persist(path).map_err(|e| write_error(e.error))?;

    tracing::debug!(path = %path.display(), bytes = json.len(), "stored converted document");
    Ok(())
}
