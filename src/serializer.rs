//! Serialization module for writing collection documents to disk.
//!
//! The collection is rendered as pretty-printed JSON and written to
//! `<output dir>/<collection name> <timestamp>.json`.

use crate::collection::CollectionDocument;
use crate::error::{ExportError, Result};
use chrono::{DateTime, Local, TimeZone};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Timestamp format used in output file names (no `:` so the name is valid everywhere)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H-%M-%S";

/// Serializes a collection document to pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails, which the document model does not allow in
/// practice.
pub fn serialize_json(doc: &CollectionDocument) -> Result<String> {
    debug!("Serializing collection document to JSON");
    Ok(serde_json::to_string_pretty(doc)?)
}

/// File name for a collection exported at `timestamp`: `<name> <timestamp>.json`
pub fn collection_file_name<Tz>(collection_name: &str, timestamp: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{} {}.json",
        collection_name,
        timestamp.format(TIMESTAMP_FORMAT)
    )
}

/// Writes string content to a file, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ExportError::Write`] naming `path` if a directory cannot be created or the
/// file cannot be written.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| ExportError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }

    fs::write(path, content).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

/// Serializes `doc` and writes it into `output_dir`, named after the collection and the
/// current local time. Returns the full path of the written file.
pub fn write_collection(doc: &CollectionDocument, output_dir: &Path) -> Result<PathBuf> {
    write_collection_at(doc, output_dir, &Local::now())
}

/// Like [`write_collection`], with an explicit timestamp
pub fn write_collection_at<Tz>(
    doc: &CollectionDocument,
    output_dir: &Path,
    timestamp: &DateTime<Tz>,
) -> Result<PathBuf>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let json = serialize_json(doc)?;
    let path = output_dir.join(collection_file_name(&doc.info.name, timestamp));
    write_to_file(&json, &path)?;
    Ok(path)
}
