use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, ExportError>;

/// Error types for the export pipeline
#[derive(Debug, Error)]
pub enum ExportError {
    /// A file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The route table could not be decoded
    #[error("invalid route table {}: {message}", path.display())]
    RouteTable { path: PathBuf, message: String },

    /// The configuration is malformed or inconsistent
    #[error("invalid configuration: {0}")]
    Config(String),

    /// An ignore pattern is not a valid glob
    #[error("invalid ignore pattern `{pattern}`: {message}")]
    InvalidPattern { pattern: String, message: String },

    /// The collection file could not be written
    #[error("failed to write collection to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The collection could not be encoded as JSON
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
