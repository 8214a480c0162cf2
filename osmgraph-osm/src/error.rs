//! Error types for the OSM entity layer.

/// Error type for entity and index operations.
#[derive(Debug, thiserror::Error)]
pub enum OsmError {
    /// I/O error from a disk-backed index.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for entity and index operations.
pub type Result<T> = std::result::Result<T, OsmError>;
