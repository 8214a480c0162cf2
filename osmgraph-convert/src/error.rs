//! Error types for the conversion pipeline.

/// Error type for pipeline operations.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// I/O error on input, cache, or output files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the serialization writer.
    #[error("writer error: {0}")]
    Rdf(#[from] osmgraph_rdf::RdfError),

    /// Error from the entity layer or location index.
    #[error("entity error: {0}")]
    Osm(#[from] osmgraph_osm::OsmError),

    /// Error from the OSM reader.
    #[error("OSM input error: {0}")]
    Pbf(#[from] osmpbf::Error),

    /// A worker disappeared while batches were still queued.
    #[error("worker channel closed")]
    ChannelClosed,

    /// The run was cancelled after a fatal worker error.
    #[error("run cancelled")]
    Cancelled,

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, ConvertError>;
