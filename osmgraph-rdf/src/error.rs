//! Error types for RDF serialization

/// Error type for the serialization writer
#[derive(Debug, thiserror::Error)]
pub enum RdfError {
    /// Byte does not start or continue a valid UTF-8 sequence
    #[error("invalid UTF-8 sequence byte: 0x{0:02X}")]
    InvalidUtf8(u8),

    /// Character not admissible in the PN_PREFIX production
    #[error("invalid PN_PREFIX codepoint U+{codepoint:04X} in '{input}'")]
    InvalidPnPrefix { codepoint: u32, input: String },

    /// Language tag failed validation
    #[error("invalid language tag: '{0}'")]
    InvalidLangTag(String),

    /// A prefix label was bound twice
    #[error("prefix already defined: '{0}'")]
    PrefixAlreadyDefined(String),

    /// Prefix registration after the table was frozen for output
    #[error("prefix table is frozen, cannot register '{0}'")]
    PrefixTableFrozen(String),

    /// I/O error from the output sink
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error from the statistics sink
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for writer operations
pub type Result<T> = std::result::Result<T, RdfError>;
