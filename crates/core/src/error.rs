//! Error types for the trade statement normalizer.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the trade statement normalizer.
///
/// Only structural problems are errors. Per-value problems (a bad timestamp,
/// a non-numeric price) degrade to null inside the pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// The document does not have the expected statement layout.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Event tables with different column sets cannot be merged.
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a malformed input error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Error::MalformedInput(msg.into())
    }

    /// Create a schema mismatch error.
    pub fn schema_mismatch(msg: impl Into<String>) -> Self {
        Error::SchemaMismatch(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = Error::malformed("marker 'Open Trades:' not found");
        assert_eq!(
            err.to_string(),
            "Malformed input: marker 'Open Trades:' not found"
        );

        let err = Error::schema_mismatch("Size");
        assert_eq!(err.to_string(), "Schema mismatch: Size");

        let err = Error::config("bad pattern");
        assert_eq!(err.to_string(), "Configuration error: bad pattern");
    }

    #[test]
    fn test_json_conversion() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
