//! Error types for Forage

use thiserror::Error;

/// Main error type for Forage
#[derive(Error, Debug)]
pub enum ForageError {
    #[error("Unknown feature extractor: {0}")]
    UnknownExtractor(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Grid error: {0}")]
    Grid(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for Forage operations
pub type Result<T> = std::result::Result<T, ForageError>;
