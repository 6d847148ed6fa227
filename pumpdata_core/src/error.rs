//! Error types for the pumpdata_core library.
//!
//! These cover operational failures only. Problems found in the data itself
//! are accumulated as [`crate::structure::Issue`]s and never surface here.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for pumpdata_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input document is not a datum object this library understands
    #[error("Unsupported document: {0}")]
    UnsupportedDocument(String),

    /// One or more documents reported validation issues
    #[error("{0} validation issue(s) reported")]
    Invalid(usize),
}
