//! Error types for LMSS Core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LmssError {
    /// Statement stream could not be read; graph construction aborted
    #[error("Ingest error: {0}")]
    Ingest(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Unknown concept type: {0}")]
    UnknownConceptType(String),

    #[error("Unknown key concept: {0}")]
    UnknownKeyConcept(String),

    #[error("Concept not found: {0}")]
    NotFound(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    RegexError(String),
}

impl From<regex::Error> for LmssError {
    fn from(err: regex::Error) -> Self {
        LmssError::RegexError(err.to_string())
    }
}

impl From<reqwest::Error> for LmssError {
    fn from(err: reqwest::Error) -> Self {
        LmssError::Fetch(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LmssError>;
