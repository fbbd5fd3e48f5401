//! Error types for the PoseMatch engine.
//!
//! Per-frame degeneracies (missing landmarks, empty history, no comparable
//! joints) are modeled as values collapsing to `Unknown`, never as errors.
//! This enum covers only startup and configuration faults.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("landmark scheme mismatch: expected {expected} landmarks, got {actual}")]
    SchemeMismatch { expected: usize, actual: usize },

    #[error("degenerate exemplar '{name}': {reason}")]
    DegenerateExemplar { name: String, reason: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
