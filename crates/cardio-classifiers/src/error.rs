//! Error type shared by every stage of the prediction pipeline.
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PredictorError>;

#[derive(Error, Debug)]
pub enum PredictorError {
    /// A required artifact file is absent; the pipeline refuses to start.
    #[error("Missing artifact file: {}", .0.display())]
    MissingArtifact(PathBuf),

    #[error("Failed to read artifact {}: {source}", .path.display())]
    ArtifactRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse artifact {}: {source}", .path.display())]
    ArtifactParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Artifact pieces disagree with each other or with the record schema.
    #[error("Artifact mismatch: {0}")]
    ArtifactMismatch(String),

    #[error("Failed to load model from {}: {reason}", .path.display())]
    ModelLoad { path: PathBuf, reason: String },

    #[error("Invalid input for '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PredictorError {
    pub(crate) fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        PredictorError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
