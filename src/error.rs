// Error taxonomy shared by the trainer and every prediction surface

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    // ========================================================================
    // ARTIFACT (fatal at predictor startup)
    // ========================================================================
    #[error("model artifact not found at {}", path.display())]
    ArtifactNotFound { path: PathBuf },

    #[error("model artifact at {} is corrupt: {reason}", path.display())]
    ArtifactCorrupt { path: PathBuf, reason: String },

    // ========================================================================
    // INFERENCE (recoverable per request)
    // ========================================================================
    /// The record could not be encoded into the artifact's column layout.
    /// `expected` is always the full feature list from the artifact.
    #[error(
        "feature mismatch: model expects {expected:?} (unresolved: {unresolved:?}, unexpected: {unexpected:?})"
    )]
    FeatureMismatch {
        expected: Vec<String>,
        unresolved: Vec<String>,
        unexpected: Vec<String>,
    },

    #[error("prediction failed: {0}")]
    Prediction(String),

    #[error("invalid value for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    // ========================================================================
    // TRAINING / SETUP
    // ========================================================================
    #[error("configuration error: {0}")]
    Config(String),

    #[error("dataset error: {0}")]
    Dataset(String),

    #[error("model fit failed: {0}")]
    Fit(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Expected feature names carried by a mismatch, for rendering.
    pub fn expected_features(&self) -> Option<&[String]> {
        match self {
            Error::FeatureMismatch { expected, .. } => Some(expected),
            _ => None,
        }
    }

    /// Whether the caller may retry with corrected input.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::FeatureMismatch { .. } | Error::Prediction(_) | Error::InvalidInput { .. }
        )
    }
}
