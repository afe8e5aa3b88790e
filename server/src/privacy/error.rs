//! Masking Error Types

use thiserror::Error;

/// Failure while masking a response tree.
///
/// Never surfaced to the caller: the masker logs it and returns the
/// original body.
#[derive(Debug, Error)]
pub enum MaskError {
    /// A per-project privacy entry could not be read.
    #[error("Malformed privacy settings for project {project_id}: {reason}")]
    MalformedPrivacySettings { project_id: String, reason: String },

    /// A value could not be converted to plain JSON.
    #[error("Failed to convert value to plain data")]
    Serialize(#[from] serde_json::Error),

    /// A custom visibility rule failed.
    #[error("Visibility rule failed: {0}")]
    Rule(String),
}
