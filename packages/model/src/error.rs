//! Error types for the document model

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid site document: {0}")]
    InvalidDocument(#[source] serde_json::Error),

    #[error("Invalid component manifest: {0}")]
    InvalidManifest(#[source] serde_json::Error),

    #[error("Failed to encode document: {0}")]
    Encode(#[source] serde_json::Error),
}
