//! Error types for the editor

use pagesmith_model::ModelError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Failed to read site document {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load site document: {0}")]
    Load(#[source] ModelError),

    #[error("Failed to encode site document: {0}")]
    Encode(#[source] ModelError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("Document is not file-backed")]
    NotFileBacked,
}

impl EditorError {
    /// Load failures leave no document to edit; everything else is recoverable
    pub fn is_terminal(&self) -> bool {
        matches!(self, EditorError::Read { .. } | EditorError::Load(_))
    }
}

/// A font family the font service could not provide
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to load font '{family}': {message}")]
pub struct FontError {
    pub family: String,
    pub message: String,
}

impl FontError {
    pub fn new(family: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            message: message.into(),
        }
    }
}
