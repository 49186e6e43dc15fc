use thiserror::Error;

/// A renderer loader rejected. Memoized, so it is cloned to every caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to load renderer for '{name}': {message}")]
pub struct LoadError {
    pub name: String,
    pub message: String,
}

impl LoadError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Component '{name}' not found in registry")]
    NotFound { name: String },

    #[error("Component '{name}' is already registered")]
    Duplicate { name: String },

    #[error(transparent)]
    Load(#[from] LoadError),
}
