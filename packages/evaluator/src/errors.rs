use pagesmith_model::AttrKind;
use serde_json::Value;
use thiserror::Error;

/// Attribute data that does not fit its declared or expected kind.
///
/// Never fatal: the attribute still renders, as a literal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Attribute '{attr}' declared as '{declared}' holds a value of the wrong shape: {value}")]
    Malformed {
        attr: String,
        declared: String,
        value: Value,
    },

    #[error("Attribute '{attr}' is stored as '{stored}' but the schema declares '{expected}'")]
    KindMismatch {
        attr: String,
        stored: AttrKind,
        expected: AttrKind,
    },
}

/// Why a node rendered as a placeholder
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaceholderKind {
    #[error("Component not found in the library")]
    NotFound,

    #[error("Loading component")]
    Loading,

    #[error("Component failed to load: {message}")]
    LoadFailed { message: String },

    #[error("Recursive slot detected: {}", call_stack.join(" → "))]
    Cycle { call_stack: Vec<String> },

    #[error("Slot nesting deeper than {limit} levels")]
    DepthExceeded { limit: usize },
}

impl PlaceholderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaceholderKind::NotFound => "not-found",
            PlaceholderKind::Loading => "loading",
            PlaceholderKind::LoadFailed { .. } => "load-failed",
            PlaceholderKind::Cycle { .. } => "cycle",
            PlaceholderKind::DepthExceeded { .. } => "depth-exceeded",
        }
    }
}
