use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_SLOT_DEPTH: usize = 32;
pub const DEFAULT_CSS_SCOPE: &str = "preview-engine";

/// Rendering knobs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderConfig {
    /// Deepest acyclic slot nesting rendered before a placeholder
    pub max_slot_depth: usize,

    /// Class that scopes the generated typography rules
    pub css_scope: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_slot_depth: DEFAULT_MAX_SLOT_DEPTH,
            css_scope: DEFAULT_CSS_SCOPE.to_string(),
        }
    }
}
