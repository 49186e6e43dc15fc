use pagesmith_evaluator::config::{DEFAULT_CSS_SCOPE, DEFAULT_MAX_SLOT_DEPTH};
use pagesmith_evaluator::RenderConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "pagesmith.config.json";

/// Pagesmith configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory containing component manifests (*.json)
    #[serde(default = "default_library_dir")]
    pub library_dir: String,

    #[serde(default = "default_max_slot_depth")]
    pub max_slot_depth: usize,

    /// Class the rendered page and its typography rules are scoped under
    #[serde(default = "default_css_scope")]
    pub css_scope: String,

    /// Where rendered pages are written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<String>,
}

fn default_library_dir() -> String {
    "library".to_string()
}

fn default_max_slot_depth() -> usize {
    DEFAULT_MAX_SLOT_DEPTH
}

fn default_css_scope() -> String {
    DEFAULT_CSS_SCOPE.to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Get absolute path to the component library
    pub fn get_library_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.library_dir)
    }

    pub fn get_out_dir(&self, cwd: &str) -> Option<PathBuf> {
        self.out_dir.as_ref().map(|dir| PathBuf::from(cwd).join(dir))
    }

    /// Render settings, with command-line overrides applied
    pub fn render_config(&self, max_slot_depth: Option<usize>, css_scope: Option<&str>) -> RenderConfig {
        RenderConfig {
            max_slot_depth: max_slot_depth.unwrap_or(self.max_slot_depth),
            css_scope: css_scope.unwrap_or(&self.css_scope).to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            library_dir: default_library_dir(),
            max_slot_depth: default_max_slot_depth(),
            css_scope: default_css_scope(),
            out_dir: None,
        }
    }
}
