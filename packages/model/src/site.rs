use crate::component::Component;
use crate::error::ModelError;
use crate::typography::{TypographyOverride, TypographyScale};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Root of a persisted site document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub typography: SiteTypography,

    #[serde(default)]
    pub design_tokens: DesignTokens,

    #[serde(default)]
    pub pages: Vec<Arc<Page>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_components: Option<GlobalComponents>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteTypography {
    #[serde(default)]
    pub global: TypographyScale,

    /// Font families already ensured by the font service
    #[serde(default)]
    pub loaded_fonts: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesignTokens {
    /// Token name to color literal
    #[serde(default)]
    pub colors: BTreeMap<String, String>,
}

/// Components rendered around every page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalComponents {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<Arc<Component>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<Arc<Component>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,

    #[serde(default)]
    pub slug: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typography_override: Option<TypographyOverride>,

    #[serde(default)]
    pub components: Vec<Arc<Component>>,

    /// SEO and publishing fields, carried through untouched
    #[serde(flatten)]
    pub meta: Map<String, Value>,
}

impl Page {
    pub fn new(id: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            slug: slug.into(),
            title: None,
            typography_override: None,
            components: Vec::new(),
            meta: Map::new(),
        }
    }

    pub fn with_component(mut self, component: Component) -> Self {
        self.components.push(Arc::new(component));
        self
    }

    pub fn with_typography(mut self, typography: TypographyOverride) -> Self {
        self.typography_override = Some(typography);
        self
    }
}

impl Site {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            typography: SiteTypography::default(),
            design_tokens: DesignTokens::default(),
            pages: Vec::new(),
            global_components: None,
        }
    }

    pub fn with_page(mut self, page: Page) -> Self {
        self.pages.push(Arc::new(page));
        self
    }

    pub fn with_color(mut self, token: impl Into<String>, literal: impl Into<String>) -> Self {
        self.design_tokens.colors.insert(token.into(), literal.into());
        self
    }

    pub fn page(&self, id: &str) -> Option<&Arc<Page>> {
        self.pages.iter().find(|page| page.id == id)
    }

    pub fn page_index(&self, id: &str) -> Option<usize> {
        self.pages.iter().position(|page| page.id == id)
    }

    pub fn header(&self) -> Option<&Arc<Component>> {
        self.global_components.as_ref()?.header.as_ref()
    }

    pub fn footer(&self) -> Option<&Arc<Component>> {
        self.global_components.as_ref()?.footer.as_ref()
    }

    pub fn from_json(source: &str) -> Result<Self, ModelError> {
        serde_json::from_str(source).map_err(ModelError::InvalidDocument)
    }

    pub fn to_json_pretty(&self) -> Result<String, ModelError> {
        serde_json::to_string_pretty(self).map_err(ModelError::Encode)
    }
}
