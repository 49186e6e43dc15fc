//! # Component Schemas
//!
//! A schema is what the component library publishes for each component: the
//! attribute names it understands, their kind, and a default value. It is the
//! only place that decides which attributes are slots.
//!
//! Manifest files look like:
//!
//! ```json
//! {
//!   "manifest": {
//!     "name": "hero-1-horizontal",
//!     "atomicHierarchy": "template",
//!     "custom_attrs": {
//!       "title": { "type": "string", "defaultValue": "" },
//!       "hero_left_section_component": { "type": "component", "defaultValue": null }
//!     }
//!   },
//!   "sample": { "name": "hero-1-horizontal", "custom_attrs": { ... } }
//! }
//! ```
//!
//! A file holding only the `manifest` object is accepted as well.

use crate::attribute::{AttrKind, AttributeValue};
use crate::component::{AtomicHierarchy, Component};
use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttrSchema {
    #[serde(rename = "type")]
    pub kind: AttrKind,

    #[serde(
        rename = "defaultValue",
        alias = "default_value",
        alias = "value",
        default
    )]
    pub default_value: Value,
}

impl AttrSchema {
    pub fn new(kind: AttrKind, default_value: Value) -> Self {
        Self {
            kind,
            default_value,
        }
    }

    /// The default as a typed attribute
    pub fn default_attribute(&self) -> AttributeValue {
        AttributeValue::from_parts(self.kind.as_str(), self.default_value.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSchema {
    pub name: String,

    #[serde(default, alias = "atomicHierarchy")]
    pub atomic_hierarchy: AtomicHierarchy,

    #[serde(default)]
    pub custom_attrs: BTreeMap<String, AttrSchema>,
}

impl ComponentSchema {
    pub fn new(name: impl Into<String>, atomic_hierarchy: AtomicHierarchy) -> Self {
        Self {
            name: name.into(),
            atomic_hierarchy,
            custom_attrs: BTreeMap::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, kind: AttrKind, default_value: Value) -> Self {
        self.custom_attrs
            .insert(name.into(), AttrSchema::new(kind, default_value));
        self
    }

    pub fn with_slot(self, name: impl Into<String>) -> Self {
        self.with_attr(name, AttrKind::Component, Value::Null)
    }

    pub fn is_slot(&self, attr: &str) -> bool {
        self.custom_attrs
            .get(attr)
            .is_some_and(|schema| schema.kind == AttrKind::Component)
    }

    pub fn slot_names(&self) -> impl Iterator<Item = &str> {
        self.custom_attrs
            .iter()
            .filter(|(_, schema)| schema.kind == AttrKind::Component)
            .map(|(name, _)| name.as_str())
    }

    /// A fresh component carrying every default, as placed by "add component"
    pub fn instantiate(&self) -> Component {
        let mut component = Component::new(self.name.clone(), self.atomic_hierarchy);
        for (name, schema) in &self.custom_attrs {
            component
                .custom_attrs
                .insert(name.clone(), schema.default_attribute());
        }
        component
    }
}

/// A schema plus its optional preview fixture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentManifest {
    pub manifest: ComponentSchema,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample: Option<Component>,
}

impl ComponentManifest {
    pub fn from_json(source: &str) -> Result<Self, ModelError> {
        let raw: Value = serde_json::from_str(source).map_err(ModelError::InvalidManifest)?;
        if raw.get("manifest").is_some() {
            serde_json::from_value(raw).map_err(ModelError::InvalidManifest)
        } else {
            let manifest = serde_json::from_value(raw).map_err(ModelError::InvalidManifest)?;
            Ok(Self {
                manifest,
                sample: None,
            })
        }
    }
}
