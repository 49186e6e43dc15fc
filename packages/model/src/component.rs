use crate::attribute::AttributeValue;
use crate::typography::TypographyOverride;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Atomic-design classification of a component.
///
/// Informational only; it orders library listings and never changes how a
/// component renders. Unknown levels read as the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AtomicHierarchy {
    Atom,
    Molecule,
    #[default]
    Organism,
    Template,
    Page,
}

impl AtomicHierarchy {
    pub const ALL: [AtomicHierarchy; 5] = [
        AtomicHierarchy::Atom,
        AtomicHierarchy::Molecule,
        AtomicHierarchy::Organism,
        AtomicHierarchy::Template,
        AtomicHierarchy::Page,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AtomicHierarchy::Atom => "atom",
            AtomicHierarchy::Molecule => "molecule",
            AtomicHierarchy::Organism => "organism",
            AtomicHierarchy::Template => "template",
            AtomicHierarchy::Page => "page",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|h| h.as_str() == value)
    }
}

impl<'de> Deserialize<'de> for AtomicHierarchy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value
            .as_str()
            .and_then(|level| Self::parse(&level.to_ascii_lowercase()))
            .unwrap_or_default())
    }
}

impl fmt::Display for AtomicHierarchy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A component instance placed on a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Registry key
    pub name: String,

    #[serde(default, alias = "atomicHierarchy")]
    pub atomic_hierarchy: AtomicHierarchy,

    #[serde(default)]
    pub custom_attrs: BTreeMap<String, AttributeValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typography_override: Option<TypographyOverride>,

    /// JSON-LD passthrough, never interpreted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo: Option<Value>,
}

impl Component {
    pub fn new(name: impl Into<String>, atomic_hierarchy: AtomicHierarchy) -> Self {
        Self {
            name: name.into(),
            atomic_hierarchy,
            custom_attrs: BTreeMap::new(),
            typography_override: None,
            seo: None,
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: AttributeValue) -> Self {
        self.custom_attrs.insert(name.into(), value);
        self
    }

    pub fn with_slot(self, name: impl Into<String>, child: Component) -> Self {
        self.with_attr(name, AttributeValue::component(child))
    }

    pub fn with_typography(mut self, typography: TypographyOverride) -> Self {
        self.typography_override = Some(typography);
        self
    }

    /// Nested component held by the slot attribute `name`, if filled
    pub fn slot(&self, name: &str) -> Option<&Arc<Component>> {
        self.custom_attrs.get(name).and_then(AttributeValue::as_component)
    }

    /// All filled slots, in attribute-name order
    pub fn slots(&self) -> impl Iterator<Item = (&str, &Arc<Component>)> {
        self.custom_attrs
            .iter()
            .filter_map(|(name, value)| value.as_component().map(|c| (name.as_str(), c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hierarchy_orders_atom_first() {
        let mut levels = vec![
            AtomicHierarchy::Page,
            AtomicHierarchy::Atom,
            AtomicHierarchy::Template,
            AtomicHierarchy::Organism,
            AtomicHierarchy::Molecule,
        ];
        levels.sort();
        assert_eq!(levels, AtomicHierarchy::ALL.to_vec());
    }

    #[test]
    fn test_unknown_hierarchy_reads_as_default() {
        let component: Component =
            serde_json::from_value(json!({ "name": "hero-1", "atomic_hierarchy": "Template" })).unwrap();
        assert_eq!(component.atomic_hierarchy, AtomicHierarchy::Template);

        let component: Component =
            serde_json::from_value(json!({ "name": "hero-1", "atomic_hierarchy": "widget" })).unwrap();
        assert_eq!(component.atomic_hierarchy, AtomicHierarchy::Organism);

        let component: Component =
            serde_json::from_value(json!({ "name": "hero-1", "atomic_hierarchy": 3 })).unwrap();
        assert_eq!(component.atomic_hierarchy, AtomicHierarchy::Organism);
    }

    #[test]
    fn test_component_defaults_when_fields_missing() {
        let component: Component = serde_json::from_value(json!({ "name": "footer-1" })).unwrap();
        assert_eq!(component.atomic_hierarchy, AtomicHierarchy::Organism);
        assert!(component.custom_attrs.is_empty());
        assert!(component.typography_override.is_none());
    }

    #[test]
    fn test_slots_skip_empty_and_non_component_attrs() {
        let component = Component::new("hero-1", AtomicHierarchy::Template)
            .with_attr("title", AttributeValue::string("Hello"))
            .with_attr("aside", AttributeValue::empty_slot())
            .with_slot("left", Component::new("button-1", AtomicHierarchy::Atom));

        let slots: Vec<_> = component.slots().map(|(name, c)| (name, c.name.as_str())).collect();
        assert_eq!(slots, vec![("left", "button-1")]);
        assert!(component.slot("aside").is_none());
    }
}
