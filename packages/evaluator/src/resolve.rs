//! # Attribute Resolution
//!
//! Turns stored [`AttributeValue`]s into [`RenderValue`]s. Pure: the output
//! depends only on the attributes and the color table.
//!
//! Color references come in two spellings, `var:primary` and
//! `var(--primary)`. Both extract the token name and look it up; a missing
//! token leaves the reference untouched so the gap stays visible.
//!
//! Slots pass through as-is. Descending into them is the renderer's job.

use crate::errors::ValidationError;
use pagesmith_model::{AttributeValue, ComponentSchema};
use pagesmith_registry::RenderValue;
use std::borrow::Cow;
use std::collections::BTreeMap;
use tracing::warn;

pub type Attrs = BTreeMap<String, AttributeValue>;
pub type ResolvedAttrs = BTreeMap<String, RenderValue>;
pub type Colors = BTreeMap<String, String>;

pub fn resolve(attrs: &Attrs, colors: &Colors) -> ResolvedAttrs {
    attrs
        .iter()
        .map(|(name, value)| (name.clone(), resolve_value(value, colors)))
        .collect()
}

/// [`resolve`], also reporting attributes that had to degrade to a literal
pub fn resolve_with_diagnostics(attrs: &Attrs, colors: &Colors) -> (ResolvedAttrs, Vec<ValidationError>) {
    let mut diagnostics = Vec::new();
    for (name, value) in attrs {
        if let AttributeValue::Malformed { declared, value } = value {
            warn!(attr = %name, declared = %declared, "malformed attribute rendered as literal");
            diagnostics.push(ValidationError::Malformed {
                attr: name.clone(),
                declared: declared.clone(),
                value: value.clone(),
            });
        }
    }
    (resolve(attrs, colors), diagnostics)
}

pub fn resolve_value(value: &AttributeValue, colors: &Colors) -> RenderValue {
    match value {
        AttributeValue::String(s) => RenderValue::Text(s.clone()),
        AttributeValue::Number(n) => RenderValue::Number(*n),
        AttributeValue::Color(c) => RenderValue::Color(resolve_color(c, colors).into_owned()),
        AttributeValue::Image(url) | AttributeValue::File(url) => RenderValue::Url(url.clone()),
        AttributeValue::Array(items) => RenderValue::Array(items.clone()),
        AttributeValue::Object(map) => RenderValue::Object(map.clone()),
        AttributeValue::Component(component) => RenderValue::Component(component.clone()),
        AttributeValue::Malformed { value, .. } => RenderValue::Raw(value.clone()),
    }
}

/// Substitute a token reference, or return the input unchanged
pub fn resolve_color<'a>(value: &'a str, colors: &'a Colors) -> Cow<'a, str> {
    match token_name(value).and_then(|name| colors.get(name)) {
        Some(literal) => Cow::Borrowed(literal.as_str()),
        None => Cow::Borrowed(value),
    }
}

/// Token name referenced by `var:<name>` or `var(--<name>)`
pub fn token_name(value: &str) -> Option<&str> {
    let value = value.trim();
    let name = if let Some(name) = value.strip_prefix("var:") {
        name
    } else {
        value.strip_prefix("var(--")?.strip_suffix(')')?
    };
    let name = name.trim();
    (!name.is_empty()).then_some(name)
}

/// Fill attributes the component leaves out with the schema's defaults.
///
/// A stored attribute whose kind disagrees with the schema is kept as stored
/// and reported.
pub fn apply_schema_defaults(schema: &ComponentSchema, attrs: &Attrs) -> (Attrs, Vec<ValidationError>) {
    let mut merged = attrs.clone();
    let mut diagnostics = Vec::new();

    for (name, attr_schema) in &schema.custom_attrs {
        match attrs.get(name) {
            None => {
                merged.insert(name.clone(), attr_schema.default_attribute());
            }
            Some(stored) => {
                if let Some(kind) = stored.kind().filter(|kind| *kind != attr_schema.kind) {
                    warn!(
                        component = %schema.name,
                        attr = %name,
                        stored = %kind,
                        expected = %attr_schema.kind,
                        "attribute kind disagrees with schema"
                    );
                    diagnostics.push(ValidationError::KindMismatch {
                        attr: name.clone(),
                        stored: kind,
                        expected: attr_schema.kind,
                    });
                }
            }
        }
    }

    (merged, diagnostics)
}
