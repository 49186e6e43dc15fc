//! # Attribute Values
//!
//! A component's configurable fields are stored as `{ "type": ..., "value": ... }`
//! pairs. The `type` tag decides the shape of `value`:
//!
//! | type        | value                                  |
//! |-------------|----------------------------------------|
//! | `string`    | string                                 |
//! | `number`    | number                                 |
//! | `color`     | literal (`#112233`) or token reference |
//! | `image`     | URL string (legacy tag: `img`)         |
//! | `file`      | URL string                             |
//! | `array`     | JSON array                             |
//! | `object`    | JSON object                            |
//! | `component` | nested component or `null` (a slot)    |
//!
//! Decoding is tolerant per attribute: a value with the wrong shape is coerced
//! when the conversion is lossless and otherwise kept as
//! [`AttributeValue::Malformed`], so one bad attribute never rejects the
//! whole document.

use crate::component::Component;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Declared kind of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttrKind {
    String,
    Number,
    Color,
    #[serde(alias = "img")]
    Image,
    File,
    Array,
    Object,
    Component,
}

impl AttrKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttrKind::String => "string",
            AttrKind::Number => "number",
            AttrKind::Color => "color",
            AttrKind::Image => "image",
            AttrKind::File => "file",
            AttrKind::Array => "array",
            AttrKind::Object => "object",
            AttrKind::Component => "component",
        }
    }

    /// Parse a `type` tag, accepting the legacy `img` spelling
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "string" => Some(AttrKind::String),
            "number" => Some(AttrKind::Number),
            "color" => Some(AttrKind::Color),
            "image" | "img" => Some(AttrKind::Image),
            "file" => Some(AttrKind::File),
            "array" => Some(AttrKind::Array),
            "object" => Some(AttrKind::Object),
            "component" => Some(AttrKind::Component),
            _ => None,
        }
    }
}

impl fmt::Display for AttrKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed attribute value
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum AttributeValue {
    String(String),
    Number(f64),
    Color(String),
    Image(String),
    File(String),
    Array(Vec<Value>),
    Object(Map<String, Value>),
    /// A slot; `None` means the slot is empty
    Component(Option<Arc<Component>>),
    /// Persisted data whose value does not match its declared type.
    /// `declared` is the raw tag, empty when the attribute had none.
    Malformed { declared: String, value: Value },
}

impl AttributeValue {
    pub fn string(value: impl Into<String>) -> Self {
        AttributeValue::String(value.into())
    }

    pub fn color(value: impl Into<String>) -> Self {
        AttributeValue::Color(value.into())
    }

    pub fn image(url: impl Into<String>) -> Self {
        AttributeValue::Image(url.into())
    }

    pub fn component(component: Component) -> Self {
        AttributeValue::Component(Some(Arc::new(component)))
    }

    pub fn empty_slot() -> Self {
        AttributeValue::Component(None)
    }

    /// Classify a `{type, value}` pair.
    ///
    /// Lossless coercions are applied (`"12"` as a number, `3` as a string,
    /// `null` as an empty URL); anything else becomes `Malformed`.
    pub fn from_parts(tag: &str, value: Value) -> Self {
        let Some(kind) = AttrKind::parse(tag) else {
            return AttributeValue::Malformed {
                declared: tag.to_string(),
                value,
            };
        };

        let malformed = |value: Value| AttributeValue::Malformed {
            declared: tag.to_string(),
            value,
        };

        match (kind, value) {
            (AttrKind::String, Value::String(s)) => AttributeValue::String(s),
            (AttrKind::String, Value::Number(n)) => AttributeValue::String(n.to_string()),
            (AttrKind::String, Value::Bool(b)) => AttributeValue::String(b.to_string()),
            (AttrKind::String, Value::Null) => AttributeValue::String(String::new()),

            (AttrKind::Number, Value::Number(n)) => match n.as_f64() {
                Some(f) => AttributeValue::Number(f),
                None => malformed(Value::Number(n)),
            },
            (AttrKind::Number, Value::String(s)) => match s.trim().parse::<f64>() {
                Ok(f) if f.is_finite() => AttributeValue::Number(f),
                _ => malformed(Value::String(s)),
            },

            (AttrKind::Color, Value::String(s)) => AttributeValue::Color(s),
            (AttrKind::Color, Value::Null) => AttributeValue::Color(String::new()),
            (AttrKind::Image, Value::String(s)) => AttributeValue::Image(s),
            (AttrKind::Image, Value::Null) => AttributeValue::Image(String::new()),
            (AttrKind::File, Value::String(s)) => AttributeValue::File(s),
            (AttrKind::File, Value::Null) => AttributeValue::File(String::new()),

            (AttrKind::Array, Value::Array(items)) => AttributeValue::Array(items),
            (AttrKind::Object, Value::Object(map)) => AttributeValue::Object(map),

            (AttrKind::Component, Value::Null) => AttributeValue::Component(None),
            (AttrKind::Component, value @ Value::Object(_)) => {
                match serde_json::from_value::<Component>(value.clone()) {
                    Ok(component) => AttributeValue::Component(Some(Arc::new(component))),
                    Err(_) => malformed(value),
                }
            }

            (_, value) => malformed(value),
        }
    }

    /// Declared kind, or `None` for malformed data
    pub fn kind(&self) -> Option<AttrKind> {
        match self {
            AttributeValue::String(_) => Some(AttrKind::String),
            AttributeValue::Number(_) => Some(AttrKind::Number),
            AttributeValue::Color(_) => Some(AttrKind::Color),
            AttributeValue::Image(_) => Some(AttrKind::Image),
            AttributeValue::File(_) => Some(AttrKind::File),
            AttributeValue::Array(_) => Some(AttrKind::Array),
            AttributeValue::Object(_) => Some(AttrKind::Object),
            AttributeValue::Component(_) => Some(AttrKind::Component),
            AttributeValue::Malformed { .. } => None,
        }
    }

    /// The nested component if this is a filled slot
    pub fn as_component(&self) -> Option<&Arc<Component>> {
        match self {
            AttributeValue::Component(Some(component)) => Some(component),
            _ => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, AttributeValue::Malformed { .. })
    }

    /// The `value` half of the pair as plain JSON
    pub fn to_json(&self) -> Value {
        match self {
            AttributeValue::String(s)
            | AttributeValue::Color(s)
            | AttributeValue::Image(s)
            | AttributeValue::File(s) => Value::String(s.clone()),
            AttributeValue::Number(n) => number_to_json(*n),
            AttributeValue::Array(items) => Value::Array(items.clone()),
            AttributeValue::Object(map) => Value::Object(map.clone()),
            AttributeValue::Component(None) => Value::Null,
            AttributeValue::Component(Some(component)) => {
                serde_json::to_value(component.as_ref()).unwrap_or(Value::Null)
            }
            AttributeValue::Malformed { value, .. } => value.clone(),
        }
    }

    fn tag(&self) -> &str {
        match self {
            AttributeValue::Malformed { declared, .. } => declared.as_str(),
            other => other.kind().map(|k| k.as_str()).unwrap_or_default(),
        }
    }
}

fn number_to_json(n: f64) -> Value {
    serde_json::Number::from_f64(n)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

impl From<Value> for AttributeValue {
    fn from(raw: Value) -> Self {
        match raw {
            Value::Object(mut map) => match map.remove("type") {
                Some(Value::String(tag)) => {
                    let value = map.remove("value").unwrap_or(Value::Null);
                    AttributeValue::from_parts(&tag, value)
                }
                Some(other) => {
                    map.insert("type".to_string(), other);
                    AttributeValue::Malformed {
                        declared: String::new(),
                        value: Value::Object(map),
                    }
                }
                None => AttributeValue::Malformed {
                    declared: String::new(),
                    value: Value::Object(map),
                },
            },
            other => AttributeValue::Malformed {
                declared: String::new(),
                value: other,
            },
        }
    }
}

impl Serialize for AttributeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("AttributeValue", 2)?;
        state.serialize_field("type", self.tag())?;
        match self {
            AttributeValue::String(s)
            | AttributeValue::Color(s)
            | AttributeValue::Image(s)
            | AttributeValue::File(s) => state.serialize_field("value", s)?,
            AttributeValue::Number(n) => state.serialize_field("value", &number_to_json(*n))?,
            AttributeValue::Array(items) => state.serialize_field("value", items)?,
            AttributeValue::Object(map) => state.serialize_field("value", map)?,
            AttributeValue::Component(component) => {
                state.serialize_field("value", &component.as_deref())?
            }
            AttributeValue::Malformed { value, .. } => state.serialize_field("value", value)?,
        }
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(raw: Value) -> AttributeValue {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn test_decode_typed_primitives() {
        assert_eq!(
            decode(json!({"type": "string", "value": "Hero"})),
            AttributeValue::string("Hero")
        );
        assert_eq!(
            decode(json!({"type": "number", "value": 3})),
            AttributeValue::Number(3.0)
        );
        assert_eq!(
            decode(json!({"type": "color", "value": "var:primary"})),
            AttributeValue::color("var:primary")
        );
    }

    #[test]
    fn test_legacy_img_tag_reads_as_image() {
        let value = decode(json!({"type": "img", "value": "https://cdn/x.png"}));
        assert_eq!(value, AttributeValue::image("https://cdn/x.png"));

        let encoded = serde_json::to_value(&value).unwrap();
        assert_eq!(encoded, json!({"type": "image", "value": "https://cdn/x.png"}));
    }

    #[test]
    fn test_lossless_coercions() {
        assert_eq!(
            decode(json!({"type": "number", "value": " 12.5 "})),
            AttributeValue::Number(12.5)
        );
        assert_eq!(
            decode(json!({"type": "string", "value": 7})),
            AttributeValue::string("7")
        );
        assert_eq!(
            decode(json!({"type": "image", "value": null})),
            AttributeValue::image("")
        );
    }

    #[test]
    fn test_shape_mismatch_is_malformed() {
        let value = decode(json!({"type": "number", "value": "twelve"}));
        assert_eq!(
            value,
            AttributeValue::Malformed {
                declared: "number".to_string(),
                value: json!("twelve"),
            }
        );

        let value = decode(json!({"type": "array", "value": {"a": 1}}));
        assert!(value.is_malformed());
    }

    #[test]
    fn test_untyped_and_unknown_tags_are_malformed() {
        let untyped = decode(json!("plain text"));
        assert_eq!(
            untyped,
            AttributeValue::Malformed {
                declared: String::new(),
                value: json!("plain text"),
            }
        );

        let unknown = decode(json!({"type": "gradient", "value": "red,blue"}));
        assert_eq!(unknown.kind(), None);
        assert_eq!(
            serde_json::to_value(&unknown).unwrap(),
            json!({"type": "gradient", "value": "red,blue"})
        );
    }

    #[test]
    fn test_component_slot_decoding() {
        let empty = decode(json!({"type": "component", "value": null}));
        assert_eq!(empty, AttributeValue::empty_slot());
        assert!(empty.as_component().is_none());

        let filled = decode(json!({
            "type": "component",
            "value": {
                "name": "button-1",
                "atomic_hierarchy": "atom",
                "custom_attrs": { "label": { "type": "string", "value": "Go" } }
            }
        }));
        let nested = filled.as_component().expect("slot should be filled");
        assert_eq!(nested.name, "button-1");
        assert_eq!(nested.custom_attrs["label"], AttributeValue::string("Go"));

        let broken = decode(json!({"type": "component", "value": {"no_name": true}}));
        assert!(broken.is_malformed());
    }
}
