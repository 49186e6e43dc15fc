//! # Renderer Contract
//!
//! A renderer turns one resolved component into markup. The engine hands it
//! concrete values only: color tokens are already substituted, typography is
//! already cascaded, and every filled slot arrives as finished child markup.

use pagesmith_model::{Component, TypographyScale};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::Arc;

/// A concrete, render-ready attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum RenderValue {
    Text(String),
    Number(f64),
    /// Color literal, or the original reference when the token is undefined
    Color(String),
    /// Image or file URL, possibly empty
    Url(String),
    Array(Vec<Value>),
    Object(Map<String, Value>),
    Component(Option<Arc<Component>>),
    /// Malformed source data, passed through as-is
    Raw(Value),
}

impl RenderValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RenderValue::Text(s) | RenderValue::Color(s) | RenderValue::Url(s) => Some(s),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            RenderValue::Text(s) | RenderValue::Color(s) | RenderValue::Url(s) => {
                Value::String(s.clone())
            }
            RenderValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            RenderValue::Array(items) => Value::Array(items.clone()),
            RenderValue::Object(map) => Value::Object(map.clone()),
            RenderValue::Component(None) => Value::Null,
            RenderValue::Component(Some(component)) => {
                serde_json::to_value(component.as_ref()).unwrap_or(Value::Null)
            }
            RenderValue::Raw(value) => value.clone(),
        }
    }
}

/// Everything a renderer sees for one node
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    pub name: &'a str,
    pub attrs: &'a BTreeMap<String, RenderValue>,
    pub typography: &'a TypographyScale,
    /// Rendered markup of each filled slot, keyed by attribute name
    pub slots: &'a BTreeMap<String, String>,
}

pub trait Renderer: Send + Sync {
    fn render(&self, input: &RenderInput<'_>) -> String;
}

impl<F> Renderer for F
where
    F: Fn(&RenderInput<'_>) -> String + Send + Sync,
{
    fn render(&self, input: &RenderInput<'_>) -> String {
        self(input)
    }
}

/// Renders any component as a `<section>` listing its attributes.
///
/// Used for library entries that ship a manifest but no dedicated renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericRenderer;

impl Renderer for GenericRenderer {
    fn render(&self, input: &RenderInput<'_>) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            "<section data-component=\"{}\"",
            escape_html(input.name)
        );

        let background = input
            .attrs
            .iter()
            .find(|(name, value)| {
                name.contains("background") && matches!(value, RenderValue::Color(_))
            })
            .and_then(|(_, value)| value.as_str());
        if let Some(color) = background.filter(|c| !c.is_empty()) {
            let _ = write!(out, " style=\"background-color: {}\"", escape_html(color));
        }
        out.push('>');

        for (name, value) in input.attrs {
            match value {
                RenderValue::Text(text) if name == "title" => {
                    let _ = write!(out, "<h1>{}</h1>", escape_html(text));
                }
                RenderValue::Text(text) if !text.is_empty() => {
                    let _ = write!(
                        out,
                        "<p data-attr=\"{}\">{}</p>",
                        escape_html(name),
                        escape_html(text)
                    );
                }
                RenderValue::Url(url) if !url.is_empty() => {
                    let _ = write!(
                        out,
                        "<img data-attr=\"{}\" src=\"{}\">",
                        escape_html(name),
                        escape_html(url)
                    );
                }
                RenderValue::Array(items) => {
                    out.push_str("<ul>");
                    for item in items {
                        let _ = write!(out, "<li>{}</li>", escape_html(&item_label(item)));
                    }
                    out.push_str("</ul>");
                }
                _ => {}
            }
        }

        for markup in input.slots.values() {
            out.push_str(markup);
        }
        out.push_str("</section>");
        out
    }
}

fn item_label(item: &Value) -> String {
    // Array items are usually `{type, value}` wrappers around an object
    let inner = item.get("value").unwrap_or(item);
    match inner {
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .get("label")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| inner.to_string()),
        other => other.to_string(),
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
