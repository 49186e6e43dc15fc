//! # Path Addressing
//!
//! A [`ComponentPath`] is a list of string segments walked from a root
//! ([`Site`], [`Page`] or [`Component`]):
//!
//! ```text
//! Site        pages/<i>  global_components/header  global_components/footer
//! Page        components/<i>
//! Component   custom_attrs/<attr>   <slot attr>  (shorthand into a filled slot)
//! Attribute   value                 (slot component, array items, object fields)
//! JSON        <i> in arrays, <key> in objects
//! ```
//!
//! Example: `["components", "0", "hero_left_section_component", "custom_attrs", "label"]`
//! addresses the `label` attribute of the component in the first hero's slot.
//!
//! ## Indices
//!
//! Only canonical decimals (`"0"`, `"12"`) address sequence positions. `"01"`
//! or `"+1"` never resolve, so two distinct strings never name the same
//! element.
//!
//! ## Copy-on-write
//!
//! [`update`], [`remove_at`] and [`insert_at`] return a new root. Every node
//! on the edited spine is copied with `Arc::make_mut`; every other subtree is
//! still the same allocation as in the input root.
//!
//! ## Staleness
//!
//! Paths are positional. After [`remove_at`], [`Removal::reindex`] maps an old
//! path to its new position, or to `None` when it pointed at the removed
//! element. A [`VersionedPath`] refuses to resolve against any version other
//! than the one it was taken from.

use pagesmith_model::{AttributeValue, Component, GlobalComponents, Page, Site};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentPath(Vec<String>);

impl ComponentPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    pub fn parent(&self) -> Option<Self> {
        let (_, parent) = self.0.split_last()?;
        Some(Self(parent.to_vec()))
    }

    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Trailing segment as a sequence index
    pub fn last_index(&self) -> Option<usize> {
        self.last().and_then(parse_index)
    }

    pub fn starts_with(&self, prefix: &ComponentPath) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for ComponentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.0.join("/"))
    }
}

impl<S: Into<String>> FromIterator<S> for ComponentPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl From<Vec<String>> for ComponentPath {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

impl From<&[&str]> for ComponentPath {
    fn from(segments: &[&str]) -> Self {
        Self::new(segments.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for ComponentPath {
    fn from(segments: [&str; N]) -> Self {
        Self::new(segments)
    }
}

/// Structural, order-sensitive equality
pub fn paths_equal(a: &ComponentPath, b: &ComponentPath) -> bool {
    a.0 == b.0
}

/// Canonical decimal index: no sign, no leading zeros
pub fn parse_index(segment: &str) -> Option<usize> {
    let bytes = segment.as_bytes();
    let canonical = match bytes {
        [] => false,
        [b'0'] => true,
        [first, rest @ ..] => {
            (b'1'..=b'9').contains(first) && rest.iter().all(u8::is_ascii_digit)
        }
    };
    if canonical {
        segment.parse().ok()
    } else {
        None
    }
}

/// A path bound to the site version it was taken against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionedPath {
    pub path: ComponentPath,
    pub version: u64,
}

impl VersionedPath {
    pub fn new(path: ComponentPath, version: u64) -> Self {
        Self { path, version }
    }

    /// Resolve only when `version` is the one this path was taken against
    pub fn resolve<'a, R: PathRoot>(&self, root: &'a R, version: u64) -> Option<NodeRef<'a>> {
        if self.version != version {
            return None;
        }
        get(root, &self.path)
    }

    pub fn restamp(&self, version: u64) -> Self {
        Self::new(self.path.clone(), version)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("Path {path} does not resolve at segment {position} ('{segment}')")]
    Unresolved {
        path: ComponentPath,
        position: usize,
        segment: String,
    },

    #[error("Path {path} addresses {found}, expected {expected}")]
    WrongTarget {
        path: ComponentPath,
        found: &'static str,
        expected: &'static str,
    },

    #[error("Index {index} is out of bounds for {path} (length {len})")]
    OutOfBounds {
        path: ComponentPath,
        index: usize,
        len: usize,
    },
}

/// Read-only view of an addressed node
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Site(&'a Site),
    Pages(&'a [Arc<Page>]),
    Page(&'a Page),
    GlobalComponents(&'a GlobalComponents),
    Components(&'a [Arc<Component>]),
    Component(&'a Component),
    Attrs(&'a BTreeMap<String, AttributeValue>),
    Attribute(&'a AttributeValue),
    Items(&'a [Value]),
    Fields(&'a Map<String, Value>),
    Json(&'a Value),
}

impl<'a> NodeRef<'a> {
    pub fn kind(&self) -> &'static str {
        match self {
            NodeRef::Site(_) => "a site",
            NodeRef::Pages(_) => "a page list",
            NodeRef::Page(_) => "a page",
            NodeRef::GlobalComponents(_) => "global components",
            NodeRef::Components(_) => "a component list",
            NodeRef::Component(_) => "a component",
            NodeRef::Attrs(_) => "an attribute map",
            NodeRef::Attribute(_) => "an attribute",
            NodeRef::Items(_) => "an array",
            NodeRef::Fields(_) => "an object",
            NodeRef::Json(_) => "a JSON value",
        }
    }

    pub fn as_component(&self) -> Option<&'a Component> {
        match *self {
            NodeRef::Component(component) => Some(component),
            _ => None,
        }
    }

    pub fn as_attribute(&self) -> Option<&'a AttributeValue> {
        match *self {
            NodeRef::Attribute(attribute) => Some(attribute),
            _ => None,
        }
    }

    pub fn as_page(&self) -> Option<&'a Page> {
        match *self {
            NodeRef::Page(page) => Some(page),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&'a Value> {
        match *self {
            NodeRef::Json(value) => Some(value),
            _ => None,
        }
    }

    fn step(self, segment: &str) -> Option<NodeRef<'a>> {
        match self {
            NodeRef::Site(site) => match segment {
                "pages" => Some(NodeRef::Pages(&site.pages)),
                "global_components" => site
                    .global_components
                    .as_ref()
                    .map(NodeRef::GlobalComponents),
                _ => None,
            },
            NodeRef::GlobalComponents(globals) => match segment {
                "header" => globals.header.as_deref().map(NodeRef::Component),
                "footer" => globals.footer.as_deref().map(NodeRef::Component),
                _ => None,
            },
            NodeRef::Pages(pages) => pages
                .get(parse_index(segment)?)
                .map(|page| NodeRef::Page(page)),
            NodeRef::Page(page) => match segment {
                "components" => Some(NodeRef::Components(&page.components)),
                _ => None,
            },
            NodeRef::Components(components) => components
                .get(parse_index(segment)?)
                .map(|component| NodeRef::Component(component)),
            NodeRef::Component(component) => match segment {
                "custom_attrs" => Some(NodeRef::Attrs(&component.custom_attrs)),
                slot => component
                    .slot(slot)
                    .map(|child| NodeRef::Component(child)),
            },
            NodeRef::Attrs(attrs) => attrs.get(segment).map(NodeRef::Attribute),
            NodeRef::Attribute(attribute) => match (segment, attribute) {
                ("value", AttributeValue::Component(Some(child))) => {
                    Some(NodeRef::Component(child))
                }
                ("value", AttributeValue::Array(items)) => Some(NodeRef::Items(items)),
                ("value", AttributeValue::Object(fields)) => Some(NodeRef::Fields(fields)),
                _ => None,
            },
            NodeRef::Items(items) => items.get(parse_index(segment)?).map(NodeRef::Json),
            NodeRef::Fields(fields) => fields.get(segment).map(NodeRef::Json),
            NodeRef::Json(value) => match value {
                Value::Array(items) => items.get(parse_index(segment)?).map(NodeRef::Json),
                Value::Object(fields) => fields.get(segment).map(NodeRef::Json),
                _ => None,
            },
        }
    }
}

/// Mutable view used while copying a spine
pub enum NodeMut<'a> {
    Site(&'a mut Site),
    Pages(&'a mut Vec<Arc<Page>>),
    Page(&'a mut Page),
    GlobalComponents(&'a mut GlobalComponents),
    Components(&'a mut Vec<Arc<Component>>),
    Component(&'a mut Component),
    Attrs(&'a mut BTreeMap<String, AttributeValue>),
    Attribute(&'a mut AttributeValue),
    Items(&'a mut Vec<Value>),
    Fields(&'a mut Map<String, Value>),
    Json(&'a mut Value),
}

impl<'a> NodeMut<'a> {
    fn kind(&self) -> &'static str {
        match self {
            NodeMut::Site(_) => "a site",
            NodeMut::Pages(_) => "a page list",
            NodeMut::Page(_) => "a page",
            NodeMut::GlobalComponents(_) => "global components",
            NodeMut::Components(_) => "a component list",
            NodeMut::Component(_) => "a component",
            NodeMut::Attrs(_) => "an attribute map",
            NodeMut::Attribute(_) => "an attribute",
            NodeMut::Items(_) => "an array",
            NodeMut::Fields(_) => "an object",
            NodeMut::Json(_) => "a JSON value",
        }
    }

    fn step(self, segment: &str) -> Option<NodeMut<'a>> {
        match self {
            NodeMut::Site(site) => match segment {
                "pages" => Some(NodeMut::Pages(&mut site.pages)),
                "global_components" => site
                    .global_components
                    .as_mut()
                    .map(NodeMut::GlobalComponents),
                _ => None,
            },
            NodeMut::GlobalComponents(globals) => match segment {
                "header" => globals
                    .header
                    .as_mut()
                    .map(|c| NodeMut::Component(Arc::make_mut(c))),
                "footer" => globals
                    .footer
                    .as_mut()
                    .map(|c| NodeMut::Component(Arc::make_mut(c))),
                _ => None,
            },
            NodeMut::Pages(pages) => pages
                .get_mut(parse_index(segment)?)
                .map(|page| NodeMut::Page(Arc::make_mut(page))),
            NodeMut::Page(page) => match segment {
                "components" => Some(NodeMut::Components(&mut page.components)),
                _ => None,
            },
            NodeMut::Components(components) => components
                .get_mut(parse_index(segment)?)
                .map(|c| NodeMut::Component(Arc::make_mut(c))),
            NodeMut::Component(component) => match segment {
                "custom_attrs" => Some(NodeMut::Attrs(&mut component.custom_attrs)),
                slot => match component.custom_attrs.get_mut(slot) {
                    Some(AttributeValue::Component(Some(child))) => {
                        Some(NodeMut::Component(Arc::make_mut(child)))
                    }
                    _ => None,
                },
            },
            NodeMut::Attrs(attrs) => attrs.get_mut(segment).map(NodeMut::Attribute),
            NodeMut::Attribute(attribute) => match (segment, attribute) {
                ("value", AttributeValue::Component(Some(child))) => {
                    Some(NodeMut::Component(Arc::make_mut(child)))
                }
                ("value", AttributeValue::Array(items)) => Some(NodeMut::Items(items)),
                ("value", AttributeValue::Object(fields)) => Some(NodeMut::Fields(fields)),
                _ => None,
            },
            NodeMut::Items(items) => items.get_mut(parse_index(segment)?).map(NodeMut::Json),
            NodeMut::Fields(fields) => fields.get_mut(segment).map(NodeMut::Json),
            NodeMut::Json(value) => match value {
                Value::Array(items) => items.get_mut(parse_index(segment)?).map(NodeMut::Json),
                Value::Object(fields) => fields.get_mut(segment).map(NodeMut::Json),
                _ => None,
            },
        }
    }
}

/// Anything paths can be walked from
pub trait PathRoot: Clone {
    fn node(&self) -> NodeRef<'_>;
    fn node_mut(&mut self) -> NodeMut<'_>;
}

impl PathRoot for Site {
    fn node(&self) -> NodeRef<'_> {
        NodeRef::Site(self)
    }

    fn node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::Site(self)
    }
}

impl PathRoot for Page {
    fn node(&self) -> NodeRef<'_> {
        NodeRef::Page(self)
    }

    fn node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::Page(self)
    }
}

impl PathRoot for Component {
    fn node(&self) -> NodeRef<'_> {
        NodeRef::Component(self)
    }

    fn node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::Component(self)
    }
}

pub fn get<'a, R: PathRoot>(root: &'a R, path: &ComponentPath) -> Option<NodeRef<'a>> {
    path.segments()
        .iter()
        .try_fold(root.node(), |node, segment| node.step(segment))
}

fn walk_mut<'a>(root: NodeMut<'a>, path: &ComponentPath) -> Result<NodeMut<'a>, PathError> {
    let mut node = root;
    for (position, segment) in path.segments().iter().enumerate() {
        node = node.step(segment).ok_or_else(|| PathError::Unresolved {
            path: path.clone(),
            position,
            segment: segment.clone(),
        })?;
    }
    Ok(node)
}

/// Edit applied at the end of a path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Patch {
    /// Shallow-merge into the addressed component's attributes
    MergeAttrs(BTreeMap<String, AttributeValue>),
    ReplaceComponent(Component),
    ReplaceAttribute(AttributeValue),
    ReplaceValue(Value),
}

impl Patch {
    fn expected(&self) -> &'static str {
        match self {
            Patch::MergeAttrs(_) | Patch::ReplaceComponent(_) => "a component",
            Patch::ReplaceAttribute(_) => "an attribute",
            Patch::ReplaceValue(_) => "a JSON value",
        }
    }
}

pub fn update<R: PathRoot>(root: &R, path: &ComponentPath, patch: Patch) -> Result<R, PathError> {
    let mut next = root.clone();
    let target = walk_mut(next.node_mut(), path)?;
    let expected = patch.expected();

    match (target, patch) {
        (NodeMut::Component(component), Patch::MergeAttrs(attrs)) => {
            component.custom_attrs.extend(attrs);
        }
        (NodeMut::Component(component), Patch::ReplaceComponent(replacement)) => {
            *component = replacement;
        }
        (NodeMut::Attribute(attribute), Patch::ReplaceAttribute(replacement)) => {
            *attribute = replacement;
        }
        (NodeMut::Json(value), Patch::ReplaceValue(replacement)) => {
            *value = replacement;
        }
        (target, _) => {
            return Err(PathError::WrongTarget {
                path: path.clone(),
                found: target.kind(),
                expected,
            })
        }
    }
    Ok(next)
}

/// A sequence element to insert
#[derive(Debug, Clone, PartialEq)]
pub enum Insert {
    Page(Page),
    Component(Component),
    Value(Value),
}

/// Outcome of [`remove_at`]
#[derive(Debug, Clone)]
pub struct Removal<R> {
    pub root: R,
    pub parent: ComponentPath,
    pub index: usize,
}

impl<R> Removal<R> {
    /// Where `path` points after the removal; `None` if it pointed at the
    /// removed element or inside it
    pub fn reindex(&self, path: &ComponentPath) -> Option<ComponentPath> {
        shift(path, &self.parent, |i| match i.cmp(&self.index) {
            std::cmp::Ordering::Less => Some(i),
            std::cmp::Ordering::Equal => None,
            std::cmp::Ordering::Greater => Some(i - 1),
        })
    }
}

/// Outcome of [`insert_at`]
#[derive(Debug, Clone)]
pub struct Insertion<R> {
    pub root: R,
    pub parent: ComponentPath,
    pub index: usize,
}

impl<R> Insertion<R> {
    pub fn path(&self) -> ComponentPath {
        self.parent.child(self.index.to_string())
    }

    pub fn reindex(&self, path: &ComponentPath) -> Option<ComponentPath> {
        shift(path, &self.parent, |i| {
            Some(if i >= self.index { i + 1 } else { i })
        })
    }
}

fn shift(
    path: &ComponentPath,
    parent: &ComponentPath,
    map: impl Fn(usize) -> Option<usize>,
) -> Option<ComponentPath> {
    if !path.starts_with(parent) || path.len() == parent.len() {
        return Some(path.clone());
    }
    let position = parent.len();
    let Some(index) = parse_index(&path.segments()[position]) else {
        return Some(path.clone());
    };
    let mut segments = path.segments().to_vec();
    segments[position] = map(index)?.to_string();
    Some(ComponentPath::from(segments))
}

pub fn remove_at<R: PathRoot>(
    root: &R,
    parent: &ComponentPath,
    index: usize,
) -> Result<Removal<R>, PathError> {
    let mut next = root.clone();
    let target = walk_mut(next.node_mut(), parent)?;

    let len = match target {
        NodeMut::Pages(pages) => remove_from(pages, index),
        NodeMut::Components(components) => remove_from(components, index),
        NodeMut::Items(items) | NodeMut::Json(Value::Array(items)) => remove_from(items, index),
        target => {
            return Err(PathError::WrongTarget {
                path: parent.clone(),
                found: target.kind(),
                expected: "a sequence",
            })
        }
    };
    if let Some(len) = len {
        return Err(PathError::OutOfBounds {
            path: parent.clone(),
            index,
            len,
        });
    }

    Ok(Removal {
        root: next,
        parent: parent.clone(),
        index,
    })
}

/// Remove `index`, or report the length when it is out of bounds
fn remove_from<T>(items: &mut Vec<T>, index: usize) -> Option<usize> {
    if index < items.len() {
        items.remove(index);
        None
    } else {
        Some(items.len())
    }
}

pub fn insert_at<R: PathRoot>(
    root: &R,
    parent: &ComponentPath,
    index: usize,
    node: Insert,
) -> Result<Insertion<R>, PathError> {
    let mut next = root.clone();
    let target = walk_mut(next.node_mut(), parent)?;

    let len = match (target, node) {
        (NodeMut::Pages(pages), Insert::Page(page)) => insert_into(pages, index, Arc::new(page)),
        (NodeMut::Components(components), Insert::Component(component)) => {
            insert_into(components, index, Arc::new(component))
        }
        (NodeMut::Items(items), Insert::Value(value))
        | (NodeMut::Json(Value::Array(items)), Insert::Value(value)) => {
            insert_into(items, index, value)
        }
        (target, _) => {
            return Err(PathError::WrongTarget {
                path: parent.clone(),
                found: target.kind(),
                expected: "a sequence of the inserted kind",
            })
        }
    };
    if let Some(len) = len {
        return Err(PathError::OutOfBounds {
            path: parent.clone(),
            index,
            len,
        });
    }

    Ok(Insertion {
        root: next,
        parent: parent.clone(),
        index,
    })
}

fn insert_into<T>(items: &mut Vec<T>, index: usize, item: T) -> Option<usize> {
    if index <= items.len() {
        items.insert(index, item);
        None
    } else {
        Some(items.len())
    }
}
