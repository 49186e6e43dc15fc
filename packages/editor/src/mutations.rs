//! # Editor Mutations
//!
//! Every editor action is a [`Mutation`]. Applying one is a pure function of
//! the previous [`EditorState`]: the old state (and the `Site` it points at)
//! is never touched, and each successful edit produces exactly one new site
//! version.
//!
//! ## Selections
//!
//! The selected component is a page-rooted [`VersionedPath`]. Edits that only
//! change attributes keep the selection and re-stamp it with the new version.
//! Edits that shift a sequence (remove or insert) drop any selection at or
//! after the edited index of that sequence, and replacing a node or slot
//! drops any selection inside it. Positional paths are never silently
//! rebound to a different component.

use crate::path::{self, ComponentPath, Insert, Patch, PathError, VersionedPath};
use pagesmith_evaluator::cascade;
use pagesmith_model::{
    AttributeValue, Component, GlobalComponents, Page, Site, Tag, TokenOverride, TypographyOverride,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Which global component slot an edit targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlobalSlot {
    Header,
    Footer,
}

impl GlobalSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            GlobalSlot::Header => "header",
            GlobalSlot::Footer => "footer",
        }
    }
}

/// Editor actions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Select a page; clears the component selection
    SelectPage { page_id: Option<String> },

    /// Select a component on the selected page
    SelectComponent { path: ComponentPath },

    /// Shallow-merge top-level page fields (`id` excluded)
    UpdatePage {
        page_id: String,
        patch: Map<String, Value>,
    },

    /// Merge attributes into a component. Without `page_id` the path is
    /// rooted at the site (`global_components/header`, ...)
    UpdateComponentAttrs {
        page_id: Option<String>,
        path: ComponentPath,
        attrs: BTreeMap<String, AttributeValue>,
    },

    ReplaceComponent {
        page_id: Option<String>,
        path: ComponentPath,
        component: Component,
    },

    /// Remove the sequence element `path` points at
    RemoveComponent {
        page_id: String,
        path: ComponentPath,
    },

    /// Insert into a page's component list; `None` appends
    InsertComponent {
        page_id: String,
        index: Option<usize>,
        component: Component,
    },

    /// Append a page with default publishing fields and select it
    AddPage {
        page_id: String,
        #[serde(default)]
        page_type: Option<String>,
    },

    SetGlobalComponent {
        slot: GlobalSlot,
        component: Option<Component>,
    },

    SetGlobalTypography { tag: Tag, patch: TokenOverride },

    SetPageTypography {
        page_id: String,
        tag: Tag,
        patch: TokenOverride,
    },

    SetComponentTypography {
        page_id: Option<String>,
        path: ComponentPath,
        tag: Tag,
        patch: TokenOverride,
    },

    /// Set or remove (`None`) a color token
    SetColorToken { name: String, value: Option<String> },

    /// Record a font family as loaded
    FontLoaded { family: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Page already exists: {0}")]
    DuplicatePage(String),

    #[error("Path error: {0}")]
    Path(#[from] PathError),

    #[error("Path {0} does not address a sequence element")]
    NotAnElement(ComponentPath),

    #[error("Invalid page patch: {0}")]
    InvalidPatch(String),
}

/// Snapshot the editor works on
#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    pub site: Arc<Site>,
    pub version: u64,
    pub selected_page: Option<String>,
    /// Rooted at the selected page
    pub selection: Option<VersionedPath>,
}

impl EditorState {
    /// Fresh state selecting the first page
    pub fn new(site: Site) -> Self {
        let selected_page = site.pages.first().map(|page| page.id.clone());
        Self {
            site: Arc::new(site),
            version: 0,
            selected_page,
            selection: None,
        }
    }

    pub fn selected_page(&self) -> Option<&Arc<Page>> {
        self.selected_page
            .as_deref()
            .and_then(|id| self.site.page(id))
    }

    /// The selected component, if its path is current and still resolves
    pub fn selected_component(&self) -> Option<&Component> {
        let page = self.selected_page()?;
        self.selection
            .as_ref()?
            .resolve(page.as_ref(), self.version)?
            .as_component()
    }

    fn with_site(&self, site: Site) -> Self {
        let version = self.version + 1;
        Self {
            site: Arc::new(site),
            version,
            selected_page: self.selected_page.clone(),
            selection: self.selection.as_ref().map(|s| s.restamp(version)),
        }
    }

    /// Drop the selection when it sits at or after `index` in `parent` on `page_id`
    fn drop_shifted_selection(mut self, page_id: &str, parent: &ComponentPath, index: usize) -> Self {
        if self.selected_page.as_deref() != Some(page_id) {
            return self;
        }
        let shifted = self.selection.as_ref().is_some_and(|selection| {
            let path = &selection.path;
            path.len() > parent.len()
                && path.starts_with(parent)
                && path::parse_index(&path.segments()[parent.len()]).is_some_and(|i| i >= index)
        });
        if shifted {
            debug!(page = page_id, "dropping selection invalidated by a sequence edit");
            self.selection = None;
        }
        self
    }

    /// Drop a selection that sits strictly below `path` when the edit replaced
    /// what it points into. `attrs` limits the check to the merged keys.
    fn drop_replaced_selection(
        mut self,
        page_id: Option<&str>,
        path: &ComponentPath,
        attrs: Option<&BTreeMap<String, AttributeValue>>,
    ) -> Self {
        if page_id.is_none() || self.selected_page.as_deref() != page_id {
            return self;
        }
        let replaced = self.selection.as_ref().is_some_and(|selection| {
            let selected = &selection.path;
            if selected.len() <= path.len() || !selected.starts_with(path) {
                return false;
            }
            let Some(attrs) = attrs else {
                return true;
            };
            let rest = &selected.segments()[path.len()..];
            let key = match rest {
                [first, attr, ..] if first == "custom_attrs" => attr,
                [first, ..] => first,
                [] => return false,
            };
            attrs.contains_key(key)
        });
        if replaced {
            debug!(path = %path, "dropping selection under a replaced node");
            self.selection = None;
        }
        self
    }
}

impl Mutation {
    /// Apply to `state`, producing the next state
    pub fn apply(&self, state: &EditorState) -> Result<EditorState, MutationError> {
        let site = state.site.as_ref();
        match self {
            Mutation::SelectPage { page_id } => {
                if let Some(id) = page_id {
                    site.page(id)
                        .ok_or_else(|| MutationError::PageNotFound(id.clone()))?;
                }
                Ok(EditorState {
                    selected_page: page_id.clone(),
                    selection: None,
                    ..state.clone()
                })
            }

            Mutation::SelectComponent { path } => Ok(EditorState {
                selection: Some(VersionedPath::new(path.clone(), state.version)),
                ..state.clone()
            }),

            Mutation::UpdatePage { page_id, patch } => {
                let index = page_index(site, page_id)?;
                let page = merge_page(&site.pages[index], patch)?;
                let mut next = site.clone();
                next.pages[index] = Arc::new(page);
                let next = state.with_site(next);
                if patch.contains_key("components") {
                    Ok(next.drop_shifted_selection(page_id, &ComponentPath::from(["components"]), 0))
                } else {
                    Ok(next)
                }
            }

            Mutation::UpdateComponentAttrs {
                page_id,
                path,
                attrs,
            } => {
                let next = update_scoped(site, page_id.as_deref(), path, Patch::MergeAttrs(attrs.clone()))?;
                Ok(state
                    .with_site(next)
                    .drop_replaced_selection(page_id.as_deref(), path, Some(attrs)))
            }

            Mutation::ReplaceComponent {
                page_id,
                path,
                component,
            } => {
                let patch = Patch::ReplaceComponent(component.clone());
                let next = update_scoped(site, page_id.as_deref(), path, patch)?;
                Ok(state
                    .with_site(next)
                    .drop_replaced_selection(page_id.as_deref(), path, None))
            }

            Mutation::RemoveComponent { page_id, path } => {
                let index = page_index(site, page_id)?;
                let (parent, position) = split_element(path)?;
                let removal = path::remove_at(site.pages[index].as_ref(), &parent, position)?;
                let mut next = site.clone();
                next.pages[index] = Arc::new(removal.root);
                Ok(state
                    .with_site(next)
                    .drop_shifted_selection(page_id, &parent, position))
            }

            Mutation::InsertComponent {
                page_id,
                index,
                component,
            } => {
                let page_at = page_index(site, page_id)?;
                let page = site.pages[page_at].as_ref();
                let position = index.unwrap_or(page.components.len());
                let parent = ComponentPath::from(["components"]);
                let insertion =
                    path::insert_at(page, &parent, position, Insert::Component(component.clone()))?;
                let mut next = site.clone();
                next.pages[page_at] = Arc::new(insertion.root);
                Ok(state
                    .with_site(next)
                    .drop_shifted_selection(page_id, &parent, position))
            }

            Mutation::AddPage { page_id, page_type } => {
                if site.page(page_id).is_some() {
                    return Err(MutationError::DuplicatePage(page_id.clone()));
                }
                let mut next = site.clone();
                next.pages
                    .push(Arc::new(new_page(page_id, page_type.as_deref(), site.pages.len() + 1)));
                let mut state = state.with_site(next);
                state.selected_page = Some(page_id.clone());
                state.selection = None;
                Ok(state)
            }

            Mutation::SetGlobalComponent { slot, component } => {
                let mut next = site.clone();
                let globals = next.global_components.get_or_insert_with(GlobalComponents::default);
                let target = match slot {
                    GlobalSlot::Header => &mut globals.header,
                    GlobalSlot::Footer => &mut globals.footer,
                };
                *target = component.clone().map(Arc::new);
                debug!(slot = slot.as_str(), cleared = component.is_none(), "global component set");
                Ok(state.with_site(next))
            }

            Mutation::SetGlobalTypography { tag, patch } => {
                let mut next = site.clone();
                cascade::apply_override(
                    &mut next.typography.global,
                    &TypographyOverride::default().with(*tag, patch.clone()),
                );
                Ok(state.with_site(next))
            }

            Mutation::SetPageTypography {
                page_id,
                tag,
                patch,
            } => {
                let index = page_index(site, page_id)?;
                let mut next = site.clone();
                let page = Arc::make_mut(&mut next.pages[index]);
                let layer = page.typography_override.get_or_insert_with(Default::default);
                layer.set(*tag, patch);
                if layer.is_empty() {
                    page.typography_override = None;
                }
                Ok(state.with_site(next))
            }

            Mutation::SetComponentTypography {
                page_id,
                path,
                tag,
                patch,
            } => {
                let current = component_at(site, page_id.as_deref(), path)?;
                let mut component = current.clone();
                let layer = component.typography_override.get_or_insert_with(Default::default);
                layer.set(*tag, patch);
                if layer.is_empty() {
                    component.typography_override = None;
                }
                let next = update_scoped(
                    site,
                    page_id.as_deref(),
                    path,
                    Patch::ReplaceComponent(component),
                )?;
                Ok(state.with_site(next))
            }

            Mutation::SetColorToken { name, value } => {
                let mut next = site.clone();
                match value {
                    Some(value) => {
                        next.design_tokens.colors.insert(name.clone(), value.clone());
                    }
                    None => {
                        next.design_tokens.colors.remove(name);
                    }
                }
                Ok(state.with_site(next))
            }

            Mutation::FontLoaded { family } => {
                if site.typography.loaded_fonts.contains(family) {
                    return Ok(state.clone());
                }
                let mut next = site.clone();
                next.typography.loaded_fonts.insert(family.clone());
                Ok(state.with_site(next))
            }
        }
    }
}

fn page_index(site: &Site, page_id: &str) -> Result<usize, MutationError> {
    site.page_index(page_id)
        .ok_or_else(|| MutationError::PageNotFound(page_id.to_string()))
}

fn split_element(path: &ComponentPath) -> Result<(ComponentPath, usize), MutationError> {
    match (path.parent(), path.last_index()) {
        (Some(parent), Some(index)) => Ok((parent, index)),
        _ => Err(MutationError::NotAnElement(path.clone())),
    }
}

fn update_scoped(
    site: &Site,
    page_id: Option<&str>,
    path: &ComponentPath,
    patch: Patch,
) -> Result<Site, MutationError> {
    match page_id {
        None => Ok(path::update(site, path, patch)?),
        Some(id) => {
            let index = page_index(site, id)?;
            let page = path::update(site.pages[index].as_ref(), path, patch)?;
            let mut next = site.clone();
            next.pages[index] = Arc::new(page);
            Ok(next)
        }
    }
}

fn component_at<'a>(
    site: &'a Site,
    page_id: Option<&str>,
    path: &ComponentPath,
) -> Result<&'a Component, MutationError> {
    let node = match page_id {
        None => path::get(site, path),
        Some(id) => path::get(site.pages[page_index(site, id)?].as_ref(), path),
    };
    match node {
        Some(node) => node.as_component().ok_or_else(|| {
            PathError::WrongTarget {
                path: path.clone(),
                found: node.kind(),
                expected: "a component",
            }
            .into()
        }),
        None => Err(PathError::Unresolved {
            path: path.clone(),
            position: path.len().saturating_sub(1),
            segment: path.last().unwrap_or_default().to_string(),
        }
        .into()),
    }
}

/// Shallow page merge: named fields are set directly, everything else lands in
/// `meta`. Components stay shared unless the patch carries a `components` key.
fn merge_page(page: &Page, patch: &Map<String, Value>) -> Result<Page, MutationError> {
    let mut next = page.clone();
    for (key, value) in patch {
        match key.as_str() {
            "id" => {
                if value.as_str() != Some(page.id.as_str()) {
                    return Err(MutationError::InvalidPatch("page id cannot change".to_string()));
                }
            }
            "slug" => next.slug = field(key, value)?,
            "title" => next.title = field(key, value)?,
            "typography_override" => next.typography_override = field(key, value)?,
            "components" => next.components = field(key, value)?,
            _ => {
                next.meta.insert(key.clone(), value.clone());
            }
        }
    }
    Ok(next)
}

fn field<T: serde::de::DeserializeOwned>(key: &str, value: &Value) -> Result<T, MutationError> {
    T::deserialize(value).map_err(|err| MutationError::InvalidPatch(format!("{key}: {err}")))
}

fn new_page(id: &str, page_type: Option<&str>, ordinal: usize) -> Page {
    let mut page = Page::new(id, format!("new-page-{ordinal}"));
    page.title = Some("New page".to_string());

    let image = json!({ "src": "", "alt": "", "width": 0, "height": 0, "formats": ["webp"], "srcset": [] });
    let defaults = json!({
        "type": page_type.unwrap_or("page"),
        "language": "en",
        "hreflang_alternates": [],
        "meta_title": "",
        "meta_description": "",
        "canonical": null,
        "noindex": false,
        "nofollow": false,
        "featured_image": image.clone(),
        "open_graph": {
            "og_title": "",
            "og_description": "",
            "og_image": image,
            "og_type": "website",
            "twitter_card": "summary"
        },
        "schema_org": {},
        "breadcrumbs": [],
        "sitemap": { "priority": 0.5, "changefreq": "monthly" },
        "redirect_from": []
    });
    if let Value::Object(meta) = defaults {
        page.meta = meta;
    }
    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagesmith_model::AtomicHierarchy;
    use pretty_assertions::assert_eq;

    fn named(name: &str) -> Component {
        Component::new(name, AtomicHierarchy::Organism)
    }

    fn state() -> EditorState {
        let site = Site::new("site")
            .with_page(
                Page::new("home", "/")
                    .with_component(named("a"))
                    .with_component(named("b")),
            )
            .with_page(Page::new("about", "/about"));
        EditorState::new(site)
    }

    #[test]
    fn test_select_page_clears_selection() {
        let state = Mutation::SelectComponent {
            path: ["components", "0"].into(),
        }
        .apply(&state())
        .unwrap();
        assert_eq!(state.selected_component().map(|c| c.name.as_str()), Some("a"));

        let next = Mutation::SelectPage {
            page_id: Some("about".to_string()),
        }
        .apply(&state)
        .unwrap();
        assert_eq!(next.selected_page.as_deref(), Some("about"));
        assert_eq!(next.selection, None);
        assert_eq!(next.version, state.version);

        let missing = Mutation::SelectPage {
            page_id: Some("nope".to_string()),
        }
        .apply(&state);
        assert_eq!(missing, Err(MutationError::PageNotFound("nope".to_string())));
    }

    #[test]
    fn test_remove_drops_shifted_selection() {
        let selected = Mutation::SelectComponent {
            path: ["components", "1"].into(),
        }
        .apply(&state())
        .unwrap();

        let next = Mutation::RemoveComponent {
            page_id: "home".to_string(),
            path: ["components", "0"].into(),
        }
        .apply(&selected)
        .unwrap();

        let names: Vec<_> = next.selected_page().unwrap().components.iter().map(|c| c.name.clone()).collect();
        assert_eq!(names, vec!["b"]);
        assert_eq!(next.version, 1);
        assert_eq!(next.selected_component(), None);

        // the stale path against the new version resolves to nothing either way
        let stale = VersionedPath::new(["components", "1"].into(), next.version);
        assert!(stale.resolve(next.selected_page().unwrap().as_ref(), next.version).is_none());

        // the previous state is untouched
        assert_eq!(selected.site.pages[0].components.len(), 2);
    }

    #[test]
    fn test_remove_keeps_selection_before_index() {
        let selected = Mutation::SelectComponent {
            path: ["components", "0"].into(),
        }
        .apply(&state())
        .unwrap();
        let next = Mutation::RemoveComponent {
            page_id: "home".to_string(),
            path: ["components", "1"].into(),
        }
        .apply(&selected)
        .unwrap();
        assert_eq!(next.selected_component().map(|c| c.name.as_str()), Some("a"));
    }

    #[test]
    fn test_attribute_edit_restamps_selection() {
        let selected = Mutation::SelectComponent {
            path: ["components", "1"].into(),
        }
        .apply(&state())
        .unwrap();

        let mut attrs = BTreeMap::new();
        attrs.insert("title".to_string(), AttributeValue::string("Hi"));
        let next = Mutation::UpdateComponentAttrs {
            page_id: Some("home".to_string()),
            path: ["components", "1"].into(),
            attrs,
        }
        .apply(&selected)
        .unwrap();

        let component = next.selected_component().unwrap();
        assert_eq!(component.custom_attrs["title"], AttributeValue::string("Hi"));
        assert!(Arc::ptr_eq(&selected.site.pages[1], &next.site.pages[1]));
    }

    fn slotted_state() -> EditorState {
        let hero = named("hero").with_slot("left", named("button"));
        let site = Site::new("site").with_page(Page::new("home", "/").with_component(hero));
        Mutation::SelectComponent {
            path: ["components", "0", "left"].into(),
        }
        .apply(&EditorState::new(site))
        .unwrap()
    }

    #[test]
    fn test_slot_replacement_drops_selection_inside_it() {
        let selected = slotted_state();
        assert_eq!(selected.selected_component().map(|c| c.name.as_str()), Some("button"));

        let mut attrs = BTreeMap::new();
        attrs.insert("left".to_string(), AttributeValue::component(named("other")));
        let next = Mutation::UpdateComponentAttrs {
            page_id: Some("home".to_string()),
            path: ["components", "0"].into(),
            attrs,
        }
        .apply(&selected)
        .unwrap();
        assert_eq!(next.selection, None);
        assert_eq!(next.selected_component(), None);

        let replaced = Mutation::ReplaceComponent {
            page_id: Some("home".to_string()),
            path: ["components", "0"].into(),
            component: named("hero"),
        }
        .apply(&selected)
        .unwrap();
        assert_eq!(replaced.selection, None);
    }

    #[test]
    fn test_unrelated_attr_keeps_slot_selection() {
        let selected = slotted_state();
        let mut attrs = BTreeMap::new();
        attrs.insert("title".to_string(), AttributeValue::string("Hi"));
        let next = Mutation::UpdateComponentAttrs {
            page_id: Some("home".to_string()),
            path: ["components", "0"].into(),
            attrs,
        }
        .apply(&selected)
        .unwrap();
        assert_eq!(next.selected_component().map(|c| c.name.as_str()), Some("button"));
    }

    #[test]
    fn test_update_page_shares_components() {
        let before = state();
        let mut patch = Map::new();
        patch.insert("title".to_string(), json!("Welcome"));
        let next = Mutation::UpdatePage {
            page_id: "home".to_string(),
            patch,
        }
        .apply(&before)
        .unwrap();

        let (old, new) = (&before.site.pages[0], &next.site.pages[0]);
        assert!(!Arc::ptr_eq(old, new));
        assert!(Arc::ptr_eq(&old.components[0], &new.components[0]));
        assert!(Arc::ptr_eq(&old.components[1], &new.components[1]));
        assert!(Arc::ptr_eq(&before.site.pages[1], &next.site.pages[1]));
    }

    #[test]
    fn test_update_page_components_drops_selection() {
        let selected = Mutation::SelectComponent {
            path: ["components", "0"].into(),
        }
        .apply(&state())
        .unwrap();
        let mut patch = Map::new();
        patch.insert(
            "components".to_string(),
            json!([{ "name": "b", "atomic_hierarchy": "organism" }, { "name": "a", "atomic_hierarchy": "organism" }]),
        );
        let next = Mutation::UpdatePage {
            page_id: "home".to_string(),
            patch,
        }
        .apply(&selected)
        .unwrap();
        assert_eq!(next.site.pages[0].components[0].name, "b");
        assert_eq!(next.selection, None);
    }

    #[test]
    fn test_insert_appends_by_default() {
        let next = Mutation::InsertComponent {
            page_id: "about".to_string(),
            index: None,
            component: named("new"),
        }
        .apply(&state())
        .unwrap();
        assert_eq!(next.site.pages[1].components[0].name, "new");

        let out_of_bounds = Mutation::InsertComponent {
            page_id: "about".to_string(),
            index: Some(4),
            component: named("new"),
        }
        .apply(&state());
        assert!(matches!(
            out_of_bounds,
            Err(MutationError::Path(PathError::OutOfBounds { len: 0, .. }))
        ));
    }

    #[test]
    fn test_add_page_selects_it() {
        let next = Mutation::AddPage {
            page_id: "contact".to_string(),
            page_type: None,
        }
        .apply(&state())
        .unwrap();
        let page = next.selected_page().unwrap();
        assert_eq!(page.id, "contact");
        assert_eq!(page.slug, "new-page-3");
        assert_eq!(page.meta["sitemap"]["changefreq"], "monthly");

        let duplicate = Mutation::AddPage {
            page_id: "home".to_string(),
            page_type: None,
        }
        .apply(&state());
        assert_eq!(duplicate, Err(MutationError::DuplicatePage("home".to_string())));
    }

    #[test]
    fn test_update_page_merges_fields() {
        let mut patch = Map::new();
        patch.insert("title".to_string(), json!("Welcome"));
        patch.insert("noindex".to_string(), json!(true));
        let next = Mutation::UpdatePage {
            page_id: "home".to_string(),
            patch,
        }
        .apply(&state())
        .unwrap();
        let page = &next.site.pages[0];
        assert_eq!(page.title.as_deref(), Some("Welcome"));
        assert_eq!(page.meta["noindex"], json!(true));
        assert_eq!(page.components.len(), 2);

        let mut rename = Map::new();
        rename.insert("id".to_string(), json!("other"));
        let err = Mutation::UpdatePage {
            page_id: "home".to_string(),
            patch: rename,
        }
        .apply(&state());
        assert!(matches!(err, Err(MutationError::InvalidPatch(_))));
    }

    #[test]
    fn test_typography_setters() {
        let patch = TokenOverride {
            weight: Some(800),
            ..Default::default()
        };
        let state = Mutation::SetPageTypography {
            page_id: "home".to_string(),
            tag: Tag::H1,
            patch: patch.clone(),
        }
        .apply(&state())
        .unwrap();
        let layer = state.site.pages[0].typography_override.as_ref().unwrap();
        assert_eq!(layer.get(Tag::H1).and_then(|t| t.weight), Some(800));

        let state = Mutation::SetComponentTypography {
            page_id: Some("home".to_string()),
            path: ["components", "0"].into(),
            tag: Tag::P,
            patch,
        }
        .apply(&state)
        .unwrap();
        let component = &state.site.pages[0].components[0];
        assert!(component.typography_override.is_some());

        let state = Mutation::SetGlobalTypography {
            tag: Tag::H2,
            patch: TokenOverride {
                font_family: Some("Lora".to_string()),
                ..Default::default()
            },
        }
        .apply(&state)
        .unwrap();
        assert_eq!(state.site.typography.global.h2.font_family, "Lora");
        assert_eq!(state.version, 3);
    }

    #[test]
    fn test_global_components_and_tokens() {
        let state = Mutation::SetGlobalComponent {
            slot: GlobalSlot::Header,
            component: Some(named("nav")),
        }
        .apply(&state())
        .unwrap();
        assert_eq!(state.site.header().map(|c| c.name.as_str()), Some("nav"));

        let mut attrs = BTreeMap::new();
        attrs.insert("sticky".to_string(), AttributeValue::Number(1.0));
        let state = Mutation::UpdateComponentAttrs {
            page_id: None,
            path: ["global_components", "header"].into(),
            attrs,
        }
        .apply(&state)
        .unwrap();
        assert!(state.site.header().unwrap().custom_attrs.contains_key("sticky"));

        let state = Mutation::SetColorToken {
            name: "primary".to_string(),
            value: Some("#0044ff".to_string()),
        }
        .apply(&state)
        .unwrap();
        assert_eq!(state.site.design_tokens.colors["primary"], "#0044ff");
    }

    #[test]
    fn test_font_loaded_is_idempotent() {
        let loaded = Mutation::FontLoaded {
            family: "Inter".to_string(),
        };
        let once = loaded.apply(&state()).unwrap();
        let twice = loaded.apply(&once).unwrap();
        assert_eq!(once.version, twice.version);
        assert!(twice.site.typography.loaded_fonts.contains("Inter"));
    }

    #[test]
    fn test_mutation_deserializes() {
        let mutation: Mutation = serde_json::from_value(json!({
            "RemoveComponent": { "page_id": "home", "path": ["components", "0"] }
        }))
        .unwrap();
        assert_eq!(
            mutation,
            Mutation::RemoveComponent {
                page_id: "home".to_string(),
                path: ["components", "0"].into(),
            }
        );
    }
}
