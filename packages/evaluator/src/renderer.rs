//! # Composition Renderer
//!
//! Walks a page into an ordered list of render instructions:
//!
//! ```text
//! [global header?, ...page.components, global footer?]
//! ```
//!
//! Every node is looked up in the registry. Anything that cannot render
//! becomes a [`Placeholder`] in place; siblings and ancestors are unaffected.
//!
//! ## Recursion Protection
//!
//! Slots are only followed for attributes the schema declares as
//! `component`. The names on the active recursion path are kept on a stack;
//! meeting one of them again yields a `Cycle` placeholder instead of
//! descending. Acyclic nesting is bounded by
//! [`RenderConfig::max_slot_depth`].
//!
//! ## Loading
//!
//! A node whose renderer has not loaded yet becomes a `Loading` placeholder
//! and its name lands in [`RenderTree::pending`]. The placeholder keeps its
//! source component so [`CompositionRenderer::rerender_loaded`] can redo just
//! that node once the registry has the renderer.

use crate::cascade;
use crate::config::RenderConfig;
use crate::errors::{PlaceholderKind, ValidationError};
use crate::resolve::{self, ResolvedAttrs};
use pagesmith_model::{Component, Page, Site, TypographyScale};
use pagesmith_registry::{ComponentRegistry, Lookup, Renderer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Site-rooted path segments
pub type NodePath = Vec<String>;

#[derive(Clone)]
pub struct RenderedComponent {
    pub name: String,
    pub path: NodePath,
    pub renderer: Arc<dyn Renderer>,
    pub attrs: ResolvedAttrs,
    pub typography: TypographyScale,
    /// Filled slots, keyed by attribute name
    pub children: BTreeMap<String, RenderNode>,
}

impl fmt::Debug for RenderedComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderedComponent")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("attrs", &self.attrs)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct Placeholder {
    pub name: String,
    pub path: NodePath,
    pub kind: PlaceholderKind,
    /// Kept for loading placeholders so the node can be redone
    pub source: Option<Arc<Component>>,
    /// Names on the recursion path above this node
    pub ancestors: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum RenderNode {
    Render(RenderedComponent),
    Placeholder(Placeholder),
}

impl RenderNode {
    pub fn name(&self) -> &str {
        match self {
            RenderNode::Render(node) => &node.name,
            RenderNode::Placeholder(node) => &node.name,
        }
    }

    pub fn path(&self) -> &[String] {
        match self {
            RenderNode::Render(node) => &node.path,
            RenderNode::Placeholder(node) => &node.path,
        }
    }

    pub fn placeholder_kind(&self) -> Option<&PlaceholderKind> {
        match self {
            RenderNode::Placeholder(node) => Some(&node.kind),
            RenderNode::Render(_) => None,
        }
    }

    /// Depth-first visit of this node and its slot children
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a RenderNode)) {
        visit(self);
        if let RenderNode::Render(node) = self {
            for child in node.children.values() {
                child.walk(visit);
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderTree {
    pub page_id: String,
    pub instructions: Vec<RenderNode>,
    /// Names waiting on their loader
    pub pending: BTreeSet<String>,
    /// Page-level effective typography (global ⊕ page)
    pub typography: TypographyScale,
    pub diagnostics: Vec<ValidationError>,
}

impl RenderTree {
    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }

    /// All placeholders, depth first
    pub fn placeholders(&self) -> Vec<&Placeholder> {
        let mut out = Vec::new();
        for node in &self.instructions {
            node.walk(&mut |n| {
                if let RenderNode::Placeholder(p) = n {
                    out.push(p);
                }
            });
        }
        out
    }
}

/// Per-render context shared by every node
struct Scope<'a> {
    site: &'a Site,
    page: &'a Page,
    pending: BTreeSet<String>,
    diagnostics: Vec<ValidationError>,
}

pub struct CompositionRenderer<'a> {
    registry: &'a ComponentRegistry,
    config: &'a RenderConfig,
}

impl<'a> CompositionRenderer<'a> {
    pub fn new(registry: &'a ComponentRegistry, config: &'a RenderConfig) -> Self {
        Self { registry, config }
    }

    #[instrument(skip_all, fields(page = %page.id, components = page.components.len()))]
    pub fn render(&self, site: &Site, page: &Page) -> RenderTree {
        let page_index = site
            .page_index(&page.id)
            .map(|i| i.to_string())
            .unwrap_or_default();
        let mut scope = Scope {
            site,
            page,
            pending: BTreeSet::new(),
            diagnostics: Vec::new(),
        };
        let mut stack = Vec::new();
        let mut instructions = Vec::new();

        if let Some(header) = site.header() {
            let path = vec!["global_components".to_string(), "header".to_string()];
            instructions.push(self.render_component(&mut scope, header, path, &mut stack));
        }

        for (index, component) in page.components.iter().enumerate() {
            let path = vec![
                "pages".to_string(),
                page_index.clone(),
                "components".to_string(),
                index.to_string(),
            ];
            instructions.push(self.render_component(&mut scope, component, path, &mut stack));
        }

        if let Some(footer) = site.footer() {
            let path = vec!["global_components".to_string(), "footer".to_string()];
            instructions.push(self.render_component(&mut scope, footer, path, &mut stack));
        }

        debug!(
            instructions = instructions.len(),
            pending = scope.pending.len(),
            "rendered page"
        );

        RenderTree {
            page_id: page.id.clone(),
            instructions,
            pending: scope.pending,
            typography: cascade::merge(
                &site.typography.global,
                page.typography_override.as_ref(),
                None,
            ),
            diagnostics: scope.diagnostics,
        }
    }

    /// Redo the loading placeholders whose renderer has since resolved
    #[instrument(skip_all, fields(page = %page.id, pending = tree.pending.len()))]
    pub fn rerender_loaded(&self, site: &Site, page: &Page, tree: &RenderTree) -> RenderTree {
        let mut scope = Scope {
            site,
            page,
            pending: BTreeSet::new(),
            diagnostics: tree.diagnostics.clone(),
        };
        let instructions = tree
            .instructions
            .iter()
            .map(|node| self.refresh(&mut scope, node))
            .collect();

        RenderTree {
            page_id: tree.page_id.clone(),
            instructions,
            pending: scope.pending,
            typography: tree.typography.clone(),
            diagnostics: scope.diagnostics,
        }
    }

    fn refresh(&self, scope: &mut Scope<'_>, node: &RenderNode) -> RenderNode {
        match node {
            RenderNode::Placeholder(placeholder) if placeholder.kind == PlaceholderKind::Loading => {
                let Some(source) = &placeholder.source else {
                    return node.clone();
                };
                if matches!(self.registry.lookup(&placeholder.name), Lookup::Loading(_)) {
                    scope.pending.insert(placeholder.name.clone());
                    return node.clone();
                }
                debug!(name = %placeholder.name, "re-rendering loaded component");
                let mut stack = placeholder.ancestors.clone();
                self.render_component(scope, source, placeholder.path.clone(), &mut stack)
            }
            RenderNode::Render(rendered) => {
                let mut rendered = rendered.clone();
                for child in rendered.children.values_mut() {
                    *child = self.refresh(scope, child);
                }
                RenderNode::Render(rendered)
            }
            RenderNode::Placeholder(_) => node.clone(),
        }
    }

    fn render_component(
        &self,
        scope: &mut Scope<'_>,
        component: &Arc<Component>,
        path: NodePath,
        stack: &mut Vec<String>,
    ) -> RenderNode {
        let name = component.name.as_str();
        let placeholder = |kind: PlaceholderKind, stack: &[String]| {
            RenderNode::Placeholder(Placeholder {
                name: name.to_string(),
                path: path.clone(),
                kind,
                source: None,
                ancestors: stack.to_vec(),
            })
        };

        if stack.iter().any(|ancestor| ancestor == name) {
            let mut call_stack = stack.clone();
            call_stack.push(name.to_string());
            warn!(component = name, stack = ?call_stack, "recursive slot detected");
            return placeholder(PlaceholderKind::Cycle { call_stack }, stack);
        }

        if stack.len() > self.config.max_slot_depth {
            warn!(
                component = name,
                limit = self.config.max_slot_depth,
                "slot nesting too deep"
            );
            return placeholder(
                PlaceholderKind::DepthExceeded {
                    limit: self.config.max_slot_depth,
                },
                stack,
            );
        }

        let (entry, renderer) = match self.registry.lookup(name) {
            Lookup::NotFound => {
                debug!(component = name, "component not found");
                return placeholder(PlaceholderKind::NotFound, stack);
            }
            Lookup::Loading(_) => {
                scope.pending.insert(name.to_string());
                return RenderNode::Placeholder(Placeholder {
                    name: name.to_string(),
                    path: path.clone(),
                    kind: PlaceholderKind::Loading,
                    source: Some(component.clone()),
                    ancestors: stack.clone(),
                });
            }
            Lookup::Failed(_, err) => {
                return placeholder(
                    PlaceholderKind::LoadFailed {
                        message: err.message,
                    },
                    stack,
                );
            }
            Lookup::Ready(entry, renderer) => (entry, renderer),
        };

        let (attrs, mismatches) = resolve::apply_schema_defaults(&entry.schema, &component.custom_attrs);
        let (resolved, malformed) = resolve::resolve_with_diagnostics(&attrs, &scope.site.design_tokens.colors);
        scope.diagnostics.extend(mismatches);
        scope.diagnostics.extend(malformed);

        let typography = cascade::merge(
            &scope.site.typography.global,
            scope.page.typography_override.as_ref(),
            component.typography_override.as_ref(),
        );

        let mut children = BTreeMap::new();
        stack.push(name.to_string());
        for slot in entry.schema.slot_names() {
            let Some(child) = attrs.get(slot).and_then(|value| value.as_component()) else {
                continue;
            };
            let mut child_path = path.clone();
            child_path.push(slot.to_string());
            let node = self.render_component(scope, child, child_path, stack);
            children.insert(slot.to_string(), node);
        }
        stack.pop();

        RenderNode::Render(RenderedComponent {
            name: name.to_string(),
            path,
            renderer,
            attrs: resolved,
            typography,
            children,
        })
    }
}
