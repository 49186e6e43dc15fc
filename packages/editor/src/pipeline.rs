//! # Editing Pipeline
//!
//! Coordinates Mutate → Render → Complete for one site document.
//!
//! Rendering is synchronous. The two asynchronous collaborators, component
//! loading and font loading, complete through tickets:
//!
//! - [`RenderTicket`] names the page and site version a render was taken
//!   against. A load completion re-renders only if both are still current.
//! - [`FontTicket`] names the site a font request was made for. A font that
//!   arrives after the editor switched sites is dropped.
//!
//! Stale completions are discarded, never applied to newer state.

use crate::document::{MutationResult, SiteDocument};
use crate::errors::FontError;
use crate::mutations::Mutation;
use crate::EditorError;
use pagesmith_evaluator::{fonts_to_load, CompositionRenderer, FontRequest, RenderConfig, RenderNode, RenderTree};
use pagesmith_model::TypographyScale;
use pagesmith_registry::ComponentRegistry;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Identifies the render a component load belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderTicket {
    pub page_id: String,
    pub version: u64,
}

/// Identifies the site a font request belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontTicket {
    pub site_id: String,
}

/// Font service collaborator. `ensure` must be idempotent.
#[allow(async_fn_in_trait)]
pub trait FontLoader {
    async fn ensure(&self, request: &FontRequest) -> Result<(), FontError>;
}

/// Result of applying a mutation through the pipeline
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub version: u64,
    /// Ticket of the render taken after the mutation, if a page is selected
    pub ticket: Option<RenderTicket>,
    /// Components still loading in that render
    pub pending: Vec<String>,
}

/// Manages the edit → render pipeline
pub struct Pipeline {
    document: SiteDocument,
    registry: Arc<ComponentRegistry>,
    config: RenderConfig,
    last_render: Option<(RenderTicket, RenderTree)>,
}

impl Pipeline {
    /// Create a pipeline and render the initially selected page
    pub fn new(document: SiteDocument, registry: Arc<ComponentRegistry>, config: RenderConfig) -> Self {
        let mut pipeline = Self {
            document,
            registry,
            config,
            last_render: None,
        };
        pipeline.render();
        pipeline
    }

    pub fn document(&self) -> &SiteDocument {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut SiteDocument {
        &mut self.document
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Switch to another site document
    pub fn replace_document(&mut self, document: SiteDocument) {
        info!(site = %document.site().id, "switching site document");
        self.document = document;
        self.render();
    }

    pub fn tree(&self) -> Option<&RenderTree> {
        self.last_render.as_ref().map(|(_, tree)| tree)
    }

    /// Ticket for the selected page at the current version
    pub fn current_ticket(&self) -> Option<RenderTicket> {
        let state = self.document.state();
        state.selected_page().map(|page| RenderTicket {
            page_id: page.id.clone(),
            version: state.version,
        })
    }

    pub fn font_ticket(&self) -> FontTicket {
        FontTicket {
            site_id: self.document.site().id.clone(),
        }
    }

    /// Render the selected page from scratch
    #[instrument(skip(self))]
    pub fn render(&mut self) -> Option<&RenderTree> {
        let state = self.document.state();
        self.last_render = state.selected_page().map(|page| {
            let tree = CompositionRenderer::new(&self.registry, &self.config).render(&state.site, page);
            let ticket = RenderTicket {
                page_id: page.id.clone(),
                version: state.version,
            };
            (ticket, tree)
        });
        self.tree()
    }

    /// Apply a mutation and re-render when the page or site changed
    pub fn apply_mutation(&mut self, mutation: &Mutation) -> Result<PipelineResult, EditorError> {
        let MutationResult { version, .. } = self.document.apply(mutation)?;

        let current = self.current_ticket();
        let rendered = self.last_render.as_ref().map(|(ticket, _)| ticket);
        if current.as_ref() != rendered {
            self.render();
        }

        Ok(PipelineResult {
            version,
            ticket: current,
            pending: self.pending_loads().map(|(_, names)| names).unwrap_or_default(),
        })
    }

    /// Components the last render is waiting on
    pub fn pending_loads(&self) -> Option<(RenderTicket, Vec<String>)> {
        let (ticket, tree) = self.last_render.as_ref()?;
        if tree.pending.is_empty() {
            return None;
        }
        Some((ticket.clone(), tree.pending.iter().cloned().collect()))
    }

    /// Re-render loading nodes once their loads settle. Returns false when
    /// `ticket` no longer matches the current page and version.
    pub fn complete_load(&mut self, ticket: &RenderTicket) -> bool {
        let current = self.current_ticket();
        let Some((rendered, tree)) = &self.last_render else {
            debug!(?ticket, "discarding load completion: nothing rendered");
            return false;
        };
        if current.as_ref() != Some(ticket) || rendered != ticket {
            debug!(?ticket, ?current, "discarding stale load completion");
            return false;
        }

        let state = self.document.state();
        let Some(page) = state.selected_page() else {
            return false;
        };
        let tree = CompositionRenderer::new(&self.registry, &self.config)
            .rerender_loaded(&state.site, page, tree);
        self.last_render = Some((ticket.clone(), tree));
        true
    }

    /// Await pending loads and re-render until nothing is pending. Slot
    /// children of a loading component only surface once it renders, so this
    /// can take several rounds. Returns false if no round completed.
    pub async fn load_pending(&mut self) -> bool {
        let mut completed = false;
        while let Some((ticket, names)) = self.pending_loads() {
            let registry = Arc::clone(&self.registry);
            let loads = names.iter().map(|name| registry.load(name));
            for (name, result) in names.iter().zip(futures::future::join_all(loads).await) {
                if let Err(err) = result {
                    warn!(component = %name, error = %err, "component failed to load");
                }
            }
            if !self.complete_load(&ticket) {
                break;
            }
            completed = true;
        }
        completed
    }

    /// Fonts used by the last render that are not loaded yet
    pub fn font_requests(&self) -> (FontTicket, Vec<FontRequest>) {
        let ticket = self.font_ticket();
        let Some(tree) = self.tree() else {
            return (ticket, Vec::new());
        };
        let loaded = &self.document.site().typography.loaded_fonts;

        let mut families: BTreeMap<String, BTreeSet<u16>> = BTreeMap::new();
        let mut collect = |scale: &TypographyScale| {
            for request in fonts_to_load(scale, loaded) {
                families.entry(request.family).or_default().extend(request.weights);
            }
        };
        collect(&tree.typography);
        for node in &tree.instructions {
            node.walk(&mut |node| {
                if let RenderNode::Render(rendered) = node {
                    collect(&rendered.typography);
                }
            });
        }

        let requests = families
            .into_iter()
            .map(|(family, weights)| FontRequest {
                family,
                weights: weights.into_iter().collect(),
            })
            .collect();
        (ticket, requests)
    }

    /// Record a loaded font. Returns false when `ticket` belongs to another site.
    pub fn complete_font(&mut self, ticket: &FontTicket, family: &str) -> Result<bool, EditorError> {
        if *ticket != self.font_ticket() {
            debug!(?ticket, family, "discarding font for a previous site");
            return Ok(false);
        }
        self.apply_mutation(&Mutation::FontLoaded {
            family: family.to_string(),
        })?;
        Ok(true)
    }

    /// Ensure every requested font through `loader`; failures are logged and skipped
    pub async fn ensure_fonts<L: FontLoader>(&mut self, loader: &L) -> Result<Vec<String>, EditorError> {
        let (ticket, requests) = self.font_requests();
        let mut loaded = Vec::new();
        for request in &requests {
            match loader.ensure(request).await {
                Ok(()) => {
                    if self.complete_font(&ticket, &request.family)? {
                        loaded.push(request.family.clone());
                    }
                }
                Err(err) => warn!(error = %err, "font unavailable"),
            }
        }
        Ok(loaded)
    }
}
