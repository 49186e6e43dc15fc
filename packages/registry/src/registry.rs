//! # Component Registry
//!
//! Maps a component name to its schema and a renderer loader.
//!
//! ## Loading
//!
//! Loaders are async and run **at most once** per name. The first `load()`
//! drives the loader; concurrent callers wait on the same cell, and later
//! callers read the memoized outcome. A failed load stays failed.
//!
//! `lookup()` never waits: until the loader has resolved it reports
//! [`Lookup::Loading`], so rendering can emit a placeholder and move on.
//!
//! ```text
//! register ──► Loading ──load()──► Ready(renderer)
//!                          └─────► Failed(LoadError)
//! ```

use crate::error::{LoadError, RegistryError};
use crate::renderer::Renderer;
use futures::future::{BoxFuture, FutureExt};
use pagesmith_model::{AtomicHierarchy, Component, ComponentManifest, ComponentSchema};
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};

pub type LoadResult = Result<Arc<dyn Renderer>, LoadError>;

type Loader = Box<dyn Fn() -> BoxFuture<'static, LoadResult> + Send + Sync>;

/// One registered component
pub struct Entry {
    pub schema: ComponentSchema,
    /// Preview fixture for library browsing
    pub sample: Option<Component>,
    loader: Loader,
    renderer: OnceCell<LoadResult>,
}

impl Entry {
    pub fn name(&self) -> &str {
        &self.schema.name
    }

    pub fn is_loaded(&self) -> bool {
        self.renderer.initialized()
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("name", &self.schema.name)
            .field("loaded", &self.renderer.initialized())
            .finish()
    }
}

/// Result of a non-blocking lookup
pub enum Lookup<'a> {
    NotFound,
    Loading(&'a Entry),
    Ready(&'a Entry, Arc<dyn Renderer>),
    Failed(&'a Entry, LoadError),
}

impl Lookup<'_> {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Lookup::NotFound)
    }
}

impl fmt::Debug for Lookup<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::NotFound => f.write_str("NotFound"),
            Lookup::Loading(entry) => write!(f, "Loading({})", entry.name()),
            Lookup::Ready(entry, _) => write!(f, "Ready({})", entry.name()),
            Lookup::Failed(entry, err) => write!(f, "Failed({}, {})", entry.name(), err),
        }
    }
}

/// Library listing filter
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub hierarchy: Option<AtomicHierarchy>,
    /// Case-insensitive substring of the name
    pub query: Option<String>,
}

impl ListFilter {
    pub fn matches(&self, schema: &ComponentSchema) -> bool {
        if self
            .hierarchy
            .is_some_and(|level| level != schema.atomic_hierarchy)
        {
            return false;
        }
        match self.query.as_deref().map(str::trim) {
            Some(query) if !query.is_empty() => schema
                .name
                .to_lowercase()
                .contains(&query.to_lowercase()),
            _ => true,
        }
    }
}

#[derive(Default)]
pub struct ComponentRegistry {
    entries: BTreeMap<String, Entry>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component with an async renderer loader
    pub fn register<F, Fut>(&mut self, schema: ComponentSchema, loader: F) -> Result<(), RegistryError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = LoadResult> + Send + 'static,
    {
        self.insert(schema, None, Box::new(move || loader().boxed()), OnceCell::new())
    }

    /// Register a manifest, keeping its sample for previews
    pub fn register_manifest<F, Fut>(
        &mut self,
        manifest: ComponentManifest,
        loader: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = LoadResult> + Send + 'static,
    {
        self.insert(
            manifest.manifest,
            manifest.sample,
            Box::new(move || loader().boxed()),
            OnceCell::new(),
        )
    }

    /// Register a component whose renderer is already available
    pub fn register_ready(
        &mut self,
        schema: ComponentSchema,
        renderer: Arc<dyn Renderer>,
    ) -> Result<(), RegistryError> {
        let shared = renderer.clone();
        let loader: Loader = Box::new(move || {
            let renderer = shared.clone();
            async move { Ok::<_, LoadError>(renderer) }.boxed()
        });
        self.insert(schema, None, loader, OnceCell::new_with(Some(Ok(renderer))))
    }

    fn insert(
        &mut self,
        schema: ComponentSchema,
        sample: Option<Component>,
        loader: Loader,
        renderer: OnceCell<LoadResult>,
    ) -> Result<(), RegistryError> {
        if self.entries.contains_key(&schema.name) {
            return Err(RegistryError::Duplicate { name: schema.name });
        }
        debug!(name = %schema.name, hierarchy = %schema.atomic_hierarchy, "registering component");
        self.entries.insert(
            schema.name.clone(),
            Entry {
                schema,
                sample,
                loader,
                renderer,
            },
        );
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Lookup<'_> {
        let Some(entry) = self.entries.get(name) else {
            return Lookup::NotFound;
        };
        match entry.renderer.get() {
            None => Lookup::Loading(entry),
            Some(Ok(renderer)) => Lookup::Ready(entry, renderer.clone()),
            Some(Err(err)) => Lookup::Failed(entry, err.clone()),
        }
    }

    pub fn schema(&self, name: &str) -> Option<&ComponentSchema> {
        self.entries.get(name).map(|entry| &entry.schema)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve the renderer for `name`, running its loader on first use
    #[instrument(skip(self))]
    pub async fn load(&self, name: &str) -> Result<Arc<dyn Renderer>, RegistryError> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| RegistryError::NotFound {
                name: name.to_string(),
            })?;

        let outcome = entry
            .renderer
            .get_or_init(|| async {
                debug!("running renderer loader");
                let outcome = (entry.loader)().await;
                match &outcome {
                    Ok(_) => info!("renderer loaded"),
                    Err(err) => warn!(error = %err, "renderer loader failed"),
                }
                outcome
            })
            .await;

        outcome.clone().map_err(RegistryError::from)
    }

    /// Entries sorted by hierarchy, then name
    pub fn list(&self, filter: &ListFilter) -> Vec<&Entry> {
        let mut entries: Vec<&Entry> = self
            .entries
            .values()
            .filter(|entry| filter.matches(&entry.schema))
            .collect();
        entries.sort_by(|a, b| {
            a.schema
                .atomic_hierarchy
                .cmp(&b.schema.atomic_hierarchy)
                .then_with(|| a.schema.name.cmp(&b.schema.name))
        });
        entries
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.values()).finish()
    }
}
