//! # Site Document
//!
//! A [`SiteDocument`] owns the current [`EditorState`] of one site and the
//! place it was loaded from.
//!
//! - **Memory-backed**: built from a JSON string, for tests and previews
//! - **File-backed**: loaded from disk, tracks unsaved changes
//!
//! ```text
//! Load → Decode → Mutate* → Encode → Save
//!   ↓       ↓        ↓         ↓       ↓
//! File    Site   EditorState  JSON    File
//! ```
//!
//! A failed load is terminal: no partially decoded site is ever exposed.

use crate::mutations::{EditorState, Mutation};
use crate::EditorError;
use pagesmith_model::Site;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

#[derive(Debug)]
pub enum DocumentStorage {
    Memory,
    File { path: PathBuf, dirty: bool },
}

/// Result of applying one mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationResult {
    pub version: u64,
    /// False for selection-only mutations
    pub site_changed: bool,
}

#[derive(Debug)]
pub struct SiteDocument {
    state: EditorState,
    storage: DocumentStorage,
}

impl SiteDocument {
    /// Memory-backed document from JSON text
    pub fn from_source(source: &str) -> Result<Self, EditorError> {
        let site = Site::from_json(source).map_err(EditorError::Load)?;
        Ok(Self::from_site(site))
    }

    pub fn from_site(site: Site) -> Self {
        Self {
            state: EditorState::new(site),
            storage: DocumentStorage::Memory,
        }
    }

    /// File-backed document
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EditorError> {
        let path = path.as_ref().to_path_buf();
        let source = std::fs::read_to_string(&path).map_err(|source| EditorError::Read {
            path: path.clone(),
            source,
        })?;
        let site = Site::from_json(&source).map_err(EditorError::Load)?;
        info!(site = %site.id, pages = site.pages.len(), "loaded site document");

        Ok(Self {
            state: EditorState::new(site),
            storage: DocumentStorage::File { path, dirty: false },
        })
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn site(&self) -> &Site {
        &self.state.site
    }

    pub fn version(&self) -> u64 {
        self.state.version
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.storage {
            DocumentStorage::File { path, .. } => Some(path),
            DocumentStorage::Memory => None,
        }
    }

    /// Apply a mutation; on error the document is unchanged
    pub fn apply(&mut self, mutation: &Mutation) -> Result<MutationResult, EditorError> {
        let next = mutation.apply(&self.state)?;
        let site_changed = next.version != self.state.version;
        debug!(version = next.version, site_changed, "applied mutation");
        self.state = next;

        if site_changed {
            if let DocumentStorage::File { dirty, .. } = &mut self.storage {
                *dirty = true;
            }
        }

        Ok(MutationResult {
            version: self.state.version,
            site_changed,
        })
    }

    pub fn is_dirty(&self) -> bool {
        match &self.storage {
            DocumentStorage::File { dirty, .. } => *dirty,
            DocumentStorage::Memory => false,
        }
    }

    pub fn to_json(&self) -> Result<String, EditorError> {
        self.state.site.to_json_pretty().map_err(EditorError::Encode)
    }

    /// Save to disk (if file-backed)
    pub fn save(&mut self) -> Result<(), EditorError> {
        let source = self.to_json()?;
        match &mut self.storage {
            DocumentStorage::File { path, dirty } => {
                std::fs::write(&*path, source)?;
                *dirty = false;
                info!(path = %path.display(), version = self.state.version, "saved site document");
                Ok(())
            }
            DocumentStorage::Memory => Err(EditorError::NotFileBacked),
        }
    }

    /// Write to `path` and become file-backed there
    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> Result<(), EditorError> {
        self.storage = DocumentStorage::File {
            path: path.into(),
            dirty: true,
        };
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::ComponentPath;

    const SOURCE: &str = r#"{
        "id": "site",
        "pages": [
            { "id": "home", "slug": "/", "components": [
                { "name": "hero-1", "atomic_hierarchy": "template" }
            ] }
        ]
    }"#;

    #[test]
    fn test_memory_document() {
        let mut doc = SiteDocument::from_source(SOURCE).unwrap();
        assert_eq!(doc.version(), 0);
        assert_eq!(doc.state().selected_page.as_deref(), Some("home"));
        assert!(!doc.is_dirty());

        let result = doc
            .apply(&Mutation::RemoveComponent {
                page_id: "home".to_string(),
                path: ComponentPath::from(["components", "0"]),
            })
            .unwrap();
        assert_eq!(result, MutationResult { version: 1, site_changed: true });
        assert!(doc.site().pages[0].components.is_empty());
        assert!(matches!(doc.save(), Err(EditorError::NotFileBacked)));
    }

    #[test]
    fn test_failed_mutation_leaves_document_unchanged() {
        let mut doc = SiteDocument::from_source(SOURCE).unwrap();
        let err = doc
            .apply(&Mutation::RemoveComponent {
                page_id: "home".to_string(),
                path: ComponentPath::from(["components", "3"]),
            })
            .unwrap_err();
        assert!(!err.is_terminal());
        assert_eq!(doc.version(), 0);
        assert_eq!(doc.site().pages[0].components.len(), 1);
    }

    #[test]
    fn test_invalid_source_is_terminal() {
        let err = SiteDocument::from_source("{\"pages\": 3}").unwrap_err();
        assert!(err.is_terminal());
    }

    #[test]
    fn test_selection_does_not_dirty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.json");
        std::fs::write(&path, SOURCE).unwrap();

        let mut doc = SiteDocument::load(&path).unwrap();
        let result = doc
            .apply(&Mutation::SelectComponent {
                path: ComponentPath::from(["components", "0"]),
            })
            .unwrap();
        assert!(!result.site_changed);
        assert!(!doc.is_dirty());
    }
}
