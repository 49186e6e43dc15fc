//! # Pagesmith Editor
//!
//! Editing engine for site documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: Site / Page / Component documents    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: SiteDocument lifecycle + mutations  │
//! │  - Load/save site documents                 │
//! │  - Path addressing with structural sharing  │
//! │  - Pure state transitions, versioned        │
//! │  - Stale-checked async completions          │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ evaluator: Site + Page → RenderTree         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagesmith_editor::{Mutation, Pipeline, SiteDocument};
//!
//! let doc = SiteDocument::load("site.json")?;
//! let mut pipeline = Pipeline::new(doc, registry, RenderConfig::default());
//!
//! pipeline.apply_mutation(&Mutation::RemoveComponent {
//!     page_id: "home".to_string(),
//!     path: ["components", "0"].into(),
//! })?;
//! pipeline.load_pending().await;
//!
//! pipeline.document_mut().save()?;
//! ```

mod document;
mod errors;
mod mutations;
pub mod path;
mod pipeline;

pub use document::{DocumentStorage, MutationResult, SiteDocument};
pub use errors::{EditorError, FontError};
pub use mutations::{EditorState, GlobalSlot, Mutation, MutationError};
pub use path::{ComponentPath, NodeRef, Patch, PathError, PathRoot, VersionedPath};
pub use pipeline::{FontLoader, FontTicket, Pipeline, PipelineResult, RenderTicket};
