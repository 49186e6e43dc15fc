//! # Pagesmith Evaluator
//!
//! Turns a site document into render instructions.
//!
//! ```text
//! Site + Page ──► CompositionRenderer ──► RenderTree ──► html::render_page
//!                   │  per node:
//!                   ├─ registry lookup   (placeholder when missing/loading/failed)
//!                   ├─ resolve::resolve  (color tokens, schema defaults)
//!                   ├─ cascade::merge    (global ⊕ page ⊕ component)
//!                   └─ declared slots    (guard stack, depth limit)
//! ```
//!
//! ## Determinism
//!
//! For a given site, page, registry state and config, rendering produces the
//! same tree every time. Attribute maps are ordered, and nothing reads the
//! clock or the environment.

pub mod cascade;
pub mod config;
pub mod errors;
pub mod html;
pub mod renderer;
pub mod resolve;

pub use cascade::{fonts_to_load, merge, to_css, FontRequest};
pub use config::RenderConfig;
pub use errors::{PlaceholderKind, ValidationError};
pub use renderer::{CompositionRenderer, Placeholder, RenderNode, RenderTree, RenderedComponent};
pub use resolve::{apply_schema_defaults, resolve, resolve_with_diagnostics};
