//! # Pagesmith Model
//!
//! Typed document model for a site built from reusable components.
//!
//! ```text
//! Site
//!  ├── typography { global: TypographyScale, loaded_fonts }
//!  ├── design_tokens { colors }
//!  ├── global_components { header?, footer? }
//!  └── pages[]
//!       └── components[]            (tree roots)
//!            └── custom_attrs { name: { type, value } }
//!                 └── type = "component" → nested Component (slot)
//! ```
//!
//! Every node reachable from a `Site` lives behind an `Arc`, so an edit that
//! copies one spine of the tree leaves every other subtree shared with the
//! previous version.

pub mod attribute;
pub mod component;
pub mod error;
pub mod schema;
pub mod site;
pub mod typography;

pub use attribute::{AttrKind, AttributeValue};
pub use component::{AtomicHierarchy, Component};
pub use error::ModelError;
pub use schema::{AttrSchema, ComponentManifest, ComponentSchema};
pub use site::{DesignTokens, GlobalComponents, Page, Site, SiteTypography};
pub use typography::{Tag, TokenOverride, TypographyOverride, TypographyScale, TypographyToken};
