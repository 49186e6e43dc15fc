//! # Pagesmith Registry
//!
//! The component library as seen by the engine: schemas keyed by name, and the
//! renderers that draw them, loaded lazily and at most once.

pub mod error;
pub mod registry;
pub mod renderer;

pub use error::{LoadError, RegistryError};
pub use registry::{ComponentRegistry, Entry, ListFilter, LoadResult, Lookup};
pub use renderer::{escape_html, GenericRenderer, RenderInput, RenderValue, Renderer};
