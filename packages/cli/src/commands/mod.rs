pub mod fonts;
pub mod library;
pub mod render;
pub mod validate;

pub use fonts::{fonts, FontsArgs};
pub use library::{library, LibraryArgs};
pub use render::{render, RenderArgs};
pub use validate::{validate, ValidateArgs};

use anyhow::{anyhow, Context, Result};
use pagesmith_model::ComponentManifest;
use pagesmith_registry::{ComponentRegistry, GenericRenderer, Renderer};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Register every manifest under `dir`. Each component renders through the
/// generic renderer, loaded on first use.
pub fn load_library(dir: &Path) -> Result<ComponentRegistry> {
    let mut registry = ComponentRegistry::new();
    if !dir.exists() {
        warn!(dir = %dir.display(), "component library directory does not exist");
        return Ok(registry);
    }

    for file in find_manifest_files(dir)? {
        let source = fs::read_to_string(&file)?;
        let manifest = ComponentManifest::from_json(&source)
            .with_context(|| format!("invalid manifest {}", file.display()))?;
        debug!(file = %file.display(), name = %manifest.manifest.name, "found manifest");
        registry
            .register_manifest(manifest, || async {
                Ok(Arc::new(GenericRenderer) as Arc<dyn Renderer>)
            })
            .map_err(|err| anyhow!("{}: {}", file.display(), err))?;
    }

    Ok(registry)
}

fn find_manifest_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();

        if path.is_file() && path.extension().map(|e| e == "json").unwrap_or(false) {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_library_registers_manifests() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("atoms")).unwrap();
        fs::write(
            dir.path().join("atoms/button.json"),
            r#"{ "name": "button-1", "atomic_hierarchy": "atom",
                 "custom_attrs": { "label": { "type": "string", "defaultValue": "Click" } } }"#,
        )
        .unwrap();
        fs::write(dir.path().join("README.md"), "not a manifest").unwrap();

        let registry = load_library(dir.path()).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("button-1"));
    }

    #[test]
    fn test_duplicate_manifest_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = r#"{ "name": "hero-1", "atomic_hierarchy": "template" }"#;
        fs::write(dir.path().join("a.json"), manifest).unwrap();
        fs::write(dir.path().join("b.json"), manifest).unwrap();

        assert!(load_library(dir.path()).is_err());
    }

    #[test]
    fn test_missing_library_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let registry = load_library(&dir.path().join("nope")).unwrap();
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_bundled_library_renders_demo_site() {
        use pagesmith_editor::{Pipeline, SiteDocument};
        use pagesmith_evaluator::{html::render_page, PlaceholderKind, RenderConfig};

        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
        let registry = Arc::new(load_library(&root.join("library")).unwrap());
        assert_eq!(registry.len(), 4);

        let document = SiteDocument::load(root.join("demos/site.json")).unwrap();
        let config = RenderConfig::default();
        let mut pipeline = Pipeline::new(document, registry, config.clone());
        assert!(pipeline.load_pending().await);

        let tree = pipeline.tree().unwrap();
        let kinds: Vec<_> = tree.placeholders().iter().map(|p| p.kind.clone()).collect();
        assert_eq!(kinds, vec![PlaceholderKind::NotFound]);

        let html = render_page(tree, &config);
        assert!(html.contains("Launch faster"));
        assert!(html.contains("Start free"));
        assert!(html.contains("font-family: 'Poppins', sans-serif; font-weight: 800"));
        // the nested button's own p size
        assert!(html.contains(".preview-engine .preview-engine-t0 p {"));
        assert!(html.contains("font-size: 18px"));
    }
}
