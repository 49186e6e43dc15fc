use pagesmith_model::{AtomicHierarchy, ComponentManifest};
use pagesmith_registry::{
    ComponentRegistry, GenericRenderer, ListFilter, LoadError, Lookup, RegistryError, Renderer,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

const FOOTER_MANIFEST: &str = r#"{
    "manifest": {
        "name": "footer-1",
        "nameComponent": "Footer1",
        "atomicHierarchy": "organism",
        "custom_attrs": {
            "logo": { "type": "img", "value": "" },
            "cta_button_background": { "type": "color", "value": "" }
        }
    },
    "sample": {
        "name": "footer-1",
        "atomicHierarchy": "organism",
        "custom_attrs": {
            "cta_button_background": { "type": "color", "value": "var:primary" }
        }
    }
}"#;

#[tokio::test]
async fn test_manifest_registration_keeps_sample_and_loads_lazily() {
    let manifest = ComponentManifest::from_json(FOOTER_MANIFEST).unwrap();

    let mut registry = ComponentRegistry::new();
    registry
        .register_manifest(manifest, || async {
            Ok(Arc::new(GenericRenderer) as Arc<dyn Renderer>)
        })
        .unwrap();

    let entries = registry.list(&ListFilter {
        hierarchy: Some(AtomicHierarchy::Organism),
        query: None,
    });
    assert_eq!(entries.len(), 1);
    assert!(entries[0].sample.is_some());
    assert!(!entries[0].is_loaded());

    assert!(matches!(registry.lookup("footer-1"), Lookup::Loading(_)));
    registry.load("footer-1").await.unwrap();
    assert!(matches!(registry.lookup("footer-1"), Lookup::Ready(..)));
}

#[tokio::test]
async fn test_registry_shared_across_tasks() {
    let mut registry = ComponentRegistry::new();
    registry
        .register(
            pagesmith_model::ComponentSchema::new("slow-1", AtomicHierarchy::Molecule),
            || async {
                tokio::task::yield_now().await;
                Err(LoadError::new("slow-1", "timed out"))
            },
        )
        .unwrap();
    let registry = Arc::new(registry);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let registry = registry.clone();
            tokio::spawn(async move { registry.load("slow-1").await.err() })
        })
        .collect();

    for handle in handles {
        let err = handle.await.unwrap();
        assert!(matches!(err, Some(RegistryError::Load(_))));
    }
}
