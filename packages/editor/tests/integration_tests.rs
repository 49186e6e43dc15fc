//! Integration tests for editor crate

use pagesmith_editor::path::{self, Patch};
use pagesmith_editor::{ComponentPath, Mutation, Pipeline, SiteDocument, VersionedPath};
use pagesmith_evaluator::{html::render_page, RenderConfig};
use pagesmith_model::{AtomicHierarchy, AttributeValue, Component, ComponentSchema, Page, Site};
use pagesmith_registry::{ComponentRegistry, GenericRenderer};
use std::collections::BTreeMap;
use std::sync::Arc;

fn registry() -> Arc<ComponentRegistry> {
    let mut registry = ComponentRegistry::new();
    for name in ["A", "B", "hero-1"] {
        registry
            .register_ready(
                ComponentSchema::new(name, AtomicHierarchy::Organism)
                    .with_slot("hero_left_section_component"),
                Arc::new(GenericRenderer),
            )
            .unwrap();
    }
    Arc::new(registry)
}

#[test]
fn test_delete_drops_stale_selection() {
    let site = Site::new("site").with_page(
        Page::new("home", "/")
            .with_component(Component::new("A", AtomicHierarchy::Organism))
            .with_component(Component::new("B", AtomicHierarchy::Organism)),
    );
    let mut doc = SiteDocument::from_site(site);

    doc.apply(&Mutation::SelectComponent {
        path: ComponentPath::from(["components", "1"]),
    })
    .unwrap();
    let prior = doc.state().selection.clone().unwrap();
    let before = doc.state().clone();

    doc.apply(&Mutation::RemoveComponent {
        page_id: "home".to_string(),
        path: ComponentPath::from(["components", "0"]),
    })
    .unwrap();

    let state = doc.state();
    let page = state.selected_page().unwrap();
    let names: Vec<_> = page.components.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["B"]);

    // the prior selection does not silently rebind to another component
    assert!(prior.resolve(page.as_ref(), state.version).is_none());
    assert!(state.selection.is_none());
    assert!(state.selected_component().is_none());
    let rebased = VersionedPath::new(prior.path.clone(), state.version);
    assert!(rebased.resolve(page.as_ref(), state.version).is_none());

    // the version the selection was taken against is still intact
    assert_eq!(before.site.pages[0].components.len(), 2);
}

#[test]
fn test_pipeline_renders_edits() {
    let site = Site::new("site")
        .with_color("primary", "#0044ff")
        .with_page(
            Page::new("home", "/").with_component(
                Component::new("hero-1", AtomicHierarchy::Template)
                    .with_attr("title", AttributeValue::string("Hello")),
            ),
        );
    let config = RenderConfig::default();
    let mut pipeline = Pipeline::new(SiteDocument::from_site(site), registry(), config.clone());

    let mut attrs = BTreeMap::new();
    attrs.insert("title".to_string(), AttributeValue::string("Welcome"));
    attrs.insert("color_background".to_string(), AttributeValue::color("var:primary"));
    let result = pipeline
        .apply_mutation(&Mutation::UpdateComponentAttrs {
            page_id: Some("home".to_string()),
            path: ComponentPath::from(["components", "0"]),
            attrs,
        })
        .unwrap();
    assert_eq!(result.version, 1);
    assert!(result.pending.is_empty());

    let html = render_page(pipeline.tree().unwrap(), &config);
    assert!(html.contains("Welcome"));
    assert!(html.contains("background-color: #0044ff"));
}

#[test]
fn test_slot_edit_through_shorthand_path() {
    let hero = Component::new("hero-1", AtomicHierarchy::Template).with_slot(
        "hero_left_section_component",
        Component::new("B", AtomicHierarchy::Organism)
            .with_attr("label", AttributeValue::string("Go")),
    );
    let page = Page::new("home", "/").with_component(hero);

    let label: ComponentPath = [
        "components",
        "0",
        "hero_left_section_component",
        "custom_attrs",
        "label",
    ]
    .into();
    let next = path::update(
        &page,
        &label,
        Patch::ReplaceAttribute(AttributeValue::string("Start")),
    )
    .unwrap();

    assert_eq!(
        path::get(&next, &label).and_then(|n| n.as_attribute()),
        Some(&AttributeValue::string("Start"))
    );
    assert_eq!(
        path::get(&page, &label).and_then(|n| n.as_attribute()),
        Some(&AttributeValue::string("Go"))
    );
}

#[test]
fn test_document_save_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("site.json");

    let mut doc = SiteDocument::from_site(
        Site::new("site").with_page(Page::new("home", "/")),
    );
    doc.save_as(&file).unwrap();
    assert!(!doc.is_dirty());

    doc.apply(&Mutation::AddPage {
        page_id: "contact".to_string(),
        page_type: Some("landing".to_string()),
    })
    .unwrap();
    doc.apply(&Mutation::InsertComponent {
        page_id: "contact".to_string(),
        index: None,
        component: Component::new("A", AtomicHierarchy::Organism),
    })
    .unwrap();
    assert!(doc.is_dirty());
    doc.save().unwrap();

    let reloaded = SiteDocument::load(&file).unwrap();
    let contact = reloaded.site().page("contact").unwrap();
    assert_eq!(contact.components[0].name, "A");
    assert_eq!(contact.meta["type"], "landing");
    assert_eq!(reloaded.site(), doc.site());
}

#[test]
fn test_missing_document_is_terminal() {
    let dir = tempfile::tempdir().unwrap();
    let err = SiteDocument::load(dir.path().join("missing.json")).unwrap_err();
    assert!(err.is_terminal());
}
