/// Tree renderer tests: interpretation order, sibling ordering, visibility
/// short-circuiting and section rendering
use crate::context::DataContext;
use crate::diagnostics::{codes, CollectingSink, DiagnosticLevel};
use crate::error::RenderResult;
use crate::presenter::{PresentationUnit, Presenter};
use crate::registry::Registry;
use crate::renderer::{Renderer, Scope, SectionInputs};
use crate::vdom::RenderNode;
use serde_json::json;
use std::cell::Cell;
use std::rc::Rc;
use survey_dash_schema::{ComponentDescriptor, SchemaDocument, SchemaError};

thread_local! {
    static PROBE_CALLS: Cell<usize> = Cell::new(0);
}

fn probe(_: &ComponentDescriptor, _: &Scope<'_>) -> RenderResult<Option<RenderNode>> {
    PROBE_CALLS.with(|c| c.set(c.get() + 1));
    Ok(Some(RenderNode::text("probe")))
}

fn probe_calls() -> usize {
    PROBE_CALLS.with(|c| c.get())
}

fn renderer() -> (Renderer, Rc<CollectingSink>) {
    let sink = Rc::new(CollectingSink::new());
    let mut registry = Registry::new();
    registry.register("probe", probe);
    let renderer = Renderer::new().with_registry(registry).with_diagnostics(sink.clone());
    (renderer, sink)
}

fn card_titles(nodes: &[RenderNode]) -> Vec<String> {
    nodes
        .iter()
        .map(|n| n.prop("title").and_then(|t| t.as_str()).unwrap_or("").to_string())
        .collect()
}

#[test]
fn test_wrapper_renders_element_with_children() {
    let (renderer, sink) = renderer();
    let node = ComponentDescriptor {
        class_name: Some("grid two-col".into()),
        ..ComponentDescriptor::wrapper("div")
    }
    .with_child(ComponentDescriptor::typed("card").with_title("A"))
    .with_child(ComponentDescriptor::typed("card").with_title("B"));

    let out = renderer.render(&node, &DataContext::new(json!({}))).unwrap();
    match &out {
        RenderNode::Element { tag, classes, children, .. } => {
            assert_eq!(tag, "div");
            assert_eq!(classes, &vec!["grid".to_string(), "two-col".to_string()]);
            assert_eq!(card_titles(children), vec!["A", "B"]);
        }
        other => panic!("Expected element, got {:?}", other),
    }
    assert!(sink.is_empty());
}

#[test]
fn test_wrapper_with_content_splits_paragraphs() {
    let (renderer, _) = renderer();
    let node = ComponentDescriptor::wrapper("p").with_content("First {{name}}\n\nSecond");
    let out = renderer
        .render(&node, &DataContext::new(json!({ "name": "wave" })))
        .unwrap();
    assert_eq!(
        out.children(),
        &[RenderNode::text("First wave"), RenderNode::Spacer, RenderNode::text("Second")]
    );
}

#[test]
fn test_empty_wrapper_renders_empty_element() {
    let (renderer, sink) = renderer();
    let out = renderer
        .render(&ComponentDescriptor::wrapper("hr"), &DataContext::new(json!({})))
        .unwrap();
    assert_eq!(out, RenderNode::element("hr"));
    assert!(sink.is_empty());
}

#[test]
fn test_wrapper_wins_over_type() {
    let (renderer, _) = renderer();
    let node = ComponentDescriptor {
        kind: Some("probe".into()),
        ..ComponentDescriptor::wrapper("section")
    };
    let before = probe_calls();
    let out = renderer.render(&node, &DataContext::new(json!({}))).unwrap();
    assert_eq!(out.name(), Some("section"));
    assert_eq!(probe_calls(), before);
}

#[test]
fn test_untyped_node_with_children_is_a_fragment() {
    let (renderer, _) = renderer();
    let node = ComponentDescriptor::default()
        .with_child(ComponentDescriptor::typed("card").with_title("inner"));
    let out = renderer.render(&node, &DataContext::new(json!({}))).unwrap();
    match out {
        RenderNode::Fragment { children } => assert_eq!(card_titles(&children), vec!["inner"]),
        other => panic!("Expected fragment, got {:?}", other),
    }
}

#[test]
fn test_empty_node_is_reported_unrenderable() {
    let (renderer, sink) = renderer();
    let out = renderer.render(&ComponentDescriptor::default(), &DataContext::new(json!({})));
    assert!(out.is_none());
    let entries = sink.with_code(codes::UNRENDERABLE);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].level, DiagnosticLevel::Warning);
}

#[test]
fn test_unknown_type_renders_nothing_and_siblings_continue() {
    let (renderer, sink) = renderer();
    let nodes = vec![
        ComponentDescriptor::typed("card").with_title("before"),
        ComponentDescriptor::typed("sparkline").with_data_path("trend"),
        ComponentDescriptor::typed("card").with_title("after"),
    ];
    let out = renderer.render_all(&nodes, &DataContext::new(json!({})));
    assert_eq!(card_titles(&out), vec!["before", "after"]);

    let entries = sink.with_code(codes::UNKNOWN_TYPE);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].component_type.as_deref(), Some("sparkline"));
    assert_eq!(entries[0].data_path.as_deref(), Some("trend"));
}

#[test]
fn test_children_render_in_index_order() {
    let (renderer, _) = renderer();
    let node = ComponentDescriptor::wrapper("div")
        .with_child(ComponentDescriptor::typed("card").with_title("late"))
        .with_child(ComponentDescriptor::typed("card").with_title("three").with_index(3))
        .with_child(ComponentDescriptor::typed("card").with_title("one").with_index(1))
        .with_child(ComponentDescriptor::typed("card").with_title("later"));
    let out = renderer.render(&node, &DataContext::new(json!({}))).unwrap();
    assert_eq!(card_titles(out.children()), vec!["one", "three", "late", "later"]);
}

#[test]
fn test_order_is_independent_of_source_order() {
    let (renderer, _) = renderer();
    let a = ComponentDescriptor::typed("card").with_title("a").with_index(0);
    let b = ComponentDescriptor::typed("card").with_title("b").with_index(1);
    let c = ComponentDescriptor::typed("card").with_title("c").with_index(2);
    let ctx = DataContext::new(json!({}));

    let forward = renderer.render_all(&[a.clone(), b.clone(), c.clone()], &ctx);
    let backward = renderer.render_all(&[c, a, b], &ctx);
    assert_eq!(forward, backward);
    assert_eq!(card_titles(&forward), vec!["a", "b", "c"]);
}

#[test]
fn test_hidden_node_subtree_is_never_evaluated() {
    let (renderer, _) = renderer();
    let hidden = ComponentDescriptor::wrapper("div")
        .with_data_path("selectedItem.effort")
        .with_child(ComponentDescriptor::typed("probe"))
        .with_child(ComponentDescriptor::wrapper("div").with_child(ComponentDescriptor::typed("probe")));
    let ctx = DataContext::new(json!({ "selectedItem": { "csat": 4 } }));

    let before = probe_calls();
    assert!(renderer.render(&hidden, &ctx).is_none());
    assert_eq!(probe_calls(), before);
}

#[test]
fn test_hidden_typed_parent_skips_children() {
    let (renderer, sink) = renderer();
    let chart = ComponentDescriptor::typed("barChart")
        .with_data_path("currentItem.chartData")
        .with_child(ComponentDescriptor::typed("probe"));
    let ctx = DataContext::new(json!({ "currentItem": { "label": "Q1" } }));

    let before = probe_calls();
    let lookups_before = ctx.lookup_count();
    assert!(renderer.render(&chart, &ctx).is_none());
    assert_eq!(probe_calls(), before);
    // selected key, item key: nothing below the hidden node is resolved
    assert_eq!(ctx.lookup_count() - lookups_before, 2);
    assert!(sink.is_empty());
}

#[test]
fn test_registry_extension_without_touching_renderer() {
    fn gauge(d: &ComponentDescriptor, scope: &Scope<'_>) -> RenderResult<Option<RenderNode>> {
        let value = scope.data(d)?;
        let unit = PresentationUnit::for_descriptor("gauge", d).prop("value", value.into_owned());
        scope.present(unit).map(Some)
    }

    let mut renderer = Renderer::new();
    renderer.registry_mut().register("gauge", gauge);
    let out = renderer
        .render(
            &ComponentDescriptor::typed("gauge").with_data_path("score"),
            &DataContext::new(json!({ "score": 7 })),
        )
        .unwrap();
    assert_eq!(out.name(), Some("gauge"));
    assert_eq!(out.prop("value"), Some(&json!(7)));
}

#[test]
fn test_custom_presenter_receives_resolved_units() {
    struct Flattening;
    impl Presenter for Flattening {
        fn present(&self, unit: PresentationUnit) -> RenderResult<RenderNode> {
            let title = unit.props.get("title").and_then(|t| t.as_str()).unwrap_or("");
            Ok(RenderNode::text(format!("{}:{}", unit.component, title)))
        }
    }

    let renderer = Renderer::new().with_presenter(Flattening);
    let out = renderer
        .render(
            &ComponentDescriptor::typed("card").with_title("Hello {{who}}"),
            &DataContext::new(json!({ "who": "team" })),
        )
        .unwrap();
    assert_eq!(out, RenderNode::text("card:Hello team"));
}

fn dashboard() -> SchemaDocument {
    SchemaDocument::from_value(json!({
        "sections": [
            {
                "id": "overview",
                "title": "Overview for {{survey.name}}",
                "components": [
                    { "type": "card", "title": "Responses", "dataPath": "survey.responses", "index": 1 },
                    { "type": "title", "title": "{{currentSection}}", "index": 0 }
                ],
                "subsections": [
                    {
                        "id": "drivers",
                        "title": "Drivers",
                        "components": [{ "type": "card", "title": "Speed" }]
                    },
                    {
                        "id": "empty",
                        "title": "Nothing here",
                        "components": [
                            { "type": "barChart", "dataPath": "currentItem.chartData" }
                        ]
                    }
                ]
            },
            { "id": "attributes", "components": [] }
        ]
    }))
    .unwrap()
}

#[test]
fn test_render_section() {
    let (renderer, _) = renderer();
    let out = renderer
        .render_section(
            &dashboard(),
            Some("overview"),
            json!({ "survey": { "name": "Q3 pulse", "responses": 412 } }),
            SectionInputs {
                item: Some(json!({ "label": "Onboarding" })),
                ..Default::default()
            },
        )
        .unwrap();

    assert_eq!(out.section, "overview");
    assert_eq!(out.title.as_deref(), Some("Overview for Q3 pulse"));
    assert_eq!(out.nodes.len(), 3);
    assert_eq!(out.nodes[0].prop("text"), Some(&json!("overview")));
    assert_eq!(out.nodes[1].prop("value"), Some(&json!(412)));

    // The chart subsection hides its only child and is omitted entirely
    match &out.nodes[2] {
        RenderNode::Element { tag, id, children, .. } => {
            assert_eq!(tag, "section");
            assert_eq!(id.as_deref(), Some("drivers"));
            assert_eq!(children[0].text_content(), vec!["Drivers"]);
            assert_eq!(card_titles(&children[1..]), vec!["Speed"]);
        }
        other => panic!("Expected subsection element, got {:?}", other),
    }
    assert!(out.shared.is_none());
    assert!(out.diagnostics.is_empty());
}

#[test]
fn test_render_section_defaults_to_first() {
    let (renderer, _) = renderer();
    let out = renderer
        .render_section(&dashboard(), None, json!({}), SectionInputs::default())
        .unwrap();
    assert_eq!(out.section, "overview");
    assert_eq!(out.title.as_deref(), Some("Overview for {{survey.name}}"));
}

#[test]
fn test_render_unknown_section() {
    let (renderer, _) = renderer();
    let err = renderer
        .render_section(&dashboard(), Some("trends"), json!({}), SectionInputs::default())
        .unwrap_err();
    match err {
        SchemaError::SectionNotFound { id, available } => {
            assert_eq!(id, "trends");
            assert_eq!(available, vec!["overview", "attributes"]);
        }
        other => panic!("Expected SectionNotFound, got {:?}", other),
    }
}

#[test]
fn test_render_section_collects_pass_diagnostics() {
    let (renderer, sink) = renderer();
    let doc = SchemaDocument::from_value(json!([
        { "type": "mystery" },
        { "type": "barChart", "dataPath": "charts.missing" }
    ]))
    .unwrap();

    let first = renderer
        .render_section(&doc, None, json!({}), SectionInputs::default())
        .unwrap();
    assert_eq!(first.diagnostics.len(), 2);

    let second = renderer
        .render_section(&doc, None, json!({}), SectionInputs::default())
        .unwrap();
    assert_eq!(second.diagnostics.len(), 2, "diagnostics are per pass");
    assert_eq!(sink.len(), 4);
}
