/// Fault isolation at the dispatch boundary
///
/// A failing handler, whether it returns an error or panics, costs exactly
/// its own node. Parents and siblings render as if it were absent.
use crate::context::DataContext;
use crate::diagnostics::{codes, CollectingSink, DiagnosticLevel};
use crate::error::{RenderError, RenderResult};
use crate::registry::Registry;
use crate::renderer::{Renderer, Scope};
use crate::vdom::RenderNode;
use serde_json::json;
use std::rc::Rc;
use survey_dash_schema::ComponentDescriptor;

fn exploding(_: &ComponentDescriptor, _: &Scope<'_>) -> RenderResult<Option<RenderNode>> {
    panic!("config.thresholds is not iterable")
}

fn exploding_owned(d: &ComponentDescriptor, _: &Scope<'_>) -> RenderResult<Option<RenderNode>> {
    panic!("bad shape under {}", d.data_path.clone().unwrap_or_default())
}

fn refusing(_: &ComponentDescriptor, _: &Scope<'_>) -> RenderResult<Option<RenderNode>> {
    Err(RenderError::config("thresholds", "expected an array"))
}

fn renderer() -> (Renderer, Rc<CollectingSink>) {
    let sink = Rc::new(CollectingSink::new());
    let mut registry = Registry::new();
    registry.register("exploding", exploding);
    registry.register("explodingOwned", exploding_owned);
    registry.register("refusing", refusing);
    (Renderer::new().with_registry(registry).with_diagnostics(sink.clone()), sink)
}

fn siblings(middle: &str) -> ComponentDescriptor {
    ComponentDescriptor::wrapper("div")
        .with_child(ComponentDescriptor::typed("card").with_title("left").with_index(0))
        .with_child(ComponentDescriptor::typed(middle).with_data_path("gauges.nps").with_index(1))
        .with_child(ComponentDescriptor::typed("card").with_title("right").with_index(2))
}

fn titles(node: &RenderNode) -> Vec<String> {
    node.children()
        .iter()
        .filter_map(|c| c.prop("title").and_then(|t| t.as_str()).map(String::from))
        .collect()
}

#[test]
fn test_panicking_handler_is_isolated() {
    let (renderer, sink) = renderer();
    let out = renderer.render(&siblings("exploding"), &DataContext::new(json!({}))).unwrap();

    assert_eq!(out.children().len(), 2);
    assert_eq!(titles(&out), vec!["left", "right"]);

    let entries = sink.with_code(codes::HANDLER_FAILED);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].level, DiagnosticLevel::Error);
    assert_eq!(entries[0].component_type.as_deref(), Some("exploding"));
    assert_eq!(entries[0].data_path.as_deref(), Some("gauges.nps"));
    assert!(entries[0].message.contains("not iterable"));
}

#[test]
fn test_panic_with_formatted_message() {
    let (renderer, sink) = renderer();
    renderer.render(&siblings("explodingOwned"), &DataContext::new(json!({})));
    assert!(sink.entries()[0].message.contains("bad shape under gauges.nps"));
}

#[test]
fn test_handler_error_is_isolated() {
    let (renderer, sink) = renderer();
    let out = renderer.render(&siblings("refusing"), &DataContext::new(json!({}))).unwrap();
    assert_eq!(titles(&out), vec!["left", "right"]);

    assert_eq!(sink.len(), 1);
    let entry = &sink.entries()[0];
    assert_eq!(entry.code, codes::INVALID_CONFIG);
    assert!(entry.message.contains("thresholds"));
}

#[test]
fn test_failing_root_renders_nothing() {
    let (renderer, sink) = renderer();
    let out = renderer.render(&ComponentDescriptor::typed("exploding"), &DataContext::new(json!({})));
    assert!(out.is_none());
    assert_eq!(sink.len(), 1);
}

#[test]
fn test_renderer_usable_after_panic() {
    let (renderer, sink) = renderer();
    let ctx = DataContext::new(json!({ "score": 9 }));
    renderer.render(&ComponentDescriptor::typed("exploding"), &ctx);

    let out = renderer
        .render(&ComponentDescriptor::typed("card").with_title("{{score}}"), &ctx)
        .unwrap();
    assert_eq!(out.prop("title"), Some(&json!("9")));
    assert_eq!(sink.len(), 1);
}

#[test]
fn test_nested_failures_each_reported() {
    let (renderer, sink) = renderer();
    let tree = ComponentDescriptor::typed("card")
        .with_title("outer")
        .with_child(ComponentDescriptor::typed("refusing"))
        .with_child(ComponentDescriptor::wrapper("div").with_child(ComponentDescriptor::typed("exploding")))
        .with_child(ComponentDescriptor::typed("nope"));

    let out = renderer.render(&tree, &DataContext::new(json!({}))).unwrap();
    assert_eq!(out.prop("title"), Some(&json!("outer")));
    // refusing and nope vanish; the wrapper stays with no children
    assert_eq!(out.children().len(), 1);
    assert!(out.children()[0].children().is_empty());

    let codes_seen: Vec<_> = sink.entries().into_iter().map(|d| d.code).collect();
    assert_eq!(
        codes_seen,
        vec![codes::INVALID_CONFIG, codes::HANDLER_FAILED, codes::UNKNOWN_TYPE]
    );
}
