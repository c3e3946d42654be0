/// Built-in handler behavior: data guarding, config validation and the
/// units each handler hands to the presentation layer
use crate::context::DataContext;
use crate::diagnostics::{codes, CollectingSink};
use crate::renderer::Renderer;
use crate::vdom::RenderNode;
use serde_json::{json, Value};
use std::rc::Rc;
use survey_dash_schema::ComponentDescriptor;

fn render(node: ComponentDescriptor, data: Value) -> (Option<RenderNode>, Rc<CollectingSink>) {
    let ctx = DataContext::new(data);
    render_in(node, &ctx)
}

fn render_in(node: ComponentDescriptor, ctx: &DataContext) -> (Option<RenderNode>, Rc<CollectingSink>) {
    let sink = Rc::new(CollectingSink::new());
    let renderer = Renderer::new().with_diagnostics(sink.clone());
    (renderer.render(&node, ctx), sink)
}

#[test]
fn test_card_carries_variant_classes_and_templated_props() {
    let node = ComponentDescriptor {
        card_style: Some("highlight".into()),
        content_style: Some("lead".into()),
        ..ComponentDescriptor::typed("card")
    }
    .with_title("{{survey.name}}")
    .with_content("{{survey.responses}} responses")
    .with_child(ComponentDescriptor::typed("badge").with_content("New"));

    let (out, sink) = render(node, json!({ "survey": { "name": "Pulse", "responses": 12 } }));
    let out = out.unwrap();
    match &out {
        RenderNode::Widget { component, classes, children, .. } => {
            assert_eq!(component, "card");
            assert_eq!(classes, &vec!["card".to_string(), "card--highlight".to_string()]);
            assert_eq!(children.len(), 1);
            assert_eq!(children[0].prop("label"), Some(&json!("New")));
        }
        other => panic!("Expected widget, got {:?}", other),
    }
    assert_eq!(out.prop("title"), Some(&json!("Pulse")));
    assert_eq!(out.prop("content"), Some(&json!("12 responses")));
    assert!(out.prop("parts").unwrap().get("content").is_some());
    assert!(sink.is_empty());
}

#[test]
fn test_title_level_and_empty_title() {
    let (out, _) = render(
        ComponentDescriptor::typed("title")
            .with_title("Drivers")
            .with_config(json!({ "level": 3 })),
        json!({}),
    );
    let out = out.unwrap();
    assert_eq!(out.prop("text"), Some(&json!("Drivers")));
    assert_eq!(out.prop("level"), Some(&json!(3)));

    let (out, sink) = render(ComponentDescriptor::typed("title"), json!({}));
    assert!(out.is_none());
    assert!(sink.is_empty(), "a title with nothing to say is not a fault");

    let (out, sink) = render(
        ComponentDescriptor::typed("title")
            .with_title("x")
            .with_config(json!({ "level": 9 })),
        json!({}),
    );
    assert!(out.is_none());
    assert_eq!(sink.with_code(codes::INVALID_CONFIG).len(), 1);
}

#[test]
fn test_text_from_content_or_data() {
    let (out, _) = render(
        ComponentDescriptor::typed("text").with_content("Line one\n\nLine two"),
        json!({}),
    );
    assert_eq!(out.unwrap().text_content(), vec!["Line one", "Line two"]);

    let (out, _) = render(
        ComponentDescriptor::typed("text").with_data_path("summary"),
        json!({ "summary": "Mostly positive" }),
    );
    assert_eq!(out.unwrap().text_content(), vec!["Mostly positive"]);

    let (out, sink) = render(
        ComponentDescriptor::typed("text").with_data_path("summary"),
        json!({}),
    );
    assert!(out.is_none());
    assert_eq!(sink.with_code(codes::MISSING_DATA).len(), 1);
}

#[test]
fn test_badge_tone() {
    let (out, _) = render(
        ComponentDescriptor::typed("badge")
            .with_data_path("status")
            .with_config(json!({ "tone": "positive" })),
        json!({ "status": "Improving" }),
    );
    let out = out.unwrap();
    assert_eq!(out.prop("label"), Some(&json!("Improving")));
    assert_eq!(out.prop("tone"), Some(&json!("positive")));
}

#[test]
fn test_metric_formats() {
    let cases = [
        (json!({}), json!(4.26), "4.3"),
        (json!({ "decimals": 0, "suffix": " pts" }), json!(42), "42 pts"),
        (json!({ "format": "percent", "decimals": 0 }), json!(0.87), "87%"),
        (json!({ "format": "score", "decimals": 1, "max": 5 }), json!(4), "4.0/5"),
    ];
    for (config, value, expected) in cases {
        let (out, sink) = render(
            ComponentDescriptor::typed("metric")
                .with_data_path("score")
                .with_config(config),
            json!({ "score": value }),
        );
        assert!(sink.is_empty(), "{:?}", sink.entries());
        assert_eq!(out.unwrap().prop("formatted"), Some(&json!(expected)));
    }
}

#[test]
fn test_metric_rejects_non_numbers_and_unknown_formats() {
    let (out, sink) = render(
        ComponentDescriptor::typed("metric").with_data_path("score"),
        json!({ "score": "high" }),
    );
    assert!(out.is_none());
    assert_eq!(sink.with_code(codes::INVALID_DATA).len(), 1);

    let (out, sink) = render(
        ComponentDescriptor::typed("metric")
            .with_data_path("score")
            .with_config(json!({ "format": "stars" })),
        json!({ "score": 3 }),
    );
    assert!(out.is_none());
    assert!(sink.entries()[0].message.contains("stars"));
}

#[test]
fn test_accordion_from_data_and_children() {
    let (out, _) = render(
        ComponentDescriptor::typed("accordion")
            .with_data_path("faq")
            .with_config(json!({ "titleKey": "q", "contentKey": "a" })),
        json!({ "faq": [{ "q": "Why?", "a": "Because" }, { "other": 1 }] }),
    );
    assert_eq!(
        out.unwrap().prop("items"),
        Some(&json!([{ "title": "Why?", "content": "Because" }]))
    );

    let (out, sink) = render(ComponentDescriptor::typed("accordion"), json!({}));
    assert!(out.is_none());
    assert!(sink.is_empty());
}

#[test]
fn test_bar_chart_rows() {
    let (out, sink) = render(
        ComponentDescriptor::typed("barChart")
            .with_data_path("charts.nps")
            .with_config(json!({ "xKey": "segment", "yKey": "score" })),
        json!({ "charts": { "nps": [
            { "segment": "Promoters", "score": 54 },
            { "segment": "Detractors", "score": 12 }
        ] } }),
    );
    assert!(sink.is_empty());
    let out = out.unwrap();
    assert_eq!(
        out.prop("data"),
        Some(&json!([
            { "label": "Promoters", "value": 54.0 },
            { "label": "Detractors", "value": 12.0 }
        ]))
    );
    assert_eq!(out.prop("margin").unwrap()["left"], json!(48));
}

#[test]
fn test_bar_chart_guards_data_shape() {
    let (out, sink) = render(
        ComponentDescriptor::typed("barChart").with_data_path("charts"),
        json!({ "charts": [] }),
    );
    assert!(out.is_none());
    assert_eq!(sink.with_code(codes::MISSING_DATA).len(), 1);

    let (out, sink) = render(
        ComponentDescriptor::typed("barChart").with_data_path("charts"),
        json!({ "charts": [1, 2] }),
    );
    assert!(out.is_none());
    assert_eq!(sink.with_code(codes::INVALID_DATA).len(), 1);

    let (out, sink) = render(ComponentDescriptor::typed("barChart"), json!({}));
    assert!(out.is_none());
    assert_eq!(sink.with_code(codes::INVALID_CONFIG).len(), 1);

    let (out, sink) = render(
        ComponentDescriptor::typed("barChart")
            .with_data_path("charts")
            .with_config(json!(["xKey"])),
        json!({ "charts": [{ "label": "a", "value": 1 }] }),
    );
    assert!(out.is_none());
    assert_eq!(sink.with_code(codes::INVALID_CONFIG).len(), 1);
}

#[test]
fn test_stacked_chart_requires_keys() {
    let data = json!({ "stack": [{ "label": "Q1", "yes": 3, "no": 1 }] });
    let (out, _) = render(
        ComponentDescriptor::typed("stackedChart")
            .with_data_path("stack")
            .with_config(json!({ "keys": ["yes", "no"] })),
        data.clone(),
    );
    let out = out.unwrap();
    assert_eq!(out.prop("keys"), Some(&json!(["yes", "no"])));
    assert_eq!(out.prop("indexBy"), Some(&json!("label")));

    let (out, sink) = render(
        ComponentDescriptor::typed("stackedChart").with_data_path("stack"),
        data.clone(),
    );
    assert!(out.is_none());
    assert_eq!(sink.entries()[0].code, codes::INVALID_CONFIG);

    let (out, _) = render(
        ComponentDescriptor::typed("stackedChart")
            .with_data_path("stack")
            .with_config(json!({ "keys": ["yes", 2] })),
        data,
    );
    assert!(out.is_none());
}

#[test]
fn test_word_cloud_follows_toggle() {
    let node = ComponentDescriptor::typed("wordCloud")
        .with_data_path("words")
        .with_config(json!({ "minValue": 2 }));
    let ctx = DataContext::new(json!({ "words": [
        { "text": "fast", "value": 5 },
        { "text": "slow", "value": 1 },
        { "value": 9 }
    ] }));

    let (out, _) = render_in(node.clone(), &ctx);
    assert_eq!(out.unwrap().prop("words"), Some(&json!([{ "text": "fast", "value": 5.0 }])));

    ctx.channel().set_toggle_value(false);
    let (out, sink) = render_in(node, &ctx);
    assert!(out.is_none());
    assert!(sink.is_empty());
}

#[test]
fn test_list_item_template_and_filter() {
    let node = ComponentDescriptor::typed("list")
        .with_data_path("comments")
        .with_config(json!({ "itemTemplate": "{{item.text}} ({{item.topic}})", "filterField": "topic" }));
    let ctx = DataContext::new(json!({ "comments": [
        { "text": "Great support", "topic": "support" },
        { "text": "Too pricey", "topic": "price" }
    ] }));

    let (out, _) = render_in(node.clone(), &ctx);
    assert_eq!(
        out.unwrap().prop("items"),
        Some(&json!(["Great support (support)", "Too pricey (price)"]))
    );

    ctx.channel().set_filter_value("price");
    let (out, _) = render_in(node, &ctx);
    assert_eq!(out.unwrap().prop("items"), Some(&json!(["Too pricey (price)"])));
}

#[test]
fn test_list_children_render_per_item() {
    let node = ComponentDescriptor::typed("list")
        .with_data_path("people")
        .with_child(ComponentDescriptor::typed("badge").with_content("{{item.name}}"));
    let (out, _) = render(node, json!({ "people": [{ "name": "Ana" }, { "name": "Bo" }] }));
    let out = out.unwrap();
    let labels: Vec<_> = out
        .children()
        .iter()
        .flat_map(|f| f.children())
        .filter_map(|b| b.prop("label"))
        .cloned()
        .collect();
    assert_eq!(labels, vec![json!("Ana"), json!("Bo")]);
}

#[test]
fn test_table_variants_columns_and_empty_state() {
    let data = json!({ "rows": [
        { "question": "Ease of use", "score": 4.5, "segment": "smb" },
        { "question": "Value", "score": null, "segment": "enterprise" }
    ] });

    let (out, _) = render(
        ComponentDescriptor::typed("table:questions")
            .with_data_path("rows")
            .with_config(json!({ "columns": ["question", "score"] })),
        data.clone(),
    );
    let out = out.unwrap();
    assert_eq!(out.name(), Some("table"));
    assert_eq!(out.prop("variant"), Some(&json!("questions")));
    assert_eq!(
        out.prop("rows"),
        Some(&json!([
            { "question": "Ease of use", "score": "4.5" },
            { "question": "Value", "score": "" }
        ]))
    );

    let ctx = DataContext::new(data);
    ctx.channel().set_filter_value("government");
    let (out, sink) = render_in(
        ComponentDescriptor::typed("table:attributes")
            .with_data_path("rows")
            .with_config(json!({ "filterField": "segment" })),
        &ctx,
    );
    let out = out.unwrap();
    assert_eq!(out.prop("empty"), Some(&json!(true)));
    assert_eq!(out.prop("columns"), Some(&json!(["question", "score", "segment"])));
    assert!(sink.is_empty());
}

#[test]
fn test_filter_pills_seed_default_and_mark_active() {
    let ctx = DataContext::new(json!({ "topics": ["nps", "csat", "effort"] }));
    let (out, _) = render_in(
        ComponentDescriptor::typed("filterPills")
            .with_data_path("topics")
            .with_config(json!({ "defaultValue": "csat" })),
        &ctx,
    );
    let out = out.unwrap();
    assert_eq!(out.prop("selected"), Some(&json!("csat")));
    assert_eq!(out.prop("options").unwrap()[1], json!({ "value": "csat", "active": true }));
    assert_eq!(ctx.channel().filter_value(), "csat");

    ctx.channel().set_filter_value("nps");
    let (out, _) = render_in(
        ComponentDescriptor::typed("filterPills")
            .with_config(json!({ "options": ["nps", "csat"], "defaultValue": "csat" })),
        &ctx,
    );
    assert_eq!(out.unwrap().prop("selected"), Some(&json!("nps")));
}

#[test]
fn test_word_cloud_toggle_reflects_channel() {
    let ctx = DataContext::new(json!({}));
    let (out, _) = render_in(ComponentDescriptor::typed("wordCloudToggle"), &ctx);
    let out = out.unwrap();
    assert_eq!(out.prop("on"), Some(&json!(true)));
    assert_eq!(out.prop("label"), Some(&json!("Show word cloud")));

    ctx.channel().set_toggle_value(false);
    let (out, _) = render_in(ComponentDescriptor::typed("wordCloudToggle").with_title("Words"), &ctx);
    let out = out.unwrap();
    assert_eq!(out.prop("on"), Some(&json!(false)));
    assert_eq!(out.prop("label"), Some(&json!("Words")));
}
