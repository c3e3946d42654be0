use crate::error::RenderResult;
use crate::style_variants::{CONTENT_PART, TITLE_PART};
use crate::vdom::RenderNode;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use survey_dash_schema::ComponentDescriptor;

/// Fully resolved input for one presentation-layer component.
///
/// Strings are already templated, data paths already resolved and style
/// variants already merged.
#[derive(Debug, Clone, PartialEq)]
pub struct PresentationUnit {
    pub component: String,
    pub props: Map<String, Value>,
    pub classes: Vec<String>,
    pub styles: BTreeMap<String, String>,
    pub children: Vec<RenderNode>,
}

impl PresentationUnit {
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            props: Map::new(),
            classes: Vec::new(),
            styles: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Unit carrying the node's classes, inline styles and part styling
    pub fn for_descriptor(component: impl Into<String>, descriptor: &ComponentDescriptor) -> Self {
        let mut unit = Self::new(component);
        unit.classes = descriptor.classes();
        unit.styles = descriptor.style.clone();

        let mut parts = Map::new();
        for part in [TITLE_PART, CONTENT_PART] {
            let classes = descriptor.classes_for(part);
            let styles = descriptor.part_styles.get(part).cloned().unwrap_or_default();
            if !classes.is_empty() || !styles.is_empty() {
                parts.insert(part.to_string(), json!({ "classes": classes, "styles": styles }));
            }
        }
        if !parts.is_empty() {
            unit.props.insert("parts".to_string(), Value::Object(parts));
        }
        unit
    }

    pub fn prop(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.props.insert(key.to_string(), value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<RenderNode>) -> Self {
        self.children.extend(children);
        self
    }
}

/// The presentation layer: turns resolved units into renderable nodes
pub trait Presenter {
    fn present(&self, unit: PresentationUnit) -> RenderResult<RenderNode>;
}

/// Default presenter emitting [`RenderNode::Widget`] nodes
#[derive(Debug, Default, Clone, Copy)]
pub struct WidgetPresenter;

impl Presenter for WidgetPresenter {
    fn present(&self, unit: PresentationUnit) -> RenderResult<RenderNode> {
        Ok(RenderNode::Widget {
            component: unit.component,
            props: unit.props,
            classes: unit.classes,
            styles: unit.styles,
            children: unit.children,
        })
    }
}
