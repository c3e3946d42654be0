use crate::channel::ChannelSnapshot;
use crate::diagnostics::Diagnostic;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Output of rendering a schema node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RenderNode {
    /// Structural container produced by a `wrapper` node
    Element {
        tag: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        classes: Vec<String>,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        styles: BTreeMap<String, String>,
        #[serde(default)]
        children: Vec<RenderNode>,
    },

    /// Children without a container of their own
    Fragment { children: Vec<RenderNode> },

    /// Paragraph-like text unit
    Text {
        content: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        classes: Vec<String>,
    },

    /// Blank-line spacer between text units
    Spacer,

    /// Unit produced by the presentation layer for a typed component
    Widget {
        component: String,
        #[serde(default)]
        props: Map<String, Value>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        classes: Vec<String>,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        styles: BTreeMap<String, String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<RenderNode>,
    },
}

impl RenderNode {
    pub fn element(tag: impl Into<String>) -> Self {
        RenderNode::Element {
            tag: tag.into(),
            id: None,
            classes: Vec::new(),
            styles: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        RenderNode::Text {
            content: content.into(),
            classes: Vec::new(),
        }
    }

    pub fn fragment(children: Vec<RenderNode>) -> Self {
        RenderNode::Fragment { children }
    }

    pub fn with_id(mut self, new_id: impl Into<String>) -> Self {
        if let RenderNode::Element { ref mut id, .. } = self {
            *id = Some(new_id.into());
        }
        self
    }

    pub fn with_classes(mut self, new_classes: Vec<String>) -> Self {
        match self {
            RenderNode::Element {
                ref mut classes, ..
            }
            | RenderNode::Text {
                ref mut classes, ..
            }
            | RenderNode::Widget {
                ref mut classes, ..
            } => classes.extend(new_classes),
            _ => {}
        }
        self
    }

    pub fn with_styles(mut self, new_styles: BTreeMap<String, String>) -> Self {
        match self {
            RenderNode::Element { ref mut styles, .. }
            | RenderNode::Widget { ref mut styles, .. } => styles.extend(new_styles),
            _ => {}
        }
        self
    }

    pub fn with_child(mut self, child: RenderNode) -> Self {
        if let Some(children) = self.children_mut() {
            children.push(child);
        }
        self
    }

    pub fn with_children(mut self, new_children: Vec<RenderNode>) -> Self {
        if let Some(children) = self.children_mut() {
            children.extend(new_children);
        }
        self
    }

    pub fn children(&self) -> &[RenderNode] {
        match self {
            RenderNode::Element { children, .. }
            | RenderNode::Fragment { children }
            | RenderNode::Widget { children, .. } => children,
            _ => &[],
        }
    }

    fn children_mut(&mut self) -> Option<&mut Vec<RenderNode>> {
        match self {
            RenderNode::Element { children, .. }
            | RenderNode::Fragment { children }
            | RenderNode::Widget { children, .. } => Some(children),
            _ => None,
        }
    }

    /// Component name for widgets, tag for elements
    pub fn name(&self) -> Option<&str> {
        match self {
            RenderNode::Element { tag, .. } => Some(tag),
            RenderNode::Widget { component, .. } => Some(component),
            _ => None,
        }
    }

    pub fn prop(&self, key: &str) -> Option<&Value> {
        match self {
            RenderNode::Widget { props, .. } => props.get(key),
            _ => None,
        }
    }

    /// All text content in document order
    pub fn text_content(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut Vec<String>) {
        if let RenderNode::Text { content, .. } = self {
            out.push(content.clone());
        }
        for child in self.children() {
            child.collect_text(out);
        }
    }
}

/// Result of rendering one section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderOutput {
    pub section: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub nodes: Vec<RenderNode>,
    /// Shared channel state at the end of the pass, if any component touched it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared: Option<ChannelSnapshot>,
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}
