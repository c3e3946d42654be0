use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A node in the dashboard schema tree.
///
/// A node is interpreted either through its `type` tag (dispatched to a
/// registered handler) or through its `wrapper` tag (a structural container).
/// A node with neither and nothing to show renders nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDescriptor {
    /// Handler tag, e.g. `card`, `barChart`, `table:attributes`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Structural container tag, e.g. `div`, `h3`, `span`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrapper: Option<String>,

    /// Dot path into the data context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ComponentDescriptor>,

    /// Sibling position; nodes without one sort after all indexed siblings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_style: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_style: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_style: Option<String>,

    /// Space separated class list supplied by the schema author
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    /// Inline style fragments; author values win over variant values
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub style: BTreeMap<String, String>,

    /// Class lists for inner parts such as `title` and `content`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub part_classes: BTreeMap<String, Vec<String>>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub part_styles: BTreeMap<String, BTreeMap<String, String>>,

    /// Handler specific settings (axis keys, thresholds, formatters)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
}

impl ComponentDescriptor {
    pub fn typed(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            ..Default::default()
        }
    }

    pub fn wrapper(tag: impl Into<String>) -> Self {
        Self {
            wrapper: Some(tag.into()),
            ..Default::default()
        }
    }

    pub fn with_index(mut self, index: i64) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_data_path(mut self, path: impl Into<String>) -> Self {
        self.data_path = Some(path.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_config(mut self, config: Value) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_child(mut self, child: ComponentDescriptor) -> Self {
        self.components.push(child);
        self
    }

    /// The handler tag, if any
    pub fn type_tag(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    /// Textual body of the node: `content`, falling back to `text`
    pub fn body(&self) -> Option<&str> {
        self.content.as_deref().or(self.text.as_deref())
    }

    /// Author classes split on whitespace
    pub fn classes(&self) -> Vec<String> {
        self.class_name
            .as_deref()
            .map(|c| c.split_whitespace().map(String::from).collect())
            .unwrap_or_default()
    }

    pub fn classes_for(&self, part: &str) -> Vec<String> {
        self.part_classes.get(part).cloned().unwrap_or_default()
    }

    pub fn has_children(&self) -> bool {
        !self.components.is_empty()
    }

    /// A short label for diagnostics: the type tag, the wrapper tag, or `<none>`
    pub fn label(&self) -> &str {
        self.kind
            .as_deref()
            .or(self.wrapper.as_deref())
            .unwrap_or("<none>")
    }

    /// Config entry by key, when `config` is an object
    pub fn config_value(&self, key: &str) -> Option<&Value> {
        self.config.as_ref().and_then(|c| c.get(key))
    }

    pub fn config_str(&self, key: &str) -> Option<&str> {
        self.config_value(key).and_then(Value::as_str)
    }

    /// Children in render order
    pub fn ordered_children(&self) -> Vec<&ComponentDescriptor> {
        order_by_index(&self.components)
    }
}

/// Orders siblings by ascending `index`.
///
/// The sort is stable: siblings sharing an index keep their source order, and
/// siblings without an index follow every indexed sibling in source order.
pub fn order_by_index(components: &[ComponentDescriptor]) -> Vec<&ComponentDescriptor> {
    let mut ordered: Vec<&ComponentDescriptor> = components.iter().collect();
    ordered.sort_by_key(|c| match c.index {
        Some(i) => (0u8, i),
        None => (1u8, 0),
    });
    ordered
}
