//! Decides whether a descriptor renders at all.
//!
//! Rules, first match wins:
//!
//! 1. A selected entity is in context and the node references one of its
//!    fields (through `dataPath` or a placeholder): visible when that field,
//!    or any member of the field's OR-group, holds present data.
//! 2. A current item is in context and the node is typed: visible per type.
//!    Always-visible types pass; types with a required item field need it to
//!    be present; word-cloud types also need the show flag to be on.
//! 3. Otherwise visible.

use crate::context::DataContext;
use crate::path::{self, is_present};
use crate::registry::tag_matches;
use crate::template::placeholders;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use survey_dash_schema::ComponentDescriptor;
use tracing::trace;

/// Configurable inputs of the visibility decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisibilityRules {
    /// Context key holding the entity the user selected
    pub selected_key: String,

    /// Context key holding the item currently on display
    pub item_key: String,

    /// Alternate field names that all stand for the same data
    pub field_groups: BTreeMap<String, Vec<String>>,

    /// Types visible regardless of item data; `family:*` patterns allowed
    pub always_visible: Vec<String>,

    /// Item field each type needs to be non-empty; `family:*` patterns allowed
    pub required_fields: BTreeMap<String, String>,

    pub word_cloud_types: Vec<String>,

    /// Context path of the word cloud show flag
    pub word_cloud_flag: String,
}

impl Default for VisibilityRules {
    fn default() -> Self {
        let mut field_groups = BTreeMap::new();
        field_groups.insert(
            "nps".to_string(),
            vec![
                "nps".to_string(),
                "npsScore".to_string(),
                "netPromoterScore".to_string(),
                "hasNps".to_string(),
            ],
        );

        let required_fields = [
            ("barChart", "chartData"),
            ("stackedChart", "stackedData"),
            ("table:*", "tableData"),
            ("wordCloud", "wordCloud"),
        ]
        .into_iter()
        .map(|(t, f)| (t.to_string(), f.to_string()))
        .collect();

        Self {
            selected_key: "selectedItem".to_string(),
            item_key: "currentItem".to_string(),
            field_groups,
            always_visible: [
                "card",
                "title",
                "text",
                "badge",
                "filterPills",
                "wordCloudToggle",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            required_fields,
            word_cloud_types: vec!["wordCloud".to_string()],
            word_cloud_flag: "showWordCloud".to_string(),
        }
    }
}

impl VisibilityRules {
    /// Members of the OR-group containing `field`, if the field belongs to one
    pub fn group_for(&self, field: &str) -> Option<&[String]> {
        self.field_groups
            .iter()
            .find(|(name, members)| name.as_str() == field || members.iter().any(|m| m == field))
            .map(|(_, members)| members.as_slice())
    }

    fn is_always_visible(&self, tag: &str) -> bool {
        self.always_visible.iter().any(|p| tag_matches(p, tag))
    }

    fn required_field(&self, tag: &str) -> Option<&str> {
        self.required_fields
            .get(tag)
            .or_else(|| {
                self.required_fields
                    .iter()
                    .find(|(p, _)| tag_matches(p, tag))
                    .map(|(_, f)| f)
            })
            .map(String::as_str)
    }

    fn is_word_cloud(&self, tag: &str) -> bool {
        self.word_cloud_types.iter().any(|p| tag_matches(p, tag))
    }
}

/// Whether `descriptor` should render under `ctx`. Pure apart from lookup counting.
pub fn is_visible(descriptor: &ComponentDescriptor, ctx: &DataContext, rules: &VisibilityRules) -> bool {
    if let Some(selected) = present(ctx, &rules.selected_key) {
        if let Some(field) = referenced_field(descriptor, &rules.selected_key) {
            let visible = field_visible(&selected, &field, rules);
            trace!(component = descriptor.label(), field = %field, visible, "Selected entity visibility");
            return visible;
        }
    }

    if let Some(item) = present(ctx, &rules.item_key) {
        if let Some(tag) = descriptor.type_tag() {
            let visible = type_visible(tag, &item, ctx, rules);
            trace!(component = tag, visible, "Current item visibility");
            return visible;
        }
    }

    true
}

fn present(ctx: &DataContext, key: &str) -> Option<Value> {
    ctx.resolve(key)
        .filter(|v| !v.is_null())
        .map(|v| v.into_owned())
}

/// Field of the selected entity referenced by the node, as a path below the entity
fn referenced_field(descriptor: &ComponentDescriptor, selected_key: &str) -> Option<String> {
    let prefix = format!("{}.", selected_key);
    if let Some(field) = descriptor
        .data_path
        .as_deref()
        .and_then(|p| p.trim().strip_prefix(&prefix))
    {
        return Some(field.to_string());
    }
    [descriptor.content.as_deref(), descriptor.text.as_deref(), descriptor.title.as_deref()]
        .into_iter()
        .flatten()
        .flat_map(placeholders)
        .find_map(|p| p.strip_prefix(&prefix).map(String::from))
}

fn field_visible(entity: &Value, field: &str, rules: &VisibilityRules) -> bool {
    let (name, _) = path::split_first(field);
    match rules.group_for(name) {
        Some(members) => members.iter().any(|m| path::has_data(entity, m)),
        None => path::has_data(entity, field),
    }
}

fn type_visible(tag: &str, item: &Value, ctx: &DataContext, rules: &VisibilityRules) -> bool {
    if rules.is_always_visible(tag) {
        return true;
    }
    if let Some(field) = rules.required_field(tag) {
        if !path::has_data(item, field) {
            return false;
        }
    }
    if rules.is_word_cloud(tag) {
        return word_cloud_flag(ctx, rules);
    }
    true
}

/// The show flag from context, else the shared channel toggle.
///
/// Reading the toggle creates the channel with its defaults when nothing has
/// touched it yet, so the answer does not depend on sibling render order.
fn word_cloud_flag(ctx: &DataContext, rules: &VisibilityRules) -> bool {
    match ctx.resolve(&rules.word_cloud_flag) {
        Some(flag) if !flag.is_null() => is_present(&flag),
        _ => ctx.channel().toggle_value(),
    }
}
