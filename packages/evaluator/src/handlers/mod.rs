//! Built-in component handlers.
//!
//! Handlers resolve a node's data and config into a [`PresentationUnit`] and
//! hand it to the presentation layer. Each one guards its own data: missing
//! or empty backing data is an error the renderer reports, never a panic.

mod charts;
mod collections;
mod content;
mod controls;

use crate::channel::ChannelSnapshot;
use crate::error::{RenderError, RenderResult};
use crate::path::{self, display_string};
use crate::registry::Registry;
use serde_json::{Map, Value};
use survey_dash_schema::ComponentDescriptor;

/// Context key under which collection items are visible to item templates
pub const ITEM_KEY: &str = "item";

pub(crate) fn register_builtins(registry: &mut Registry) {
    registry.register("card", content::card);
    registry.register("title", content::title);
    registry.register("text", content::text);
    registry.register("badge", content::badge);
    registry.register("metric", content::metric);
    registry.register("accordion", content::accordion);
    registry.register("list", collections::list);
    registry.register("table:*", collections::table);
    registry.register("barChart", charts::bar_chart);
    registry.register("stackedChart", charts::stacked_chart);
    registry.register("wordCloud", charts::word_cloud);
    registry.register("filterPills", controls::filter_pills);
    registry.register("wordCloudToggle", controls::word_cloud_toggle);
}

/// The node's `config` as an object. Absent config is an empty object.
fn config_object(descriptor: &ComponentDescriptor) -> RenderResult<Map<String, Value>> {
    match &descriptor.config {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map.clone()),
        Some(_) => Err(RenderError::config("config", "expected an object")),
    }
}

fn config_string(config: &Map<String, Value>, key: &str, default: &str) -> RenderResult<String> {
    match config.get(key) {
        None | Some(Value::Null) => Ok(default.to_string()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(RenderError::config(key, "expected a string")),
    }
}

fn config_number(config: &Map<String, Value>, key: &str, default: f64) -> RenderResult<f64> {
    match config.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(v) => v
            .as_f64()
            .ok_or_else(|| RenderError::config(key, "expected a number")),
    }
}

/// Keep rows matching the shared filter on `config.filterField`.
///
/// Rows pass when the field equals the filter (case-insensitive) or, for
/// array fields, contains it. No filter field or no active filter keeps all.
fn apply_shared_filter(
    rows: Vec<Value>,
    config: &Map<String, Value>,
    shared: &ChannelSnapshot,
) -> RenderResult<Vec<Value>> {
    let field = config_string(config, "filterField", "")?;
    let Some(filter) = shared.active_filter() else {
        return Ok(rows);
    };
    if field.is_empty() {
        return Ok(rows);
    }
    Ok(rows
        .into_iter()
        .filter(|row| match path::resolve(row, &field) {
            Some(Value::Array(values)) => values
                .iter()
                .any(|v| display_string(v).eq_ignore_ascii_case(filter)),
            Some(value) => display_string(value).eq_ignore_ascii_case(filter),
            None => false,
        })
        .collect())
}
