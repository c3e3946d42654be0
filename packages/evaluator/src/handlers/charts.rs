//! Bar, stacked bar and word cloud charts

use super::{apply_shared_filter, config_number, config_object, config_string};
use crate::error::{RenderError, RenderResult};
use crate::path::display_string;
use crate::presenter::PresentationUnit;
use crate::renderer::Scope;
use crate::vdom::RenderNode;
use serde_json::{json, Value};
use survey_dash_schema::ComponentDescriptor;
use tracing::debug;

fn default_margin() -> Value {
    json!({ "top": 20, "right": 20, "bottom": 40, "left": 48 })
}

fn object_rows(path: &str, rows: &[Value]) -> RenderResult<()> {
    if rows.iter().all(Value::is_object) {
        Ok(())
    } else {
        Err(RenderError::InvalidData {
            path: path.to_string(),
            expected: "an array of objects",
        })
    }
}

pub(super) fn bar_chart(d: &ComponentDescriptor, scope: &Scope<'_>) -> RenderResult<Option<RenderNode>> {
    let config = config_object(d)?;
    let path = scope.data_path(d)?;
    let rows = scope.data_array(d)?;
    object_rows(path, &rows)?;

    let x_key = config_string(&config, "xKey", "label")?;
    let y_key = config_string(&config, "yKey", "value")?;
    let rows = apply_shared_filter(rows, &config, &scope.context().channel().snapshot())?;
    let bars: Vec<Value> = rows
        .iter()
        .map(|row| {
            json!({
                "label": row.get(&x_key).map(display_string).unwrap_or_default(),
                "value": row.get(&y_key).and_then(Value::as_f64).unwrap_or(0.0),
            })
        })
        .collect();

    let mut unit = PresentationUnit::for_descriptor("barChart", d)
        .prop("data", bars)
        .prop("xKey", x_key)
        .prop("yKey", y_key)
        .prop("margin", config.get("margin").cloned().unwrap_or_else(default_margin));
    if let Some(title) = &d.title {
        unit = unit.prop("title", scope.template(title));
    }
    scope.present(unit).map(Some)
}

pub(super) fn stacked_chart(d: &ComponentDescriptor, scope: &Scope<'_>) -> RenderResult<Option<RenderNode>> {
    let config = config_object(d)?;
    let keys: Vec<String> = match config.get("keys") {
        Some(Value::Array(keys)) if !keys.is_empty() => keys
            .iter()
            .map(|k| k.as_str().map(String::from))
            .collect::<Option<_>>()
            .ok_or_else(|| RenderError::config("keys", "expected an array of strings"))?,
        _ => return Err(RenderError::config("keys", "required, a non-empty array of strings")),
    };
    let index_by = config_string(&config, "indexBy", "label")?;

    let path = scope.data_path(d)?;
    let rows = scope.data_array(d)?;
    object_rows(path, &rows)?;

    let mut unit = PresentationUnit::for_descriptor("stackedChart", d)
        .prop("data", rows)
        .prop("keys", keys)
        .prop("indexBy", index_by)
        .prop("margin", config.get("margin").cloned().unwrap_or_else(default_margin));
    if let Some(title) = &d.title {
        unit = unit.prop("title", scope.template(title));
    }
    scope.present(unit).map(Some)
}

/// Hidden while the shared toggle is off
pub(super) fn word_cloud(d: &ComponentDescriptor, scope: &Scope<'_>) -> RenderResult<Option<RenderNode>> {
    let shared = scope.context().channel().snapshot();
    if !shared.toggle_value {
        debug!("Word cloud toggled off");
        return Ok(None);
    }

    let config = config_object(d)?;
    let min_value = config_number(&config, "minValue", 0.0)?;
    let path = scope.data_path(d)?;
    let words: Vec<Value> = scope
        .data_array(d)?
        .iter()
        .filter_map(|entry| {
            let text = entry.get("text").map(display_string)?;
            let value = entry.get("value").and_then(Value::as_f64).unwrap_or(1.0);
            (!text.is_empty() && value >= min_value).then(|| json!({ "text": text, "value": value }))
        })
        .collect();
    if words.is_empty() {
        return Err(RenderError::missing(path));
    }

    let unit = PresentationUnit::for_descriptor("wordCloud", d).prop("words", words);
    scope.present(unit).map(Some)
}
