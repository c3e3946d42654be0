//! Lists and tables over arrays in the data context

use super::{apply_shared_filter, config_object, config_string, ITEM_KEY};
use crate::error::{RenderError, RenderResult};
use crate::path::display_string;
use crate::presenter::PresentationUnit;
use crate::renderer::Scope;
use crate::template::resolve_template;
use crate::vdom::RenderNode;
use serde_json::{Map, Value};
use survey_dash_schema::ComponentDescriptor;

/// Items at `dataPath`, narrowed by the shared filter.
///
/// The list renders an item template per entry and, when the node has
/// children, those children once per entry with the entry bound as `item`.
pub(super) fn list(d: &ComponentDescriptor, scope: &Scope<'_>) -> RenderResult<Option<RenderNode>> {
    let config = config_object(d)?;
    let items = scope.data_array(d)?;
    let items = apply_shared_filter(items, &config, &scope.context().channel().snapshot())?;
    let item_template = config_string(&config, "itemTemplate", "")?;

    let mut rendered = Vec::with_capacity(items.len());
    let mut children = Vec::new();
    for item in items {
        let item_ctx = scope.context().scoped(ITEM_KEY, item.clone());
        let label = if item_template.is_empty() {
            display_string(&item)
        } else {
            resolve_template(&item_ctx, &item_template)
        };
        rendered.push(Value::String(label));
        if d.has_children() {
            children.push(RenderNode::fragment(scope.render_children_in(d, &item_ctx)));
        }
    }

    let mut unit = PresentationUnit::for_descriptor("list", d)
        .prop("items", rendered)
        .with_children(children);
    if let Some(empty) = config.get("emptyText").and_then(Value::as_str) {
        unit = unit.prop("emptyText", scope.template(empty));
    }
    if let Some(title) = &d.title {
        unit = unit.prop("title", scope.template(title));
    }
    scope.present(unit).map(Some)
}

/// `table:<variant>`. Columns come from `config.columns` or the first row.
///
/// Rows removed by the shared filter leave an explicit empty state rather
/// than nothing, so the table does not vanish while the user filters.
pub(super) fn table(d: &ComponentDescriptor, scope: &Scope<'_>) -> RenderResult<Option<RenderNode>> {
    let config = config_object(d)?;
    let variant = d
        .type_tag()
        .and_then(|t| t.split_once(':'))
        .map(|(_, v)| v.to_string())
        .unwrap_or_default();
    let path = scope.data_path(d)?;
    let rows = scope.data_array(d)?;
    if !rows.iter().all(Value::is_object) {
        return Err(RenderError::InvalidData {
            path: path.to_string(),
            expected: "an array of objects",
        });
    }

    let columns = columns(&config, &rows)?;
    let rows = apply_shared_filter(rows, &config, &scope.context().channel().snapshot())?;
    let cells: Vec<Value> = rows
        .iter()
        .map(|row| {
            let cells: Map<String, Value> = columns
                .iter()
                .map(|c| {
                    let cell = row.get(c).map(display_string).unwrap_or_default();
                    (c.clone(), Value::String(cell))
                })
                .collect();
            Value::Object(cells)
        })
        .collect();

    let mut unit = PresentationUnit::for_descriptor("table", d)
        .prop("variant", variant)
        .prop("columns", columns)
        .prop("empty", cells.is_empty())
        .prop("rows", cells);
    if let Some(title) = &d.title {
        unit = unit.prop("title", scope.template(title));
    }
    scope.present(unit).map(Some)
}

fn columns(config: &Map<String, Value>, rows: &[Value]) -> RenderResult<Vec<String>> {
    match config.get("columns") {
        Some(Value::Array(columns)) => columns
            .iter()
            .map(|c| c.as_str().map(String::from))
            .collect::<Option<Vec<_>>>()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| RenderError::config("columns", "expected a non-empty array of strings")),
        Some(_) => Err(RenderError::config("columns", "expected a non-empty array of strings")),
        None => Ok(rows
            .first()
            .and_then(Value::as_object)
            .map(|first| first.keys().cloned().collect())
            .unwrap_or_default()),
    }
}
