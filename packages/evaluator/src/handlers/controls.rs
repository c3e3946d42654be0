//! Components writing to the shared channel

use super::{config_object, config_string};
use crate::error::{RenderError, RenderResult};
use crate::path::display_string;
use crate::presenter::PresentationUnit;
use crate::renderer::Scope;
use crate::vdom::RenderNode;
use serde_json::{json, Value};
use survey_dash_schema::ComponentDescriptor;
use tracing::debug;

/// Filter options from `config.options` or the array at `dataPath`.
///
/// Seeds the shared filter with `config.defaultValue` when nothing has been
/// selected yet.
pub(super) fn filter_pills(d: &ComponentDescriptor, scope: &Scope<'_>) -> RenderResult<Option<RenderNode>> {
    let config = config_object(d)?;
    let options: Vec<String> = match config.get("options") {
        Some(Value::Array(options)) => options.iter().map(display_string).collect(),
        Some(_) => return Err(RenderError::config("options", "expected an array")),
        None => scope.data_array(d)?.iter().map(display_string).collect(),
    };
    let options: Vec<String> = options.into_iter().filter(|o| !o.trim().is_empty()).collect();
    if options.is_empty() {
        return Ok(None);
    }

    let channel = scope.context().channel();
    let default_value = config_string(&config, "defaultValue", "")?;
    if channel.filter_value().is_empty() && !default_value.is_empty() {
        debug!(filter = %default_value, "Seeding shared filter");
        channel.set_filter_value(default_value);
    }
    let selected = channel.filter_value();

    let pills: Vec<Value> = options
        .iter()
        .map(|o| json!({ "value": o, "active": o.eq_ignore_ascii_case(&selected) }))
        .collect();
    let unit = PresentationUnit::for_descriptor("filterPills", d)
        .prop("options", pills)
        .prop("selected", selected);
    scope.present(unit).map(Some)
}

pub(super) fn word_cloud_toggle(d: &ComponentDescriptor, scope: &Scope<'_>) -> RenderResult<Option<RenderNode>> {
    let config = config_object(d)?;
    let on = scope.context().channel().toggle_value();
    let label = match d.body().or(d.title.as_deref()) {
        Some(label) => scope.template(label),
        None => config_string(&config, "label", "Show word cloud")?,
    };
    let unit = PresentationUnit::for_descriptor("wordCloudToggle", d)
        .prop("on", on)
        .prop("label", label);
    scope.present(unit).map(Some)
}
