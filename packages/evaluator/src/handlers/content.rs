//! Cards, headings and text-like components

use super::{config_number, config_object, config_string};
use crate::error::{RenderError, RenderResult};
use crate::path::display_string;
use crate::presenter::PresentationUnit;
use crate::renderer::{text_units, Scope};
use crate::style_variants::CONTENT_PART;
use crate::vdom::RenderNode;
use serde_json::{json, Value};
use survey_dash_schema::ComponentDescriptor;

pub(super) fn card(d: &ComponentDescriptor, scope: &Scope<'_>) -> RenderResult<Option<RenderNode>> {
    let mut unit = PresentationUnit::for_descriptor("card", d);
    if let Some(title) = &d.title {
        unit = unit.prop("title", scope.template(title));
    }
    if let Some(body) = d.body() {
        unit = unit.prop("content", scope.template(body));
    }
    if d.data_path.is_some() {
        if let Ok(value) = scope.data(d) {
            unit = unit.prop("value", value.into_owned());
        }
    }
    let unit = unit.with_children(scope.render_children(d));
    scope.present(unit).map(Some)
}

pub(super) fn title(d: &ComponentDescriptor, scope: &Scope<'_>) -> RenderResult<Option<RenderNode>> {
    let config = config_object(d)?;
    let Some(source) = d.title.as_deref().or_else(|| d.body()) else {
        return Ok(None);
    };
    let text = scope.template(source);
    if text.trim().is_empty() {
        return Ok(None);
    }
    let level = config_number(&config, "level", 2.0)?;
    if !(1.0..=6.0).contains(&level) {
        return Err(RenderError::config("level", "expected a heading level from 1 to 6"));
    }
    let unit = PresentationUnit::for_descriptor("title", d)
        .prop("text", text)
        .prop("level", level as u64);
    scope.present(unit).map(Some)
}

pub(super) fn text(d: &ComponentDescriptor, scope: &Scope<'_>) -> RenderResult<Option<RenderNode>> {
    let text = match d.body() {
        Some(body) => scope.template(body),
        None => display_string(scope.data(d)?.as_ref()),
    };
    let units = text_units(&text, &d.classes_for(CONTENT_PART));
    let unit = PresentationUnit::for_descriptor("text", d).with_children(units);
    scope.present(unit).map(Some)
}

pub(super) fn badge(d: &ComponentDescriptor, scope: &Scope<'_>) -> RenderResult<Option<RenderNode>> {
    let config = config_object(d)?;
    let label = match d.body().or(d.title.as_deref()) {
        Some(body) => scope.template(body),
        None => display_string(scope.data(d)?.as_ref()),
    };
    let unit = PresentationUnit::for_descriptor("badge", d)
        .prop("label", label)
        .prop("tone", config_string(&config, "tone", "neutral")?);
    scope.present(unit).map(Some)
}

pub(super) fn metric(d: &ComponentDescriptor, scope: &Scope<'_>) -> RenderResult<Option<RenderNode>> {
    let config = config_object(d)?;
    let path = scope.data_path(d)?;
    let value = scope.data(d)?;
    let number = value.as_f64().ok_or_else(|| RenderError::InvalidData {
        path: path.to_string(),
        expected: "a number",
    })?;

    let format = config_string(&config, "format", "number")?;
    let decimals = config_number(&config, "decimals", 1.0)?.clamp(0.0, 6.0) as usize;
    let suffix = config_string(&config, "suffix", "")?;
    let formatted = match format.as_str() {
        "number" => format!("{:.*}{}", decimals, number, suffix),
        "percent" => format!("{:.*}%", decimals, number * 100.0),
        "score" => format!("{:.*}/{}", decimals, number, config_number(&config, "max", 5.0)?),
        other => {
            return Err(RenderError::config(
                "format",
                format!("unknown format '{}', expected number, percent or score", other),
            ))
        }
    };

    let mut unit = PresentationUnit::for_descriptor("metric", d)
        .prop("value", number)
        .prop("formatted", formatted);
    if let Some(label) = &d.title {
        unit = unit.prop("label", scope.template(label));
    }
    scope.present(unit).map(Some)
}

pub(super) fn accordion(d: &ComponentDescriptor, scope: &Scope<'_>) -> RenderResult<Option<RenderNode>> {
    let config = config_object(d)?;
    let title_key = config_string(&config, "titleKey", "title")?;
    let content_key = config_string(&config, "contentKey", "content")?;

    let mut items = Vec::new();
    if d.data_path.is_some() {
        for item in scope.data_array(d)? {
            let title = item.get(&title_key).map(display_string).unwrap_or_default();
            let content = item.get(&content_key).map(display_string).unwrap_or_default();
            if title.is_empty() && content.is_empty() {
                continue;
            }
            items.push(json!({ "title": title, "content": content }));
        }
    }
    let children = scope.render_children(d);
    if items.is_empty() && children.is_empty() {
        return Ok(None);
    }

    let mut unit = PresentationUnit::for_descriptor("accordion", d)
        .prop("items", Value::Array(items))
        .with_children(children);
    if let Some(title) = &d.title {
        unit = unit.prop("title", scope.template(title));
    }
    scope.present(unit).map(Some)
}
