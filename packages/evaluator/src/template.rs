//! `{{path}}` placeholder substitution.
//!
//! Each placeholder is resolved independently. Unresolvable placeholders are
//! left in the output verbatim so broken schema bindings stay visible.

use crate::context::DataContext;
use crate::path::display_string;
use regex::{Captures, Regex};
use std::sync::OnceLock;

static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();

fn placeholder() -> &'static Regex {
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{\{\s*([^{}]*?)\s*\}\}").expect("placeholder pattern is valid")
    })
}

/// Substitute every placeholder in `template`
pub fn resolve_template(ctx: &DataContext, template: &str) -> String {
    if !template.contains("{{") {
        return template.to_string();
    }
    placeholder()
        .replace_all(template, |caps: &Captures| {
            let path = &caps[1];
            if path.is_empty() {
                return caps[0].to_string();
            }
            match ctx.resolve(path) {
                Some(value) => display_string(&value),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Paths referenced by the placeholders of `template`, in order of appearance
pub fn placeholders(template: &str) -> Vec<&str> {
    placeholder()
        .captures_iter(template)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}
