use crate::diagnostic::Diagnostic;
use crate::rules::{LintRule, RuleContext};
use regex::Regex;
use std::sync::OnceLock;
use survey_dash_schema::ComponentDescriptor;

/// Lint rule flagging broken `{{path}}` placeholders in text fields.
///
/// Unbalanced braces and empty placeholders are rendered verbatim at runtime.
pub struct MalformedTemplateRule;

fn delimiter_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{|\}\}").expect("delimiter pattern is valid"))
}

impl LintRule for MalformedTemplateRule {
    fn name(&self) -> &'static str {
        "malformed-template"
    }

    fn description(&self) -> &'static str {
        "Disallow unbalanced or empty {{ }} placeholders"
    }

    fn check_node(&self, node: &ComponentDescriptor, cx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let fields = [
            ("title", node.title.as_deref()),
            ("text", node.text.as_deref()),
            ("content", node.content.as_deref()),
        ];
        fields
            .into_iter()
            .filter_map(|(field, value)| Some((field, value?)))
            .filter_map(|(field, value)| {
                problem(value).map(|problem| {
                    Diagnostic::error(
                        "malformed-template",
                        format!("'{}' has {}: \"{}\"", field, problem, value),
                        cx.location,
                    )
                    .in_field(field)
                    .with_suggestion("Placeholders take the form {{path.to.value}}")
                })
            })
            .collect()
    }
}

fn problem(template: &str) -> Option<&'static str> {
    let mut open: Option<usize> = None;
    for delimiter in delimiter_regex().find_iter(template) {
        match (delimiter.as_str(), open) {
            ("{{", None) => open = Some(delimiter.end()),
            ("{{", Some(_)) => return Some("a nested '{{'"),
            (_, None) => return Some("a '}}' without an opening '{{'"),
            (_, Some(start)) => {
                if template[start..delimiter.start()].trim().is_empty() {
                    return Some("an empty placeholder");
                }
                open = None;
            }
        }
    }
    open.map(|_| "an unclosed '{{'")
}
