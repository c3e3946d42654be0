use crate::diagnostic::Diagnostic;
use crate::rules::{LintRule, RuleContext};
use survey_dash_schema::ComponentDescriptor;

/// Lint rule flagging `type` tags with no registered handler.
///
/// Such nodes render nothing at runtime. `family:*` registrations cover every
/// `family:<variant>` tag.
pub struct UnknownTypeRule;

impl LintRule for UnknownTypeRule {
    fn name(&self) -> &'static str {
        "unknown-type"
    }

    fn description(&self) -> &'static str {
        "Disallow component types without a registered handler"
    }

    fn check_node(&self, node: &ComponentDescriptor, cx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let (Some(known), Some(tag)) = (cx.known_types, node.type_tag()) else {
            return Vec::new();
        };
        // Wrappers take precedence over types, so the type is never dispatched
        if node.wrapper.as_deref().is_some_and(|w| !w.is_empty()) || is_known(known, tag) {
            return Vec::new();
        }

        let mut diagnostic = Diagnostic::error(
            "unknown-type",
            format!("Component type '{}' has no registered handler and will not render", tag),
            cx.location,
        );
        if let Some(closest) = closest(known, tag) {
            diagnostic = diagnostic.with_suggestion(format!("Did you mean '{}'?", closest));
        }
        vec![diagnostic]
    }
}

fn is_known(known: &[String], tag: &str) -> bool {
    known.iter().any(|pattern| {
        pattern == tag
            || pattern
                .strip_suffix('*')
                .filter(|prefix| prefix.ends_with(':'))
                .is_some_and(|prefix| tag.starts_with(prefix) && tag.len() > prefix.len())
    })
}

/// A known tag equal to `tag` ignoring case
fn closest<'a>(known: &'a [String], tag: &str) -> Option<&'a str> {
    known
        .iter()
        .find(|k| k.eq_ignore_ascii_case(tag))
        .map(String::as_str)
}
