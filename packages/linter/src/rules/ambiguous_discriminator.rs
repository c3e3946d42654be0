use crate::diagnostic::Diagnostic;
use crate::rules::{LintRule, RuleContext};
use survey_dash_schema::ComponentDescriptor;

/// Lint rule flagging nodes carrying both `type` and `wrapper`.
///
/// The wrapper wins at render time and the type is silently ignored.
pub struct AmbiguousDiscriminatorRule;

impl LintRule for AmbiguousDiscriminatorRule {
    fn name(&self) -> &'static str {
        "ambiguous-discriminator"
    }

    fn description(&self) -> &'static str {
        "Disallow nodes with both a type and a wrapper"
    }

    fn check_node(&self, node: &ComponentDescriptor, cx: &RuleContext<'_>) -> Vec<Diagnostic> {
        match (node.type_tag(), node.wrapper.as_deref()) {
            (Some(kind), Some(wrapper)) if !kind.is_empty() && !wrapper.is_empty() => {
                vec![Diagnostic::warning(
                    "ambiguous-discriminator",
                    format!(
                        "Node has both type '{}' and wrapper '{}'; it renders as a '{}' container",
                        kind, wrapper, wrapper
                    ),
                    cx.location,
                )
                .with_suggestion(format!(
                    "Move the '{}' component into the wrapper's components",
                    kind
                ))]
            }
            _ => Vec::new(),
        }
    }
}
