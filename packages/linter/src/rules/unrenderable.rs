use crate::diagnostic::Diagnostic;
use crate::rules::{LintRule, RuleContext};
use survey_dash_schema::ComponentDescriptor;

/// Lint rule flagging nodes that can never render anything
pub struct UnrenderableRule;

impl LintRule for UnrenderableRule {
    fn name(&self) -> &'static str {
        "unrenderable"
    }

    fn description(&self) -> &'static str {
        "Disallow nodes with no type, wrapper, content or children"
    }

    fn check_node(&self, node: &ComponentDescriptor, cx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let has_tag = |tag: &Option<String>| tag.as_deref().is_some_and(|t| !t.is_empty());
        if has_tag(&node.kind) || has_tag(&node.wrapper) || node.body().is_some() || node.has_children() {
            return Vec::new();
        }
        vec![Diagnostic::warning(
            "unrenderable",
            "Node has no type, wrapper, content or children and renders nothing",
            cx.location,
        )
        .with_suggestion("Add a 'type' or 'wrapper', or remove the node")]
    }
}
