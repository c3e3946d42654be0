use crate::diagnostic::Diagnostic;
use crate::rules::{LintRule, RuleContext};
use serde_json::Value;
use survey_dash_schema::ComponentDescriptor;

/// Lint rule requiring `config` to be a JSON object
pub struct ConfigNotObjectRule;

impl LintRule for ConfigNotObjectRule {
    fn name(&self) -> &'static str {
        "config-not-object"
    }

    fn description(&self) -> &'static str {
        "Require component config to be an object"
    }

    fn check_node(&self, node: &ComponentDescriptor, cx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let kind = match &node.config {
            None | Some(Value::Null) | Some(Value::Object(_)) => return Vec::new(),
            Some(Value::Array(_)) => "an array",
            Some(Value::String(_)) => "a string",
            Some(Value::Number(_)) => "a number",
            Some(Value::Bool(_)) => "a boolean",
        };
        vec![Diagnostic::error(
            "config-not-object",
            format!("'{}' config is {}, expected an object", node.label(), kind),
            cx.location,
        )
        .in_field("config")]
    }
}
