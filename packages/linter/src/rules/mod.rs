mod ambiguous_discriminator;
mod config_not_object;
mod duplicate_index;
mod malformed_template;
mod unknown_type;
mod unrenderable;

pub use ambiguous_discriminator::AmbiguousDiscriminatorRule;
pub use config_not_object::ConfigNotObjectRule;
pub use duplicate_index::DuplicateIndexRule;
pub use malformed_template::MalformedTemplateRule;
pub use unknown_type::UnknownTypeRule;
pub use unrenderable::UnrenderableRule;

use crate::diagnostic::Diagnostic;
use survey_dash_schema::ComponentDescriptor;

/// What a rule knows about the node under check
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// Location of the node (or, for sibling checks, of the parent's children)
    pub location: &'a str,

    /// Registered component types; `None` skips type checks
    pub known_types: Option<&'a [String]>,
}

/// Trait for implementing lint rules
pub trait LintRule {
    /// Unique identifier for this rule
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// Check a single schema node
    fn check_node(&self, _node: &ComponentDescriptor, _cx: &RuleContext<'_>) -> Vec<Diagnostic> {
        Vec::new()
    }

    /// Check one list of siblings as a whole
    fn check_siblings(&self, _siblings: &[ComponentDescriptor], _cx: &RuleContext<'_>) -> Vec<Diagnostic> {
        Vec::new()
    }
}

/// Registry of all available lint rules
pub struct RuleRegistry {
    rules: Vec<Box<dyn LintRule>>,
}

impl RuleRegistry {
    /// Create a new registry with all built-in rules
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(UnknownTypeRule),
                Box::new(UnrenderableRule),
                Box::new(AmbiguousDiscriminatorRule),
                Box::new(DuplicateIndexRule),
                Box::new(MalformedTemplateRule),
                Box::new(ConfigNotObjectRule),
            ],
        }
    }

    /// Get all registered rules
    pub fn rules(&self) -> &[Box<dyn LintRule>] {
        &self.rules
    }

    /// Create an empty registry
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Add a custom rule to the registry
    pub fn add_rule(&mut self, rule: Box<dyn LintRule>) {
        self.rules.push(rule);
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &format!("{} rules", self.rules.len()))
            .finish()
    }
}

#[cfg(test)]
pub(crate) fn cx(location: &str) -> RuleContext<'_> {
    RuleContext {
        location,
        known_types: None,
    }
}
