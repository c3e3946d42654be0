use crate::diagnostic::Diagnostic;
use crate::rules::{RuleContext, RuleRegistry};
use survey_dash_schema::{ComponentDescriptor, SchemaDocument};

/// Options for configuring the linter
#[derive(Debug, Default)]
pub struct LintOptions {
    /// Custom rule registry (uses default if None)
    pub registry: Option<RuleRegistry>,

    /// Component types with a registered handler. Type checks are skipped when None.
    pub known_types: Option<Vec<String>>,
}

/// Lint a schema document and return diagnostics in document order
pub fn lint_schema(document: &SchemaDocument, options: LintOptions) -> Vec<Diagnostic> {
    let registry = options.registry.unwrap_or_default();
    let known_types = options.known_types.as_deref();
    let mut diagnostics = Vec::new();

    for section in &document.sections {
        diagnostics.extend(lint_siblings(
            &section.components,
            &section.id,
            &registry,
            known_types,
        ));
        for subsection in &section.subsections {
            let location = format!("{}.{}", section.id, subsection.id);
            diagnostics.extend(lint_siblings(
                &subsection.components,
                &location,
                &registry,
                known_types,
            ));
        }
    }

    diagnostics
}

/// Lint one list of siblings under `parent`, then each sibling's subtree
fn lint_siblings(
    siblings: &[ComponentDescriptor],
    parent: &str,
    registry: &RuleRegistry,
    known_types: Option<&[String]>,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let list_location = format!("{}.components", parent);
    let cx = RuleContext {
        location: &list_location,
        known_types,
    };
    for rule in registry.rules() {
        diagnostics.extend(rule.check_siblings(siblings, &cx));
    }

    for (position, node) in siblings.iter().enumerate() {
        let location = format!("{}[{}]", list_location, position);
        diagnostics.extend(lint_node(node, &location, registry, known_types));
    }

    diagnostics
}

/// Recursively lint a node and its children
fn lint_node(
    node: &ComponentDescriptor,
    location: &str,
    registry: &RuleRegistry,
    known_types: Option<&[String]>,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let cx = RuleContext {
        location,
        known_types,
    };
    for rule in registry.rules() {
        diagnostics.extend(rule.check_node(node, &cx));
    }

    if node.has_children() {
        diagnostics.extend(lint_siblings(&node.components, location, registry, known_types));
    }

    diagnostics
}
