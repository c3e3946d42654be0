mod diagnostic;
mod linter;
mod rules;

pub use diagnostic::{Diagnostic, DiagnosticLevel};
pub use linter::{lint_schema, LintOptions};
pub use rules::{LintRule, RuleContext, RuleRegistry};
