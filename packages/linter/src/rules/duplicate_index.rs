use crate::diagnostic::Diagnostic;
use crate::rules::{LintRule, RuleContext};
use std::collections::BTreeMap;
use survey_dash_schema::ComponentDescriptor;

/// Lint rule flagging siblings that share an `index`.
///
/// Ties fall back to source order, which is easy to break by reordering JSON.
pub struct DuplicateIndexRule;

impl LintRule for DuplicateIndexRule {
    fn name(&self) -> &'static str {
        "duplicate-index"
    }

    fn description(&self) -> &'static str {
        "Disallow siblings sharing the same index"
    }

    fn check_siblings(&self, siblings: &[ComponentDescriptor], cx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let mut positions: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
        for (position, sibling) in siblings.iter().enumerate() {
            if let Some(index) = sibling.index {
                positions.entry(index).or_default().push(position);
            }
        }

        positions
            .into_iter()
            .filter(|(_, at)| at.len() > 1)
            .map(|(index, at)| {
                let at: Vec<String> = at.iter().map(|p| format!("[{}]", p)).collect();
                Diagnostic::warning(
                    "duplicate-index",
                    format!("Siblings {} share index {}", at.join(", "), index),
                    cx.location,
                )
                .with_suggestion("Give each sibling a distinct index")
            })
            .collect()
    }
}
