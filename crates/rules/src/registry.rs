//! Ordered rule registry and fault-isolating dispatcher.
//!
//! Rules are registered once, in declaration order, and applied as a fold
//! over the batch. A rule that fails or breaks the row-count contract is
//! logged and its effect reverted; the pass continues with the batch as it
//! was before that rule ran.

use serde::Serialize;
use tracing::{debug, error, info, warn};

use claimsift_core::ClaimBatch;

use crate::error::Result;

/// Rule body: consumes the batch, returns the (possibly annotated) batch.
pub type RuleFn = Box<dyn Fn(ClaimBatch) -> Result<ClaimBatch> + Send + Sync>;

pub struct RuleDef {
    pub name: &'static str,
    /// Inactive rules stay registered and listable but are never applied.
    pub active: bool,
    evaluate: RuleFn,
}

/// Listing entry for the CLI and logs.
#[derive(Debug, Clone, Serialize)]
pub struct RuleInfo {
    pub name: &'static str,
    pub active: bool,
}

#[derive(Default)]
pub struct RuleRegistry {
    rules: Vec<RuleDef>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in rule catalog.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        crate::catalog::register_builtin(&mut registry);
        registry
    }

    pub fn register<F>(&mut self, name: &'static str, active: bool, evaluate: F)
    where
        F: Fn(ClaimBatch) -> Result<ClaimBatch> + Send + Sync + 'static,
    {
        if self.rules.iter().any(|rule| rule.name == name) {
            warn!(rule = name, "duplicate rule name registered");
        }
        self.rules.push(RuleDef {
            name,
            active,
            evaluate: Box::new(evaluate),
        });
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.rules.iter().filter(|rule| rule.active).count()
    }

    pub fn infos(&self) -> impl Iterator<Item = RuleInfo> + '_ {
        self.rules.iter().map(|rule| RuleInfo {
            name: rule.name,
            active: rule.active,
        })
    }

    /// Fold the batch through every active rule, in registration order.
    ///
    /// Rules must preserve row count and row order; the batch is snapshotted
    /// before each rule so a misbehaving one can be rolled back.
    pub fn run_all(&self, mut batch: ClaimBatch) -> ClaimBatch {
        for rule in &self.rules {
            if !rule.active {
                debug!(rule = rule.name, "inactive; skipped");
                continue;
            }
            let snapshot = batch.clone();
            let expected_rows = snapshot.row_count();
            batch = match (rule.evaluate)(batch) {
                Ok(next) if next.row_count() == expected_rows => next,
                Ok(next) => {
                    error!(
                        rule = rule.name,
                        got = next.row_count(),
                        expected = expected_rows,
                        "rule changed the row count; reverting its effect"
                    );
                    snapshot
                }
                Err(err) => {
                    error!(rule = rule.name, error = %err, "rule failed; reverting its effect");
                    snapshot
                }
            };
        }
        info!(rules = self.active_count(), rows = batch.row_count(), "rule pass finished");
        batch
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use claimsift_core::{CellValue, ANNOTATION_COLUMN};
    use crate::error::EngineError;
    use crate::resolver::append_where;

    fn one_row_batch() -> ClaimBatch {
        let mut batch = ClaimBatch::new();
        batch
            .insert_column("A", vec![CellValue::Text("x".to_string())])
            .unwrap();
        batch
    }

    fn labeling_rule(label: &'static str) -> impl Fn(ClaimBatch) -> Result<ClaimBatch> {
        move |mut batch: ClaimBatch| {
            let mask = vec![true; batch.row_count()];
            append_where(&mut batch, &mask, label);
            Ok(batch)
        }
    }

    fn labels(batch: &ClaimBatch, row: usize) -> Vec<String> {
        match batch.cell(row, ANNOTATION_COLUMN) {
            Some(CellValue::List(items)) => items.clone(),
            other => panic!("annotation cell is not a list: {:?}", other),
        }
    }

    #[test]
    fn rules_apply_in_registration_order() {
        let mut registry = RuleRegistry::new();
        registry.register("b_rule", true, labeling_rule("B"));
        registry.register("a_rule", true, labeling_rule("A"));

        let out = registry.run_all(one_row_batch());
        assert_eq!(labels(&out, 0), vec!["B", "A"]);
    }

    #[test]
    fn inactive_rules_are_listed_but_not_applied() {
        let mut registry = RuleRegistry::new();
        registry.register("on", true, labeling_rule("on"));
        registry.register("off", false, labeling_rule("off"));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.active_count(), 1);

        let out = registry.run_all(one_row_batch());
        assert_eq!(labels(&out, 0), vec!["on"]);
    }

    #[test]
    fn failing_rule_is_rolled_back_and_the_pass_continues() {
        let mut registry = RuleRegistry::new();
        registry.register("first", true, labeling_rule("first"));
        registry.register("boom", true, |mut batch: ClaimBatch| {
            // Corrupt the batch before failing; the snapshot must win.
            append_where(&mut batch, &[true], "partial");
            Err(EngineError::Failed("boom".to_string()))
        });
        registry.register("last", true, labeling_rule("last"));

        let out = registry.run_all(one_row_batch());
        assert_eq!(labels(&out, 0), vec!["first", "last"]);
    }

    #[test]
    fn row_count_change_is_rolled_back() {
        let mut registry = RuleRegistry::new();
        registry.register("shrink", true, |_batch: ClaimBatch| Ok(ClaimBatch::new()));
        registry.register("after", true, labeling_rule("after"));

        let out = registry.run_all(one_row_batch());
        assert_eq!(out.row_count(), 1);
        assert_eq!(labels(&out, 0), vec!["after"]);
    }
}
