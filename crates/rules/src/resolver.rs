//! Inclusion/exclusion resolution and annotation writing.
//!
//! Most rules are a [`TriggerSpec`]: an inclusion code list, an exclusion
//! code list, and extra conditions, resolved in one pass to a row mask and
//! appended to the annotation column. Trigger labels land verbatim in the
//! reviewer-facing output, so they are free text, not identifiers.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use claimsift_core::{CellValue, ClaimBatch, ANNOTATION_COLUMN};

use crate::condition::{extra_conditions_mask, ExtraCondition};

// ── Trigger specification ───────────────────────────────────────────

/// Declarative flagging criteria for one rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TriggerSpec {
    /// Label appended to matching rows' annotation lists.
    pub trigger: String,
    /// Values of `inclusion_column` that put a row in scope.
    pub inclusion: Vec<String>,
    pub inclusion_column: Option<String>,
    /// Values of `exclusion_column` that take a row back out of scope.
    pub exclusion: Vec<String>,
    pub exclusion_column: Option<String>,
    /// Additional per-column conditions, AND-ed with the lists above.
    pub extra: Vec<ExtraCondition>,
}

impl TriggerSpec {
    pub fn new(trigger: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into(),
            ..Self::default()
        }
    }

    pub fn include<I, S>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inclusion_column = Some(column.to_string());
        self.inclusion = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn exclude<I, S>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclusion_column = Some(column.to_string());
        self.exclusion = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn when(mut self, condition: ExtraCondition) -> Self {
        self.extra.push(condition);
        self
    }

    fn has_criteria(&self) -> bool {
        !self.inclusion.is_empty() || !self.exclusion.is_empty() || !self.extra.is_empty()
    }
}

// ── Resolution ──────────────────────────────────────────────────────

/// Resolve a spec against the batch and annotate matching rows.
///
/// Degradations are deliberate no-ops, not errors: a spec with no criteria,
/// or one referencing a column the upload lacks, logs a warning and returns
/// the batch unchanged so the rest of the rule pass proceeds.
pub fn resolve(mut batch: ClaimBatch, spec: &TriggerSpec) -> ClaimBatch {
    if !spec.has_criteria() {
        warn!(trigger = %spec.trigger, "no inclusion, exclusion, or extra conditions; skipping");
        return batch;
    }
    let rows = batch.row_count();
    let mut included = vec![true; rows];
    let mut not_excluded = vec![true; rows];
    let mut extra = vec![true; rows];

    if !spec.inclusion.is_empty() {
        let Some(cells) = spec
            .inclusion_column
            .as_deref()
            .and_then(|name| batch.column(name))
        else {
            warn!(
                trigger = %spec.trigger,
                column = spec.inclusion_column.as_deref().unwrap_or("(unset)"),
                "inclusion column not present; skipping rule"
            );
            return batch;
        };
        included = cells
            .iter()
            .map(|cell| spec.inclusion.iter().any(|v| cell.matches_str(v)))
            .collect();
    }

    if !spec.extra.is_empty() {
        extra = match extra_conditions_mask(&batch, &spec.extra) {
            Ok(mask) => mask,
            Err(err) => {
                warn!(trigger = %spec.trigger, error = %err, "extra conditions not evaluable; skipping rule");
                return batch;
            }
        };
    }

    if !spec.exclusion.is_empty() {
        let Some(cells) = spec
            .exclusion_column
            .as_deref()
            .and_then(|name| batch.column(name))
        else {
            warn!(
                trigger = %spec.trigger,
                column = spec.exclusion_column.as_deref().unwrap_or("(unset)"),
                "exclusion column not present; skipping rule"
            );
            return batch;
        };
        not_excluded = cells
            .iter()
            .map(|cell| spec.exclusion.iter().all(|v| !cell.matches_str(v)))
            .collect();
    }

    let mask: Vec<bool> = (0..rows)
        .map(|row| included[row] && not_excluded[row] && extra[row])
        .collect();
    let matched = mask.iter().filter(|hit| **hit).count();
    append_where(&mut batch, &mask, &spec.trigger);
    info!(trigger = %spec.trigger, matched, "rule applied");
    batch
}

/// Append `trigger` to the annotation list of every mask-true row.
///
/// The annotation column is created on demand, and a non-list cell is
/// replaced by a fresh list before appending, so the column is list-typed
/// in every row afterwards regardless of input state.
pub fn append_where(batch: &mut ClaimBatch, mask: &[bool], trigger: &str) {
    if !batch.has_column(ANNOTATION_COLUMN) {
        batch.fill_column(ANNOTATION_COLUMN, CellValue::List(Vec::new()));
    }
    let Some(cells) = batch.column_mut(ANNOTATION_COLUMN) else {
        return;
    };
    for (cell, hit) in cells.iter_mut().zip(mask) {
        if !hit {
            continue;
        }
        match cell {
            CellValue::List(labels) => labels.push(trigger.to_string()),
            other => *other = CellValue::List(vec![trigger.to_string()]),
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use claimsift_core::columns;
    use crate::condition::Predicate;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn labels(batch: &ClaimBatch, row: usize) -> Vec<String> {
        match batch.cell(row, ANNOTATION_COLUMN) {
            Some(CellValue::List(items)) => items.clone(),
            other => panic!("annotation cell at row {} is not a list: {:?}", row, other),
        }
    }

    fn code_batch(codes: &[&str]) -> ClaimBatch {
        let mut batch = ClaimBatch::new();
        batch
            .insert_column(
                columns::ACTIVITY_CODE,
                codes.iter().map(|c| text(c)).collect(),
            )
            .unwrap();
        batch
    }

    #[test]
    fn no_criteria_is_a_no_op() {
        let batch = code_batch(&["86689"]);
        let before = batch.clone();
        let after = resolve(batch, &TriggerSpec::new("Empty"));
        assert_eq!(after, before);
        assert!(!after.has_column(ANNOTATION_COLUMN));
    }

    #[test]
    fn missing_inclusion_column_is_a_no_op() {
        let batch = code_batch(&["86689"]);
        let before = batch.clone();
        let spec = TriggerSpec::new("Ghost").include("NO_SUCH_COLUMN", ["86689"]);
        let after = resolve(batch, &spec);
        assert_eq!(after, before);
    }

    #[test]
    fn missing_extra_column_is_a_no_op() {
        let batch = code_batch(&["86689"]);
        let before = batch.clone();
        let spec = TriggerSpec::new("Ghost")
            .include(columns::ACTIVITY_CODE, ["86689"])
            .when(ExtraCondition::single("NO_SUCH_COLUMN", Predicate::gt(1.0)));
        let after = resolve(batch, &spec);
        assert_eq!(after, before);
    }

    #[test]
    fn inclusion_and_exclusion_combine() {
        let mut batch = code_batch(&["86689", "86689", "99999"]);
        batch
            .insert_column(
                columns::BENEFIT_TYPE,
                vec![text("INPATIENT"), text("OUT-PATIENT MATERNITY"), text("INPATIENT")],
            )
            .unwrap();
        let spec = TriggerSpec::new("General exclusion - HIV")
            .include(columns::ACTIVITY_CODE, ["86689"])
            .exclude(columns::BENEFIT_TYPE, ["OUT-PATIENT MATERNITY"]);
        let batch = resolve(batch, &spec);

        assert_eq!(labels(&batch, 0), vec!["General exclusion - HIV"]);
        assert!(labels(&batch, 1).is_empty());
        assert!(labels(&batch, 2).is_empty());
    }

    #[test]
    fn append_where_replaces_non_list_cells() {
        let mut batch = ClaimBatch::new();
        batch
            .insert_column(ANNOTATION_COLUMN, vec![text("junk"), CellValue::Null])
            .unwrap();
        append_where(&mut batch, &[true, true], "T");
        assert_eq!(labels(&batch, 0), vec!["T"]);
        assert_eq!(labels(&batch, 1), vec!["T"]);
    }

    #[test]
    fn append_where_keeps_existing_labels_in_order() {
        let mut batch = code_batch(&["x"]);
        append_where(&mut batch, &[true], "first");
        append_where(&mut batch, &[false], "skipped");
        append_where(&mut batch, &[true], "second");
        assert_eq!(labels(&batch, 0), vec!["first", "second"]);
    }
}
