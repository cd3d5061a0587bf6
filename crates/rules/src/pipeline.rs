//! Batch orchestration: annotation init plus the full rule pass.

use tracing::info;

use claimsift_core::{CellValue, ClaimBatch, ANNOTATION_COLUMN};

use crate::registry::RuleRegistry;

/// Run the complete adjudication pass over a batch.
///
/// The annotation column is (re)initialized to an empty list in every row,
/// then the batch is folded through the registry. Row count and row order
/// are preserved end to end; every input column survives to the output.
pub fn process(mut batch: ClaimBatch, registry: &RuleRegistry) -> ClaimBatch {
    batch.fill_column(ANNOTATION_COLUMN, CellValue::List(Vec::new()));
    info!(
        rows = batch.row_count(),
        rules = registry.active_count(),
        "starting rule pass"
    );
    registry.run_all(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::resolver::append_where;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn annotation_column_is_reset_before_the_pass() {
        let mut batch = ClaimBatch::new();
        batch.insert_column("A", vec![text("x")]).unwrap();
        batch
            .insert_column(ANNOTATION_COLUMN, vec![text("stale")])
            .unwrap();

        let out = process(batch, &RuleRegistry::new());
        assert_eq!(
            out.cell(0, ANNOTATION_COLUMN),
            Some(&CellValue::List(Vec::new()))
        );
    }

    #[test]
    fn input_columns_and_row_order_survive() {
        let mut batch = ClaimBatch::new();
        batch
            .insert_column("ID", vec![text("r1"), text("r2"), text("r3")])
            .unwrap();

        let mut registry = RuleRegistry::new();
        registry.register("tag_all", true, |mut batch: ClaimBatch| -> Result<ClaimBatch> {
            let mask = vec![true; batch.row_count()];
            append_where(&mut batch, &mask, "T");
            Ok(batch)
        });

        let out = process(batch, &registry);
        assert_eq!(out.row_count(), 3);
        let ids: Vec<_> = (0..3).map(|row| out.cell(row, "ID").cloned()).collect();
        assert_eq!(ids, vec![Some(text("r1")), Some(text("r2")), Some(text("r3"))]);
    }
}
