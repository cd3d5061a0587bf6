//! General benefit exclusions.

use tracing::warn;

use claimsift_core::{columns, ClaimBatch};

use crate::condition::{ExtraCondition, Predicate};
use crate::error::Result;
use crate::resolver::{append_where, resolve, TriggerSpec};

use super::{code_mask, contains_all, contains_any, mask_or, resolve_with_flag};

/// Policies on the legacy AK/HC schedules keep several otherwise-excluded
/// benefits; their claims are carved out of the matching rules below.
const ZIRCONIUM_EXEMPT_POLICIES: &[&str] = &[
    "AK/HC/00093/5/1",
    "AK/HC/00093/5/2",
    "AK/HC/00093/5/3",
    "AK/HC/00093/5/4",
    "AK/HC/00093/5/5",
    "AK/HC/00093/5/6",
    "AK/HC/00093/5/7",
    "AK/HC/00143/1/1",
    "AK/HC/00143/0/1",
    "AK/HC/00143/2/1",
    "AK/HC/00153/0/1",
    "AK/HC/00153/1/1",
];

pub(super) fn general_exclusion_hiv(batch: ClaimBatch) -> Result<ClaimBatch> {
    let spec = TriggerSpec::new("General exclusion - HIV")
        .include(columns::ACTIVITY_CODE, ["86689", "86701", "86702"])
        .exclude(columns::BENEFIT_TYPE, ["OUT-PATIENT MATERNITY"]);
    Ok(resolve(batch, &spec))
}

pub(super) fn general_exclusion_zirconium_crown(batch: ClaimBatch) -> Result<ClaimBatch> {
    let spec = TriggerSpec::new("General exclusion-Zirconium Crown")
        .include(columns::ACTIVITY_CODE, ["D2720", "D2750"])
        .exclude(
            columns::POLICY_NUMBER,
            ZIRCONIUM_EXEMPT_POLICIES.iter().copied(),
        );
    Ok(resolve(batch, &spec))
}

pub(super) fn general_exclusion_covid(batch: ClaimBatch) -> Result<ClaimBatch> {
    let spec = TriggerSpec::new("General exclusion-COVID")
        .include(
            columns::PRIMARY_ICD_CODE,
            [
                "U07.1", "U09.9", "Z11.52", "Z20.822", "Z28.310", "Z28.311", "Z86.16",
            ],
        )
        .exclude(
            columns::POLICY_NUMBER,
            [
                "AK/HC/00093/5/1",
                "AK/HC/00093/5/2",
                "AK/HC/00093/5/3",
                "AK/HC/00093/5/4",
                "AK/HC/00093/5/5",
                "AK/HC/00093/5/6",
                "AK/HC/00093/5/7",
            ],
        );
    Ok(resolve(batch, &spec))
}

pub(super) fn hpv_screening(batch: ClaimBatch) -> Result<ClaimBatch> {
    let spec = TriggerSpec::new("General exclusion-HPV SCREENING").include(
        columns::ACTIVITY_CODE,
        ["0096U", "0500T", "0429U", "87623", "87624", "87625", "0354U"],
    );
    Ok(resolve(batch, &spec))
}

pub(super) fn alopecia(batch: ClaimBatch) -> Result<ClaimBatch> {
    let spec = TriggerSpec::new("General exclusion-ALOPECIA").include(
        columns::PRIMARY_ICD_CODE,
        [
            "A51.32", "L63.0", "L63.1", "L63.8", "L63.9", "L64.0", "L64.8", "L64.9", "L65.2",
            "L66.8", "L66.9", "Q84.0", "L66.12", "L66.81", "L66.89",
        ],
    );
    Ok(resolve(batch, &spec))
}

/// Substring screen, not a code list: complaints mentioning sick leave in
/// any casing are flagged directly.
pub(super) fn sick_leave(mut batch: ClaimBatch) -> Result<ClaimBatch> {
    if !batch.has_column(columns::PRESENTING_COMPLAINTS) {
        warn!(column = columns::PRESENTING_COMPLAINTS, "column not present; skipping rule");
        return Ok(batch);
    }
    let mask = contains_all(&batch, columns::PRESENTING_COMPLAINTS, &["sick"])?;
    append_where(&mut batch, &mask, "General exclusion - Sick Leave");
    Ok(batch)
}

pub(super) fn zinc_general_exclusion(batch: ClaimBatch) -> Result<ClaimBatch> {
    let spec = TriggerSpec::new("Zinc-General Exclusion")
        .include(columns::ACTIVITY_CODE, ["84630"])
        .exclude(columns::BENEFIT_TYPE, ["HEALTH CHECK-UP"]);
    Ok(resolve(batch, &spec))
}

pub(super) fn betadine_mouth_wash(batch: ClaimBatch) -> Result<ClaimBatch> {
    let spec = TriggerSpec::new("Betadine Mouth wash")
        .include(columns::ACTIVITY_CODE, ["0000-000000-001427"])
        .exclude(columns::POLICY_NUMBER, ["AK/HC/00156/0/1"]);
    Ok(resolve(batch, &spec))
}

pub(super) fn general_exclusion_probiotics(batch: ClaimBatch) -> Result<ClaimBatch> {
    let by_code = code_mask(
        &batch,
        columns::ACTIVITY_CODE,
        &[
            "0000-000000-000683",
            "0000-000000-001315",
            "2845-133702-2401-B",
            "0170-502203-4021",
            "0000-000000-000682",
        ],
    )?;
    let by_brand = contains_any(
        &batch,
        columns::ACTIVITY_INTERNAL_DESCRIPTION,
        &["ENTEROGERMINA"],
    )?;
    let spec = TriggerSpec::new("General Exclusion-Probiotics")
        .when(ExtraCondition::single("_probiotic", Predicate::eq_flag(true)));
    resolve_with_flag(batch, "_probiotic", &mask_or(&by_code, &by_brand), &spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimsift_core::{CellValue, ANNOTATION_COLUMN};

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn labels(batch: &ClaimBatch, row: usize) -> Vec<String> {
        match batch.cell(row, ANNOTATION_COLUMN) {
            Some(CellValue::List(items)) => items.clone(),
            other => panic!("annotation cell is not a list: {:?}", other),
        }
    }

    #[test]
    fn hiv_rule_respects_the_maternity_carveout() {
        let mut batch = ClaimBatch::new();
        batch
            .insert_column(
                columns::ACTIVITY_CODE,
                vec![text("86689"), text("86689"), text("86701"), text("11111")],
            )
            .unwrap();
        batch
            .insert_column(
                columns::BENEFIT_TYPE,
                vec![
                    text("INPATIENT"),
                    text("OUT-PATIENT MATERNITY"),
                    text("OUT-PATIENT"),
                    text("INPATIENT"),
                ],
            )
            .unwrap();

        let batch = general_exclusion_hiv(batch).unwrap();
        assert_eq!(labels(&batch, 0), vec!["General exclusion - HIV"]);
        assert!(labels(&batch, 1).is_empty());
        assert_eq!(labels(&batch, 2), vec!["General exclusion - HIV"]);
        assert!(labels(&batch, 3).is_empty());
    }

    #[test]
    fn sick_leave_matches_substring_case_insensitively() {
        let mut batch = ClaimBatch::new();
        batch
            .insert_column(
                columns::PRESENTING_COMPLAINTS,
                vec![
                    text("Feeling SICK since morning"),
                    text("headache"),
                    CellValue::Null,
                ],
            )
            .unwrap();

        let batch = sick_leave(batch).unwrap();
        assert_eq!(labels(&batch, 0), vec!["General exclusion - Sick Leave"]);
        assert!(labels(&batch, 1).is_empty());
        assert!(labels(&batch, 2).is_empty());
    }

    #[test]
    fn sick_leave_without_the_column_is_a_no_op() {
        let mut batch = ClaimBatch::new();
        batch
            .insert_column(columns::ACTIVITY_CODE, vec![text("1")])
            .unwrap();
        let before = batch.clone();
        let after = sick_leave(batch).unwrap();
        assert_eq!(after, before);
    }

    #[test]
    fn probiotics_matches_by_code_or_brand_and_drops_its_working_column() {
        let mut batch = ClaimBatch::new();
        batch
            .insert_column(
                columns::ACTIVITY_CODE,
                vec![text("0000-000000-000683"), text("x"), text("y")],
            )
            .unwrap();
        batch
            .insert_column(
                columns::ACTIVITY_INTERNAL_DESCRIPTION,
                vec![
                    text("some item"),
                    text("Enterogermina 2 billion vials"),
                    text("vitamin c"),
                ],
            )
            .unwrap();

        let batch = general_exclusion_probiotics(batch).unwrap();
        assert_eq!(labels(&batch, 0), vec!["General Exclusion-Probiotics"]);
        assert_eq!(labels(&batch, 1), vec!["General Exclusion-Probiotics"]);
        assert!(labels(&batch, 2).is_empty());
        assert!(!batch.has_column("_probiotic"));
    }
}
