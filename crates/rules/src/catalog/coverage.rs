//! Payability checks: age gates, pre-auth presence, named drugs.

use claimsift_core::{columns, ClaimBatch};

use crate::condition::{ExtraCondition, Predicate};
use crate::error::Result;
use crate::resolver::{resolve, TriggerSpec};

use super::{code_mask, contains_any, mask_or, resolve_with_flag};

/// Biopsy and aspiration procedures that require prior authorization.
const BIOPSY_CODES: &[&str] = &[
    "11101", "11102", "11103", "11104", "11105", "11106", "11107", "19081", "19082", "19083",
    "19084", "19085", "19086", "19100", "19101", "19102", "19103", "47000", "47001", "47100",
    "32400", "32402", "32405", "32408", "32607", "32608", "32609", "32096", "32097", "32098",
    "55700", "55705", "55706", "50200", "50205", "43239", "45380", "44389", "20220", "20225",
    "20240", "20245", "20250", "20251", "38220", "38221", "38222", "38500", "38505", "38510",
    "38520", "38525", "38530", "38531",
];

const ONDANSETRON_CODES: &[&str] = &[
    "0000-000000-003766",
    "0000-000000-002029",
    "0000-000000-003721",
    "0000-000000-002030",
    "0000-000000-003394",
    "0000-000000-003395",
    "0000-000000-003209",
    "0000-000000-003211",
    "0000-000000-003210",
    "0000-000000-003212",
    "6639-627604-1161",
    "0000-000000-001584",
    "0000-000000-001586",
    "0006-238802-1172-1",
    "0006-238802-1172-2",
    "0006-238803-1171",
    "0006-238803-1171-A",
    "0063-238801-0511",
    "0006-238804-2481",
    "0006-238802-1173",
    "0050-238802-1171",
    "0063-238801-0511-A",
];

const ONDANSETRON_BRANDS: &[&str] = &[
    "Ondansetron",
    "zofran",
    "Vomiran",
    "Vominor",
    "Vomet",
    "Ondavell",
    "Ondan",
    "Kromafina",
    "Zoron",
    "Emeset",
];

pub(super) fn desensitization(batch: ClaimBatch) -> Result<ClaimBatch> {
    let spec = TriggerSpec::new("Desensitization")
        .include(columns::ACTIVITY_CODE, ["D9910"])
        .when(ExtraCondition::single(columns::MEMBER_AGE, Predicate::gt(18.0)));
    Ok(resolve(batch, &spec))
}

pub(super) fn h_pylori_antibody(batch: ClaimBatch) -> Result<ClaimBatch> {
    let spec = TriggerSpec::new("H-Pylori Antibody not covered")
        .include(columns::ACTIVITY_CODE, ["86677"]);
    Ok(resolve(batch, &spec))
}

pub(super) fn ondansetron_cancer_only(batch: ClaimBatch) -> Result<ClaimBatch> {
    let by_code = code_mask(&batch, columns::ACTIVITY_CODE, ONDANSETRON_CODES)?;
    let by_brand = contains_any(
        &batch,
        columns::ACTIVITY_INTERNAL_DESCRIPTION,
        ONDANSETRON_BRANDS,
    )?;
    let spec = TriggerSpec::new("Ondansetron - Payable only in Cancer ICDs.")
        .when(ExtraCondition::single("_ondansetron", Predicate::eq_flag(true)));
    resolve_with_flag(batch, "_ondansetron", &mask_or(&by_code, &by_brand), &spec)
}

pub(super) fn wegovy_not_payable(batch: ClaimBatch) -> Result<ClaimBatch> {
    let spec = TriggerSpec::new("WEGOVY - Not Payable").include(
        columns::ACTIVITY_CODE,
        [
            "0000-000000-003378",
            "0000-000000-003379",
            "0000-000000-003380",
            "0000-000000-003423",
            "0000-000000-003381",
        ],
    );
    Ok(resolve(batch, &spec))
}

pub(super) fn ozempic_verify_dm(batch: ClaimBatch) -> Result<ClaimBatch> {
    let spec = TriggerSpec::new("OZEMPIC - To verify DM history and approve").include(
        columns::ACTIVITY_CODE,
        ["4788-782701-1021", "4788-782701-1023", "4788-782701-1025"],
    );
    Ok(resolve(batch, &spec))
}

/// Flags biopsy lines that carry a pre-auth number, exactly as recorded in
/// the adjudication worksheet.
pub(super) fn biopsy_preauth_present(batch: ClaimBatch) -> Result<ClaimBatch> {
    let spec = TriggerSpec::new("Service not payable without Preauth")
        .include(columns::ACTIVITY_CODE, BIOPSY_CODES.iter().copied())
        .when(ExtraCondition::single(
            columns::PRE_AUTH_NUMBER,
            Predicate::not_na(),
        ));
    Ok(resolve(batch, &spec))
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
    fn desensitization_gates_on_age_over_18() {
        let mut batch = ClaimBatch::new();
        batch
            .insert_column(
                columns::ACTIVITY_CODE,
                vec![text("D9910"), text("D9910"), text("D9910")],
            )
            .unwrap();
        batch
            .insert_column(
                columns::MEMBER_AGE,
                vec![
                    CellValue::Integer(30),
                    CellValue::Integer(18),
                    CellValue::Null,
                ],
            )
            .unwrap();

        let batch = desensitization(batch).unwrap();
        assert_eq!(labels(&batch, 0), vec!["Desensitization"]);
        assert!(labels(&batch, 1).is_empty(), "18 is not over 18");
        assert!(labels(&batch, 2).is_empty(), "unknown age never matches");
    }

    #[test]
    fn biopsy_rule_requires_a_usable_preauth_cell() {
        let mut batch = ClaimBatch::new();
        batch
            .insert_column(
                columns::ACTIVITY_CODE,
                vec![text("11101"), text("11101"), text("99999")],
            )
            .unwrap();
        batch
            .insert_column(
                columns::PRE_AUTH_NUMBER,
                vec![text("PA-100"), CellValue::Null, text("PA-101")],
            )
            .unwrap();

        let batch = biopsy_preauth_present(batch).unwrap();
        assert_eq!(labels(&batch, 0), vec!["Service not payable without Preauth"]);
        assert!(labels(&batch, 1).is_empty());
        assert!(labels(&batch, 2).is_empty());
    }

    #[test]
    fn ondansetron_brand_match_is_case_insensitive() {
        let mut batch = ClaimBatch::new();
        batch
            .insert_column(columns::ACTIVITY_CODE, vec![text("x"), text("y")])
            .unwrap();
        batch
            .insert_column(
                columns::ACTIVITY_INTERNAL_DESCRIPTION,
                vec![text("EMESET 8MG"), text("ORS sachets")],
            )
            .unwrap();

        let batch = ondansetron_cancer_only(batch).unwrap();
        assert_eq!(
            labels(&batch, 0),
            vec!["Ondansetron - Payable only in Cancer ICDs."]
        );
        assert!(labels(&batch, 1).is_empty());
        assert!(!batch.has_column("_ondansetron"));
    }
}
