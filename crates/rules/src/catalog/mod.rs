//! Built-in adjudication rules.
//!
//! Trigger labels and code lists are carried verbatim from the adjudication
//! team's worksheets; labels are reviewer-facing free text, codes are exact
//! strings. Rules live in theme modules:
//! - `exclusions` — general benefit exclusions (HIV, COVID, probiotics, ...)
//! - `quantity` — quantity caps on consultations and dispensed items
//! - `coverage` — payability checks (pre-auth presence, named drugs)
//! - `screening` — provider- and member-specific screens
//! - `paired` — cross-row code co-occurrence within a claim/pre-auth

mod coverage;
mod exclusions;
mod paired;
mod quantity;
mod screening;

use tracing::warn;

use claimsift_core::{CellValue, ClaimBatch};

use crate::condition::Mask;
use crate::error::{EngineError, Result};
use crate::registry::RuleRegistry;
use crate::resolver::{resolve, TriggerSpec};

/// Register every built-in rule. Application order is this declaration
/// order, and the annotation lists preserve it.
pub fn register_builtin(registry: &mut RuleRegistry) {
    registry.register("general_exclusion_hiv", true, exclusions::general_exclusion_hiv);
    registry.register(
        "general_exclusion_zirconium_crown",
        true,
        exclusions::general_exclusion_zirconium_crown,
    );
    registry.register("general_exclusion_covid", true, exclusions::general_exclusion_covid);
    registry.register("hpv_screening", true, exclusions::hpv_screening);
    registry.register("alopecia", true, exclusions::alopecia);
    registry.register("quantity_more_than_one", true, quantity::quantity_more_than_one);
    registry.register("sick_leave", true, exclusions::sick_leave);
    registry.register(
        "pap_smear_age_outside_band",
        true,
        screening::pap_smear_age_outside_band,
    );
    registry.register(
        "pap_smear_age_band_conjunction",
        false,
        screening::pap_smear_age_band_conjunction,
    );
    registry.register("desensitization", true, coverage::desensitization);
    registry.register("zinc_general_exclusion", true, exclusions::zinc_general_exclusion);
    registry.register("betadine_mouth_wash", true, exclusions::betadine_mouth_wash);
    registry.register(
        "cough_syrup_keyword_quantity",
        true,
        quantity::cough_syrup_keyword_quantity,
    );
    registry.register(
        "cough_syrup_listed_quantity",
        false,
        quantity::cough_syrup_listed_quantity,
    );
    registry.register("nasal_spray_quantity", true, quantity::nasal_spray_quantity);
    registry.register("nebulizer_quantity", true, quantity::nebulizer_quantity);
    registry.register("h_pylori_antibody", true, coverage::h_pylori_antibody);
    registry.register("gardenia_large_dressing", true, screening::gardenia_large_dressing);
    registry.register("sidra_medical_male", true, screening::sidra_medical_male);
    registry.register("glucosamine_quantity", true, quantity::glucosamine_quantity);
    registry.register("crp_esr_same_claim", true, paired::crp_esr_same_claim);
    registry.register(
        "general_exclusion_probiotics",
        true,
        exclusions::general_exclusion_probiotics,
    );
    registry.register("ondansetron_cancer_only", true, coverage::ondansetron_cancer_only);
    registry.register("wegovy_not_payable", true, coverage::wegovy_not_payable);
    registry.register("ozempic_verify_dm", true, coverage::ozempic_verify_dm);
    registry.register("biopsy_preauth_present", true, coverage::biopsy_preauth_present);
    registry.register("beta_hcg_urine_pregnancy", true, paired::beta_hcg_urine_pregnancy);
}

// ── Shared helpers ──────────────────────────────────────────────────

/// Case-insensitive substring mask over one column: true where the cell's
/// text contains every needle. Null cells never match.
pub(crate) fn contains_all(batch: &ClaimBatch, column: &str, needles: &[&str]) -> Result<Mask> {
    let cells = batch
        .column(column)
        .ok_or_else(|| EngineError::MissingColumn(column.to_string()))?;
    let needles: Vec<String> = needles.iter().map(|n| n.to_lowercase()).collect();
    Ok(cells
        .iter()
        .map(|cell| {
            if cell.is_null() {
                return false;
            }
            let text = cell.to_string().to_lowercase();
            needles.iter().all(|needle| text.contains(needle))
        })
        .collect())
}

/// Case-insensitive substring mask: true where the cell's text contains at
/// least one needle.
pub(crate) fn contains_any(batch: &ClaimBatch, column: &str, needles: &[&str]) -> Result<Mask> {
    let cells = batch
        .column(column)
        .ok_or_else(|| EngineError::MissingColumn(column.to_string()))?;
    let needles: Vec<String> = needles.iter().map(|n| n.to_lowercase()).collect();
    Ok(cells
        .iter()
        .map(|cell| {
            if cell.is_null() {
                return false;
            }
            let text = cell.to_string().to_lowercase();
            needles.iter().any(|needle| text.contains(needle))
        })
        .collect())
}

/// Exact-match mask against a code list.
pub(crate) fn code_mask(batch: &ClaimBatch, column: &str, codes: &[&str]) -> Result<Mask> {
    let cells = batch
        .column(column)
        .ok_or_else(|| EngineError::MissingColumn(column.to_string()))?;
    Ok(cells
        .iter()
        .map(|cell| codes.iter().any(|code| cell.matches_str(code)))
        .collect())
}

pub(crate) fn mask_or(a: &[bool], b: &[bool]) -> Mask {
    a.iter().zip(b).map(|(x, y)| *x || *y).collect()
}

/// Materialize `mask` as a temporary boolean column, resolve the spec
/// against it, then remove the column again. Working columns never reach
/// the exported batch.
pub(crate) fn resolve_with_flag(
    mut batch: ClaimBatch,
    flag_column: &str,
    mask: &[bool],
    spec: &TriggerSpec,
) -> Result<ClaimBatch> {
    let cells: Vec<CellValue> = mask.iter().map(|hit| CellValue::Boolean(*hit)).collect();
    batch.insert_column(flag_column, cells)?;
    let mut batch = resolve(batch, spec);
    if batch.drop_column(flag_column).is_none() {
        warn!(column = flag_column, "working column vanished during resolve");
    }
    Ok(batch)
}
