//! Provider- and member-specific screens.

use claimsift_core::{columns, ClaimBatch};

use crate::condition::{ExtraCondition, Predicate};
use crate::error::{EngineError, Result};
use crate::resolver::{resolve, TriggerSpec};

use super::{contains_all, resolve_with_flag};

const PAP_SMEAR_CODES: &[&str] = &[
    "88141", "88142", "88143", "88147", "88148", "88150", "88152", "88153", "88155", "88164",
    "88165", "88166", "88167", "88174", "88175", "88177",
];

/// PAP smear screening is routinely covered at these providers; their rows
/// are exempt from the age screen.
const PAP_SMEAR_EXEMPT_PROVIDERS: &[&str] = &[
    "AL EMADI HOSPITAL",
    "AL EMADI HOSPITAL CLINICS - NORTH",
];

/// PAP smear outside the screening age band of 24 to 65.
pub(super) fn pap_smear_age_outside_band(batch: ClaimBatch) -> Result<ClaimBatch> {
    let ages = batch
        .column(columns::MEMBER_AGE)
        .ok_or_else(|| EngineError::MissingColumn(columns::MEMBER_AGE.to_string()))?;
    let outside_band: Vec<bool> = ages
        .iter()
        .map(|cell| {
            cell.as_number()
                .map(|age| age < 24.0 || age > 65.0)
                .unwrap_or(false)
        })
        .collect();
    let spec = TriggerSpec::new("PAP Smear Age Restriction")
        .include(columns::ACTIVITY_CODE, PAP_SMEAR_CODES.iter().copied())
        .exclude(
            columns::PROVIDER_NAME,
            PAP_SMEAR_EXEMPT_PROVIDERS.iter().copied(),
        )
        .when(ExtraCondition::single(
            "AGE_OUTSIDE_24_65",
            Predicate::eq_flag(true),
        ));
    resolve_with_flag(batch, "AGE_OUTSIDE_24_65", &outside_band, &spec)
}

/// Contradictory sibling of [`pap_smear_age_outside_band`]: the same trigger
/// written as `lte 24 AND gte 64` on the age column, which no single value
/// can satisfy. Registered inactive until the rule owner confirms which
/// reading is intended.
pub(super) fn pap_smear_age_band_conjunction(batch: ClaimBatch) -> Result<ClaimBatch> {
    let spec = TriggerSpec::new("PAP Smear Age Restriction")
        .include(columns::ACTIVITY_CODE, PAP_SMEAR_CODES.iter().copied())
        .exclude(
            columns::PROVIDER_NAME,
            PAP_SMEAR_EXEMPT_PROVIDERS.iter().copied(),
        )
        .when(ExtraCondition::new(
            columns::MEMBER_AGE,
            vec![Predicate::lte(24.0), Predicate::gte(64.0)],
        ));
    Ok(resolve(batch, &spec))
}

pub(super) fn gardenia_large_dressing(batch: ClaimBatch) -> Result<ClaimBatch> {
    let large_dressing = contains_all(
        &batch,
        columns::ACTIVITY_INTERNAL_DESCRIPTION,
        &["dressing large"],
    )?;
    let spec = TriggerSpec::new("Gardenia-Large Dressing not covered")
        .when(ExtraCondition::single(
            "_large_dressing_flag",
            Predicate::eq_flag(true),
        ))
        .when(ExtraCondition::single(
            columns::PROVIDER_NAME,
            Predicate::eq_text("GARDENIA MEDICAL CENTER"),
        ));
    resolve_with_flag(batch, "_large_dressing_flag", &large_dressing, &spec)
}

pub(super) fn sidra_medical_male(batch: ClaimBatch) -> Result<ClaimBatch> {
    let at_sidra = contains_all(&batch, columns::PROVIDER_NAME, &["sidra medical"])?;
    let spec = TriggerSpec::new("Sidra Medical Male Above 17 Years")
        .when(ExtraCondition::single(
            "_sidra_medical_flag",
            Predicate::eq_flag(true),
        ))
        .when(ExtraCondition::single(columns::MEMBER_AGE, Predicate::gt(17.0)))
        .when(ExtraCondition::single(
            columns::GENDER,
            Predicate::eq_text("Male"),
        ));
    resolve_with_flag(batch, "_sidra_medical_flag", &at_sidra, &spec)
}
