//! Quantity caps on consultations, imaging, and dispensed items.

use claimsift_core::{columns, ClaimBatch};

use crate::condition::{ExtraCondition, Predicate};
use crate::error::Result;
use crate::resolver::{resolve, TriggerSpec};

use super::{code_mask, contains_all, contains_any, mask_or, resolve_with_flag};

/// Consultation, visit, and imaging codes that are payable once per claim.
/// Carried verbatim from the adjudication worksheet, duplicates included.
const SINGLE_QUANTITY_CODES: &[&str] = &[
    "99202", "99203", "99204", "99205", "99211", "99212", "99213", "99214", "99215", "99221",
    "99222", "99223", "99231", "99232", "99233", "99234", "99235", "99236", "99238", "99239",
    "99242", "99243", "99244", "99245", "99252", "99253", "99254", "99255", "99281", "99282",
    "99283", "99284", "99285", "99288", "99291", "99292", "99304", "99305", "99306", "99307",
    "99308", "99309", "99310", "99315", "99316", "99341", "99342", "99344", "99345", "99347",
    "99348", "99349", "99350", "99358", "99359", "99360", "99366", "99367", "99368", "99374",
    "99375", "99377", "99378", "99379", "99380", "99381", "99382", "99383", "99384", "99385",
    "99386", "99387", "99391", "99392", "99393", "99394", "99395", "99396", "99397", "99401",
    "99402", "99403", "99404", "99406", "99407", "99408", "99409", "99411", "99412", "99429",
    "99441", "99442", "99443", "99450", "99455", "99456", "99460", "99461", "99462", "99463",
    "99464", "99465", "99466", "99467", "99468", "99469", "99471", "99472", "99475", "99476",
    "99477", "99478", "99479", "99480", "99499", "99500", "99501", "99502", "99503", "99504",
    "99505", "99506", "99507", "99509", "99510", "99511", "99512", "99600", "99601", "99602",
    "99605", "99606", "99607", "10", "61.08", "D9310", "61.11", "10.01", "9", "63", "11.01",
    "11", "99242", "99241", "61.03", "99253", "99243", "10.02", "22", "D0160", "88321", "21",
    "61.04", "61.01", "61.06", "61.02", "61.07", "61.09", "61.12", "63.01", "63.02", "63.03",
    "63.04", "63.05", "23", "61.05", "9.01", "9.02", "11.02", "13", "70450", "70460", "70470",
    "70480", "70481", "70482", "70486", "70487", "70488", "70490", "70491", "70492", "71250",
    "71260", "71270", "72125", "72126", "72127", "72128", "72129", "72130", "72131", "72132",
    "72133", "74150", "74160", "74170", "74176", "74177", "74178", "72191", "72192", "72193",
    "70496", "70498", "71275", "73706", "74174", "70551", "70552", "70553", "70540", "70542",
    "70543", "72141", "72142", "72156", "72146", "72147", "72157", "72148", "72149", "72158",
    "73218", "73219", "73220", "73721", "73722", "73723", "74181", "74182", "74183", "72195",
    "72196", "72197", "75557", "75561", "77046", "77047", "77048", "77049", "71271", "74712",
    "74713", "75580", "76391", "70544", "70545", "70546", "70547", "70548", "70549", "70554",
    "72194", "72198", "73700", "73701", "73702", "73718", "73719", "74185", "75559", "75563",
    "77011", "77012", "77013", "77014", "77021", "77022",
];

const GLUCOSAMINE_CODES: &[&str] = &[
    "0000-000000-003857",
    "0000-000000-001538",
    "0000-000000-000937",
    "0000-000000-001516",
    "0000-000000-002250",
    "1000-475401-0391",
    "1553-529901-0061",
    "0000-000000-003700",
    "0000-000000-001528",
    "0000-000000-002628",
    "0000-000000-003843",
];

const GLUCOSAMINE_KEYWORDS: &[&str] = &[
    "JOINT PLUS",
    "JOINTPLAN",
    "JOINT PLAN",
    "GLUCOSAMINE",
    "HEALTH WISE",
    "HEALTHWISE",
];

pub(super) fn quantity_more_than_one(batch: ClaimBatch) -> Result<ClaimBatch> {
    let spec = TriggerSpec::new("Quantity More Than 1")
        .include(columns::ACTIVITY_CODE, SINGLE_QUANTITY_CODES.iter().copied())
        .when(ExtraCondition::single(
            columns::ACTIVITY_QUANTITY_APPROVED,
            Predicate::gt(1.0),
        ));
    Ok(resolve(batch, &spec))
}

/// Cough syrups are identified by a description substring; either the
/// internal or the public description may carry it.
pub(super) fn cough_syrup_keyword_quantity(batch: ClaimBatch) -> Result<ClaimBatch> {
    let internal = contains_all(&batch, columns::ACTIVITY_INTERNAL_DESCRIPTION, &["syrup"])?;
    let public = contains_all(&batch, columns::ACTIVITY_DESCRIPTION, &["syrup"])?;
    let spec = TriggerSpec::new("Cough Syrup-Quantity 2")
        .when(ExtraCondition::single("_syrup_flag", Predicate::eq_flag(true)))
        .when(ExtraCondition::single(
            columns::ACTIVITY_QUANTITY_APPROVED,
            Predicate::gt(2.0),
        ));
    resolve_with_flag(batch, "_syrup_flag", &mask_or(&internal, &public), &spec)
}

/// Contradictory sibling of [`cough_syrup_keyword_quantity`]: the same
/// trigger expressed as exact description matching instead of a substring
/// screen. Registered inactive until the rule owner confirms which reading
/// is intended and supplies the definitive description list.
pub(super) fn cough_syrup_listed_quantity(batch: ClaimBatch) -> Result<ClaimBatch> {
    let spec = TriggerSpec::new("Cough Syrup-Quantity 2")
        .include(columns::ACTIVITY_INTERNAL_DESCRIPTION, ["COUGH SYRUP"])
        .when(ExtraCondition::single(
            columns::ACTIVITY_QUANTITY_APPROVED,
            Predicate::gt(2.0),
        ));
    Ok(resolve(batch, &spec))
}

/// Both words must appear in the same description field; "nasal drops" or a
/// spray for some other route must not match.
pub(super) fn nasal_spray_quantity(batch: ClaimBatch) -> Result<ClaimBatch> {
    let internal = contains_all(
        &batch,
        columns::ACTIVITY_INTERNAL_DESCRIPTION,
        &["nasal", "spray"],
    )?;
    let public = contains_all(&batch, columns::ACTIVITY_DESCRIPTION, &["nasal", "spray"])?;
    let spec = TriggerSpec::new("Nasal Spray-Quantity 2")
        .when(ExtraCondition::single("_nasal_spray_flag", Predicate::eq_flag(true)))
        .when(ExtraCondition::single(
            columns::ACTIVITY_QUANTITY_APPROVED,
            Predicate::gt(2.0),
        ));
    resolve_with_flag(batch, "_nasal_spray_flag", &mask_or(&internal, &public), &spec)
}

pub(super) fn nebulizer_quantity(batch: ClaimBatch) -> Result<ClaimBatch> {
    let spec = TriggerSpec::new("Nebulizer- Quantity 1")
        .include(columns::ACTIVITY_CODE, ["94640"])
        .when(ExtraCondition::single(
            columns::ACTIVITY_QUANTITY_APPROVED,
            Predicate::gt(1.0),
        ));
    Ok(resolve(batch, &spec))
}

pub(super) fn glucosamine_quantity(batch: ClaimBatch) -> Result<ClaimBatch> {
    let by_code = code_mask(&batch, columns::ACTIVITY_CODE, GLUCOSAMINE_CODES)?;
    let by_keyword = contains_any(
        &batch,
        columns::ACTIVITY_INTERNAL_DESCRIPTION,
        GLUCOSAMINE_KEYWORDS,
    )?;
    let spec = TriggerSpec::new("Quantity more than 2")
        .when(ExtraCondition::single("_glucosamine_flag", Predicate::eq_flag(true)))
        .when(ExtraCondition::single(
            columns::ACTIVITY_QUANTITY_APPROVED,
            Predicate::gt(2.0),
        ));
    resolve_with_flag(batch, "_glucosamine_flag", &mask_or(&by_code, &by_keyword), &spec)
}
