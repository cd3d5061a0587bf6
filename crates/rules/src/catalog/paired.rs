//! Code co-occurrence rules over claim/pre-auth groups.

use claimsift_core::ClaimBatch;

use crate::error::Result;
use crate::grouping::{claim_group_key, group_flag, PairScope};

/// CRP (85651/85652) billed together with an ESR (86140/86141) in one
/// claim or pre-auth; only the paired rows are flagged.
pub(super) fn crp_esr_same_claim(batch: ClaimBatch) -> Result<ClaimBatch> {
    const PAIRS: &[(&str, &str)] = &[
        ("85651", "86140"),
        ("85651", "86141"),
        ("85652", "86140"),
        ("85652", "86141"),
    ];
    Ok(group_flag(
        batch,
        "CRP & ESR in Same claim / pre-auth",
        PAIRS,
        PairScope::MatchedPairOnly,
        claim_group_key,
    ))
}

/// Serum beta-HCG (84702-84704) alongside a urine pregnancy test (81025).
/// Once a group matches, every beta-HCG or urine-test row in it is flagged,
/// partnered or not.
pub(super) fn beta_hcg_urine_pregnancy(batch: ClaimBatch) -> Result<ClaimBatch> {
    const PAIRS: &[(&str, &str)] = &[
        ("84702", "81025"),
        ("84703", "81025"),
        ("84704", "81025"),
    ];
    Ok(group_flag(
        batch,
        "Beta HCG + Urine Pregnancy Test",
        PAIRS,
        PairScope::AnyPairCode,
        claim_group_key,
    ))
}
