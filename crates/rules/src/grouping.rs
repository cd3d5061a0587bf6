//! Cross-row grouping rules.
//!
//! Some triggers depend on code co-occurrence inside one claim or
//! pre-authorization rather than on a single row: a CRP billed alongside an
//! ESR, a serum pregnancy test next to a urine one. [`group_flag`] buckets
//! rows by a group key, finds configured code pairs inside each bucket, and
//! annotates per [`PairScope`].

use std::collections::{HashMap, HashSet};

use tracing::{info, warn};

use claimsift_core::{columns, ClaimBatch};

use crate::resolver::append_where;

// ── Group keys ──────────────────────────────────────────────────────

/// Usable identifier in `column` at `row`: trimmed, non-empty, not a
/// spreadsheet "nan" artifact.
fn identifier(batch: &ClaimBatch, row: usize, column: &str) -> Option<String> {
    let cell = batch.cell(row, column)?;
    if cell.is_null() {
        return None;
    }
    let text = cell.to_string().trim().to_string();
    if text.is_empty() || text.eq_ignore_ascii_case("nan") {
        None
    } else {
        Some(text)
    }
}

/// Group key for one row: pre-auth number if usable, else claim number,
/// else the shared empty bucket.
///
/// Rows with neither identifier all land in one bucket and can therefore
/// pair with each other; use [`strict_claim_group_key`] to keep such rows
/// out of grouping instead.
pub fn claim_group_key(batch: &ClaimBatch, row: usize) -> Option<String> {
    Some(
        identifier(batch, row, columns::PRE_AUTH_NUMBER)
            .or_else(|| identifier(batch, row, columns::CLAIM_NUMBER))
            .unwrap_or_default(),
    )
}

/// Like [`claim_group_key`], but rows with no usable identifier are
/// excluded from grouping entirely.
pub fn strict_claim_group_key(batch: &ClaimBatch, row: usize) -> Option<String> {
    identifier(batch, row, columns::PRE_AUTH_NUMBER)
        .or_else(|| identifier(batch, row, columns::CLAIM_NUMBER))
}

// ── Pair flagging ───────────────────────────────────────────────────

/// Which rows of a group receive the trigger once a pair co-occurs in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairScope {
    /// Only rows whose own code belongs to a pair that matched in the group.
    MatchedPairOnly,
    /// Every row of the group whose code appears in any configured pair.
    AnyPairCode,
}

/// Annotate rows whose group contains both codes of a configured pair.
///
/// Every pair is checked in every group; when several pairs match one group,
/// their codes all count. Rows whose `key_fn` returns None take no part.
/// Missing identifier columns make this a warned no-op, like the resolver's
/// missing-column behavior.
pub fn group_flag<F>(
    mut batch: ClaimBatch,
    trigger: &str,
    code_pairs: &[(&str, &str)],
    scope: PairScope,
    key_fn: F,
) -> ClaimBatch
where
    F: Fn(&ClaimBatch, usize) -> Option<String>,
{
    let rows = batch.row_count();
    let codes: Vec<String> = match batch.column(columns::ACTIVITY_CODE) {
        Some(cells) => cells.iter().map(|cell| cell.to_string()).collect(),
        None => {
            warn!(trigger = %trigger, column = columns::ACTIVITY_CODE, "column not present; skipping rule");
            return batch;
        }
    };
    if !batch.has_column(columns::PRE_AUTH_NUMBER) && !batch.has_column(columns::CLAIM_NUMBER) {
        warn!(
            trigger = %trigger,
            "neither pre-auth nor claim number column present; skipping rule"
        );
        return batch;
    }

    let keys: Vec<Option<String>> = (0..rows).map(|row| key_fn(&batch, row)).collect();

    let mut group_codes: HashMap<&str, HashSet<&str>> = HashMap::new();
    for (key, code) in keys.iter().zip(&codes) {
        if let Some(key) = key {
            group_codes.entry(key.as_str()).or_default().insert(code.as_str());
        }
    }

    // Codes of every pair that co-occurs, per group.
    let mut matched: HashMap<&str, HashSet<&str>> = HashMap::new();
    for (key, present) in &group_codes {
        let mut hits: HashSet<&str> = HashSet::new();
        for &(a, b) in code_pairs {
            if present.contains(a) && present.contains(b) {
                hits.insert(a);
                hits.insert(b);
            }
        }
        if !hits.is_empty() {
            matched.insert(*key, hits);
        }
    }

    let universe: HashSet<&str> = code_pairs.iter().flat_map(|(a, b)| [*a, *b]).collect();
    let mask: Vec<bool> = (0..rows)
        .map(|row| {
            let Some(key) = keys[row].as_deref() else {
                return false;
            };
            let Some(hits) = matched.get(key) else {
                return false;
            };
            match scope {
                PairScope::MatchedPairOnly => hits.contains(codes[row].as_str()),
                PairScope::AnyPairCode => universe.contains(codes[row].as_str()),
            }
        })
        .collect();

    let flagged = mask.iter().filter(|hit| **hit).count();
    append_where(&mut batch, &mask, trigger);
    info!(trigger = %trigger, groups = matched.len(), flagged, "grouping rule applied");
    batch
}

// ── Tests ───────────────────────────────────────────────────────────
