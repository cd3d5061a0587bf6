//! Column-level predicate evaluation.
//!
//! A predicate compares every cell of one column against an operand and
//! yields a boolean mask over the batch's rows. Predicates never mutate the
//! batch; the resolver combines masks and writes annotations.

use serde::{Deserialize, Serialize};
use tracing::warn;

use claimsift_core::{CellValue, ClaimBatch};

use crate::error::{EngineError, Result};

/// Row mask; index = row position in the batch.
pub type Mask = Vec<bool>;

// ── Condition model ─────────────────────────────────────────────────

/// Operand carried by a predicate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Operand {
    Number(f64),
    Text(String),
    Flag(bool),
    List(Vec<String>),
}

impl Operand {
    /// Canonical text form, matching [`CellValue`]'s display rules so that
    /// equality tests compare like with like.
    fn canonical(&self) -> String {
        match self {
            Operand::Number(n) => n.to_string(),
            Operand::Text(s) => s.clone(),
            Operand::Flag(b) => b.to_string(),
            Operand::List(items) => items.join("; "),
        }
    }
}

/// A single comparison applied to every cell of one column.
///
/// The comparator dictates the operand shape it can use: threshold
/// comparators need a number, membership tests need a list. A mismatched
/// pair is representable on purpose — rule definitions arrive as data — and
/// evaluates to an all-false mask with a warning rather than an error, so
/// one bad condition cannot take down the batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    Gte(Operand),
    Lte(Operand),
    Gt(Operand),
    Lt(Operand),
    Eq(Operand),
    Neq(Operand),
    IsIn(Operand),
    NotIn(Operand),
    NotNa,
}

impl Predicate {
    pub fn gte(value: f64) -> Self {
        Predicate::Gte(Operand::Number(value))
    }

    pub fn lte(value: f64) -> Self {
        Predicate::Lte(Operand::Number(value))
    }

    pub fn gt(value: f64) -> Self {
        Predicate::Gt(Operand::Number(value))
    }

    pub fn lt(value: f64) -> Self {
        Predicate::Lt(Operand::Number(value))
    }

    pub fn eq_text(value: impl Into<String>) -> Self {
        Predicate::Eq(Operand::Text(value.into()))
    }

    pub fn neq_text(value: impl Into<String>) -> Self {
        Predicate::Neq(Operand::Text(value.into()))
    }

    pub fn eq_flag(value: bool) -> Self {
        Predicate::Eq(Operand::Flag(value))
    }

    pub fn is_in<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Predicate::IsIn(Operand::List(values.into_iter().map(Into::into).collect()))
    }

    pub fn not_in<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Predicate::NotIn(Operand::List(values.into_iter().map(Into::into).collect()))
    }

    pub fn not_na() -> Self {
        Predicate::NotNa
    }
}

/// Extra conditions on one column: every predicate must hold.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtraCondition {
    pub column: String,
    pub predicates: Vec<Predicate>,
}

impl ExtraCondition {
    pub fn new(column: impl Into<String>, predicates: Vec<Predicate>) -> Self {
        Self {
            column: column.into(),
            predicates,
        }
    }

    pub fn single(column: impl Into<String>, predicate: Predicate) -> Self {
        Self::new(column, vec![predicate])
    }
}

// ── Evaluation ──────────────────────────────────────────────────────

/// Evaluate one predicate against one column.
///
/// A missing column is an error so the caller can no-op the whole rule;
/// a comparator/operand mismatch only degrades this predicate to all-false.
pub fn predicate_mask(batch: &ClaimBatch, column: &str, predicate: &Predicate) -> Result<Mask> {
    let cells = batch
        .column(column)
        .ok_or_else(|| EngineError::MissingColumn(column.to_string()))?;

    let mask = match predicate {
        Predicate::Gte(op) => numeric_mask(cells, op, column, "gte", |cell, v| cell >= v),
        Predicate::Lte(op) => numeric_mask(cells, op, column, "lte", |cell, v| cell <= v),
        Predicate::Gt(op) => numeric_mask(cells, op, column, "gt", |cell, v| cell > v),
        Predicate::Lt(op) => numeric_mask(cells, op, column, "lt", |cell, v| cell < v),
        Predicate::Eq(op) => {
            let expected = op.canonical();
            cells
                .iter()
                .map(|cell| !cell.is_null() && cell.to_string() == expected)
                .collect()
        }
        Predicate::Neq(op) => {
            let expected = op.canonical();
            cells
                .iter()
                .map(|cell| cell.is_null() || cell.to_string() != expected)
                .collect()
        }
        Predicate::IsIn(op) => membership_mask(cells, op, column, "is_in", false),
        Predicate::NotIn(op) => membership_mask(cells, op, column, "not_in", true),
        Predicate::NotNa => cells.iter().map(|cell| !cell.is_null()).collect(),
    };
    Ok(mask)
}

/// AND together every predicate of every extra condition.
///
/// The seed is all-true, so an empty condition list matches every row.
pub fn extra_conditions_mask(batch: &ClaimBatch, conditions: &[ExtraCondition]) -> Result<Mask> {
    let mut mask = vec![true; batch.row_count()];
    for condition in conditions {
        for predicate in &condition.predicates {
            let part = predicate_mask(batch, &condition.column, predicate)?;
            for (acc, hit) in mask.iter_mut().zip(&part) {
                *acc &= hit;
            }
        }
    }
    Ok(mask)
}

fn numeric_mask(
    cells: &[CellValue],
    operand: &Operand,
    column: &str,
    comparator: &str,
    cmp: impl Fn(f64, f64) -> bool,
) -> Mask {
    let Operand::Number(value) = operand else {
        warn!(
            column = %column,
            comparator = comparator,
            "non-numeric operand for threshold comparison; matching nothing"
        );
        return vec![false; cells.len()];
    };
    cells
        .iter()
        .map(|cell| cell.as_number().map(|n| cmp(n, *value)).unwrap_or(false))
        .collect()
}

fn membership_mask(
    cells: &[CellValue],
    operand: &Operand,
    column: &str,
    comparator: &str,
    negate: bool,
) -> Mask {
    let Operand::List(values) = operand else {
        warn!(
            column = %column,
            comparator = comparator,
            "membership test requires a list operand; matching nothing"
        );
        return vec![false; cells.len()];
    };
    cells
        .iter()
        .map(|cell| {
            let hit = values.iter().any(|v| cell.matches_str(v));
            if negate {
                !hit
            } else {
                hit
            }
        })
        .collect()
}

// ── Tests ───────────────────────────────────────────────────────────
