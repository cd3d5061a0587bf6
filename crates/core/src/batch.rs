use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::BatchError;

/// Typed cell values — all source data arrives as text but we preserve type info.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Date(NaiveDate),
    /// Trigger-label list; only the annotation column carries these.
    List(Vec<String>),
    Null,
}

impl CellValue {
    /// Extract as string, returning None for non-text values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Numeric view for threshold comparisons. Text is not coerced here;
    /// numeric columns are typed during normalization.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Exact text equality against a code-list entry. Null never matches.
    pub fn matches_str(&self, other: &str) -> bool {
        match self {
            CellValue::Text(s) => s == other,
            CellValue::Null => false,
            _ => self.to_string() == other,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Integer(i) => write!(f, "{}", i),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Boolean(b) => write!(f, "{}", b),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            CellValue::List(items) => write!(f, "{}", items.join("; ")),
            CellValue::Null => Ok(()),
        }
    }
}

/// A batch of claim line items: named columns of equal length.
///
/// Rows are identified by position and column insertion order is preserved,
/// so exporting a batch reproduces the upload's column layout plus whatever
/// the rule pass appended.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClaimBatch {
    columns: IndexMap<String, Vec<CellValue>>,
    row_count: usize,
}

impl ClaimBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty batch with a fixed row count, for column-wise construction.
    pub fn with_rows(row_count: usize) -> Self {
        Self {
            columns: IndexMap::new(),
            row_count,
        }
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Option<&[CellValue]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Vec<CellValue>> {
        self.columns.get_mut(name)
    }

    pub fn cell(&self, row: usize, name: &str) -> Option<&CellValue> {
        self.columns.get(name).and_then(|cells| cells.get(row))
    }

    /// Insert or replace a column. The first column of an empty batch fixes
    /// the row count; afterwards lengths must agree.
    pub fn insert_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<CellValue>,
    ) -> Result<(), BatchError> {
        let name = name.into();
        if self.columns.is_empty() && self.row_count == 0 {
            self.row_count = values.len();
        } else if values.len() != self.row_count {
            return Err(BatchError::LengthMismatch {
                column: name,
                got: values.len(),
                expected: self.row_count,
            });
        }
        self.columns.insert(name, values);
        Ok(())
    }

    /// Insert or replace a column with `value` repeated for every row.
    pub fn fill_column(&mut self, name: impl Into<String>, value: CellValue) {
        let values = vec![value; self.row_count];
        self.columns.insert(name.into(), values);
    }

    /// Remove a column, keeping the order of the remaining ones.
    pub fn drop_column(&mut self, name: &str) -> Option<Vec<CellValue>> {
        self.columns.shift_remove(name)
    }

    /// Append one row. Columns the row does not mention get Null; columns the
    /// batch has never seen are created and backfilled with Null.
    pub fn push_row<I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = (String, CellValue)>,
    {
        let row = self.row_count;
        for (name, value) in cells {
            let column = self
                .columns
                .entry(name)
                .or_insert_with(|| vec![CellValue::Null; row]);
            match column.len().cmp(&row) {
                Ordering::Equal => column.push(value),
                // Duplicate name within this row: last one wins.
                Ordering::Greater => column[row] = value,
                Ordering::Less => {
                    column.resize(row, CellValue::Null);
                    column.push(value);
                }
            }
        }
        self.row_count += 1;
        for column in self.columns.values_mut() {
            column.resize(self.row_count, CellValue::Null);
        }
    }
}
