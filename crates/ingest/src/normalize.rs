//! Upload normalization.
//!
//! Worksheets arrive as text. The rules compare ages and quantities
//! numerically, so the known columns are coerced up front; unparseable
//! cells become null rather than aborting the batch.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::warn;

use claimsift_core::{columns, CellValue, ClaimBatch};

/// Columns coerced to dates when the upload carries them.
const DATE_COLUMNS: &[&str] = &[
    "MEMBER_INCEPTION_DATE",
    "POLICY_START_DATE",
    "POLICY_END_DATE",
    "RECEIVED_DATE",
    "ADDED_DATE",
    "COMPLETED_DATE",
    "ADMISSION_DATE",
    "DISCHARGE_DATE",
    "DOB",
    "CLAIM_COMPLETED_DATE_TIME",
    "AUDITED DATE",
    "DATE OF LMP(FOR MATERNITY ONLY)",
];

/// Columns coerced to whole numbers when the upload carries them.
const NUMERIC_COLUMNS: &[&str] = &[
    columns::MEMBER_AGE,
    columns::ACTIVITY_QUANTITY_APPROVED,
    "QUANTITY",
];

// Day-first spellings are listed before month-first: regional uploads
// write 07/03/2024 meaning 7 March.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%d-%b-%Y",
    "%Y/%m/%d",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Coerce the date and quantity columns in place. Uploads vary, so absent
/// columns are tolerated; each absent set is reported once.
pub fn normalize(batch: &mut ClaimBatch) {
    let absent = coerce_columns(batch, DATE_COLUMNS, coerce_date);
    if !absent.is_empty() {
        warn!(columns = ?absent, "date columns absent from upload");
    }

    let absent = coerce_columns(batch, NUMERIC_COLUMNS, coerce_quantity);
    if !absent.is_empty() {
        warn!(columns = ?absent, "quantity columns absent from upload");
    }
}

fn coerce_columns(
    batch: &mut ClaimBatch,
    names: &[&'static str],
    coerce: impl Fn(&CellValue) -> CellValue,
) -> Vec<&'static str> {
    let mut absent = Vec::new();
    for &name in names {
        match batch.column_mut(name) {
            Some(cells) => {
                for cell in cells.iter_mut() {
                    *cell = coerce(cell);
                }
            }
            None => absent.push(name),
        }
    }
    absent
}

fn coerce_date(cell: &CellValue) -> CellValue {
    match cell {
        CellValue::Date(_) => cell.clone(),
        CellValue::Text(raw) => match parse_date(raw.trim()) {
            Some(date) => CellValue::Date(date),
            None => CellValue::Null,
        },
        _ => CellValue::Null,
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(stamp) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(stamp.date());
        }
    }
    None
}

/// Quantities and ages land as whole numbers, rounding halves away from
/// zero; the audit worksheets carry them that way.
fn coerce_quantity(cell: &CellValue) -> CellValue {
    match cell {
        CellValue::Integer(_) => cell.clone(),
        CellValue::Float(real) => CellValue::Integer(real.round() as i64),
        CellValue::Text(raw) => {
            let trimmed = raw.trim();
            if let Ok(whole) = trimmed.parse::<i64>() {
                CellValue::Integer(whole)
            } else if let Ok(real) = trimmed.parse::<f64>() {
                CellValue::Integer(real.round() as i64)
            } else {
                CellValue::Null
            }
        }
        _ => CellValue::Null,
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> CellValue {
        CellValue::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn mixed_date_spellings_parse_to_the_same_day() {
        let mut batch = ClaimBatch::new();
        batch
            .insert_column(
                "DOB",
                vec![
                    CellValue::Text("2024-03-07".into()),
                    CellValue::Text("07/03/2024".into()),
                    CellValue::Text("07-Mar-2024".into()),
                    CellValue::Text("2024/03/07".into()),
                    CellValue::Text("not a date".into()),
                ],
            )
            .unwrap();

        normalize(&mut batch);

        for row in 0..4 {
            assert_eq!(batch.cell(row, "DOB"), Some(&date(2024, 3, 7)), "row {row}");
        }
        assert_eq!(batch.cell(4, "DOB"), Some(&CellValue::Null));
    }

    #[test]
    fn datetime_stamps_keep_only_the_date() {
        let mut batch = ClaimBatch::new();
        batch
            .insert_column(
                "CLAIM_COMPLETED_DATE_TIME",
                vec![CellValue::Text("2024-03-07 14:05:00".into())],
            )
            .unwrap();

        normalize(&mut batch);

        assert_eq!(
            batch.cell(0, "CLAIM_COMPLETED_DATE_TIME"),
            Some(&date(2024, 3, 7))
        );
    }

    #[test]
    fn quantities_round_to_whole_numbers() {
        let mut batch = ClaimBatch::new();
        batch
            .insert_column(
                columns::ACTIVITY_QUANTITY_APPROVED,
                vec![
                    CellValue::Text("2".into()),
                    CellValue::Text("2.6".into()),
                    CellValue::Text("junk".into()),
                    CellValue::Float(1.2),
                    CellValue::Null,
                ],
            )
            .unwrap();

        normalize(&mut batch);

        let quantities = batch.column(columns::ACTIVITY_QUANTITY_APPROVED).unwrap();
        assert_eq!(
            quantities,
            &[
                CellValue::Integer(2),
                CellValue::Integer(3),
                CellValue::Null,
                CellValue::Integer(1),
                CellValue::Null,
            ]
        );
    }

    #[test]
    fn absent_columns_leave_the_batch_untouched() {
        let mut batch = ClaimBatch::new();
        batch
            .insert_column(
                columns::ACTIVITY_CODE,
                vec![CellValue::Text("86689".into())],
            )
            .unwrap();
        let before = batch.clone();

        normalize(&mut batch);

        assert_eq!(batch, before);
    }
}
