//! CSV import and export for claim worksheets.
//!
//! Import is forgiving: headers are trimmed, ragged rows are padded or
//! truncated to the header width, and the usual spreadsheet null spellings
//! become null cells. Export renders every cell as text; the annotation
//! list is rendered per [`AnnotationConfig`].

use std::fs::File;
use std::io;
use std::path::Path;

use tracing::info;

use claimsift_core::{AnnotationConfig, AnnotationFormat, CellValue, ClaimBatch};

use crate::error::{IngestError, Result};

/// Cell spellings treated as missing data on import (case-insensitive,
/// after trimming). The empty string counts too.
const NULL_MARKERS: &[&str] = &["none", "null", "nan", "undefined"];

// ── Import ──────────────────────────────────────────────────────────

/// Read a claim worksheet from `path`.
pub fn import_path(path: &Path, delimiter: u8) -> Result<ClaimBatch> {
    let file = File::open(path)?;
    let batch = import_reader(file, delimiter)?;
    info!(
        rows = batch.row_count(),
        path = %path.display(),
        "imported claim worksheet"
    );
    Ok(batch)
}

/// Read a claim worksheet from any reader. Every cell comes in as text or
/// null; [`crate::normalize::normalize`] takes care of dates and quantities.
pub fn import_reader<R: io::Read>(reader: R, delimiter: u8) -> Result<ClaimBatch> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|name| name.trim().to_string())
        .collect();

    let mut batch = ClaimBatch::new();
    for record in reader.records() {
        let record = record?;
        // zip drops fields past the header width; push_row nulls the rest.
        batch.push_row(
            headers
                .iter()
                .zip(record.iter())
                .map(|(name, raw)| (name.clone(), parse_cell(raw))),
        );
    }
    Ok(batch)
}

fn parse_cell(raw: &str) -> CellValue {
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || NULL_MARKERS
            .iter()
            .any(|marker| trimmed.eq_ignore_ascii_case(marker))
    {
        CellValue::Null
    } else {
        CellValue::Text(trimmed.to_string())
    }
}

// ── Export ──────────────────────────────────────────────────────────

/// Write an adjudicated batch to `path`.
pub fn export_path(
    batch: &ClaimBatch,
    path: &Path,
    delimiter: u8,
    annotation: &AnnotationConfig,
) -> Result<()> {
    let file = File::create(path)?;
    export_writer(batch, file, delimiter, annotation)?;
    info!(
        rows = batch.row_count(),
        path = %path.display(),
        "exported adjudicated worksheet"
    );
    Ok(())
}

/// Write an adjudicated batch to any writer, headers first, columns in
/// batch order.
pub fn export_writer<W: io::Write>(
    batch: &ClaimBatch,
    writer: W,
    delimiter: u8,
    annotation: &AnnotationConfig,
) -> Result<()> {
    let names: Vec<&str> = batch.column_names().collect();
    if names.is_empty() {
        return Ok(());
    }

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);
    writer.write_record(&names)?;

    for row in 0..batch.row_count() {
        let mut record = Vec::with_capacity(names.len());
        for name in &names {
            match batch.cell(row, name) {
                Some(cell) => record.push(encode_cell(name, cell, annotation)?),
                None => record.push(String::new()),
            }
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn encode_cell(column: &str, cell: &CellValue, annotation: &AnnotationConfig) -> Result<String> {
    match cell {
        CellValue::List(labels) => match annotation.format {
            AnnotationFormat::Delimited => Ok(labels.join(&annotation.separator)),
            AnnotationFormat::Json => {
                serde_json::to_string(labels).map_err(|source| IngestError::Encode {
                    column: column.to_string(),
                    reason: source.to_string(),
                })
            }
        },
        other => Ok(other.to_string()),
    }
}

// ── Tests ───────────────────────────────────────────────────────────
