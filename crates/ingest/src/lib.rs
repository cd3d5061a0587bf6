//! Claim worksheet input and output.
//!
//! This crate provides:
//! - CSV import into a `ClaimBatch` and export back out, with the
//!   annotation list rendered per config
//! - Upload normalization for the date and quantity columns the rules
//!   compare on

pub mod csv;
pub mod error;
pub mod normalize;

pub use error::{IngestError, Result};
pub use normalize::normalize;
pub use self::csv::{export_path, export_writer, import_path, import_reader};
