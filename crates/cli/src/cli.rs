use std::path::PathBuf;

use clap::Parser;

use claimsift_core::AnnotationFormat;

/// Batch adjudication for claim worksheets.
///
/// Reads a CSV upload, runs the rule catalog over it, and writes the
/// worksheet back out with a "Filter Applied" column naming every rule
/// that matched each row.
#[derive(Parser, Debug)]
#[command(name = "claimsift", version, about = "Batch adjudication for claim worksheets")]
pub struct CliArgs {
    /// Claim worksheet to adjudicate.
    #[arg(long, env = "CLAIMSIFT_INPUT")]
    pub input: Option<PathBuf>,

    /// Where to write the adjudicated worksheet
    /// (default: result_<input name> next to the input).
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Field delimiter; "\t" and "tab" spell tab.
    #[arg(long)]
    pub delimiter: Option<String>,

    /// Rendering for the annotation column: delimited or json.
    #[arg(long)]
    pub annotation_format: Option<AnnotationFormat>,

    /// Separator between labels in delimited rendering (default "; ").
    #[arg(long)]
    pub separator: Option<String>,

    /// List the rule catalog and exit.
    #[arg(long)]
    pub list_rules: bool,

    /// Emit the rule list as JSON (with --list-rules).
    #[arg(long)]
    pub json: bool,
}
