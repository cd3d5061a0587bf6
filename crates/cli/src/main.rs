mod cli;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use claimsift_core::{load_dotenv, parse_delimiter, Config};
use claimsift_ingest::{export_path, import_path, normalize};
use claimsift_rules::{process, RuleRegistry};

use crate::cli::CliArgs;

fn main() -> Result<()> {
    load_dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    if args.list_rules {
        return print_rules(args.json);
    }

    let input = args
        .input
        .context("no worksheet given; pass --input <file> or set CLAIMSIFT_INPUT")?;
    let output = args.output.unwrap_or_else(|| default_output(&input));

    let mut config = Config::from_env();
    if let Some(raw) = args.delimiter.as_deref() {
        config.csv.delimiter = parse_delimiter(raw);
    }
    if let Some(format) = args.annotation_format {
        config.annotation.format = format;
    }
    if let Some(separator) = args.separator {
        config.annotation.separator = separator;
    }
    config.log_summary();

    let mut batch = import_path(&input, config.csv.delimiter)
        .with_context(|| format!("failed to read {}", input.display()))?;
    normalize(&mut batch);

    let registry = RuleRegistry::builtin();
    let batch = process(batch, &registry);

    export_path(&batch, &output, config.csv.delimiter, &config.annotation)
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!(path = %output.display(), "adjudication complete");
    Ok(())
}

/// `claims.csv` adjudicates to `result_claims.csv` in the same directory.
fn default_output(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("claims.csv");
    input.with_file_name(format!("result_{name}"))
}

fn print_rules(json: bool) -> Result<()> {
    let registry = RuleRegistry::builtin();
    if json {
        let infos: Vec<_> = registry.infos().collect();
        println!("{}", serde_json::to_string_pretty(&infos)?);
    } else {
        for info in registry.infos() {
            let marker = if info.active { "" } else { "  (inactive)" };
            println!("{}{}", info.name, marker);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_lands_next_to_the_input() {
        assert_eq!(
            default_output(Path::new("/tmp/uploads/claims.csv")),
            PathBuf::from("/tmp/uploads/result_claims.csv")
        );
        assert_eq!(
            default_output(Path::new("claims.csv")),
            PathBuf::from("result_claims.csv")
        );
    }
}
