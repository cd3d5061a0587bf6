use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub csv: CsvConfig,
    pub annotation: AnnotationConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            csv: CsvConfig::from_env(),
            annotation: AnnotationConfig::from_env(),
        }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  csv:         delimiter={:?}", self.csv.delimiter as char);
        tracing::info!(
            "  annotation:  format={}, separator={:?}",
            self.annotation.format,
            self.annotation.separator
        );
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            csv: CsvConfig { delimiter: b',' },
            annotation: AnnotationConfig {
                format: AnnotationFormat::Delimited,
                separator: "; ".to_string(),
            },
        }
    }
}

// ── CSV I/O ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvConfig {
    /// Field delimiter for import and export.
    pub delimiter: u8,
}

impl CsvConfig {
    fn from_env() -> Self {
        Self {
            delimiter: parse_delimiter(&env_or("CLAIMSIFT_DELIMITER", ",")),
        }
    }
}

/// Accepts a literal character plus the spellings "\t" and "tab".
pub fn parse_delimiter(raw: &str) -> u8 {
    match raw {
        "\\t" | "tab" => b'\t',
        other => other.as_bytes().first().copied().unwrap_or(b','),
    }
}

// ── Annotation export ─────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationConfig {
    /// How the trigger-label list is rendered on export.
    pub format: AnnotationFormat,
    /// Join string for the delimited format.
    pub separator: String,
}

impl AnnotationConfig {
    fn from_env() -> Self {
        Self {
            format: env_or("CLAIMSIFT_ANNOTATION_FORMAT", "delimited")
                .parse()
                .unwrap_or(AnnotationFormat::Delimited),
            separator: env_or("CLAIMSIFT_ANNOTATION_SEPARATOR", "; "),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationFormat {
    /// Labels joined with the configured separator, e.g. `a; b`.
    Delimited,
    /// Labels as a JSON string array, e.g. `["a","b"]`.
    Json,
}

impl FromStr for AnnotationFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "delimited" => Ok(AnnotationFormat::Delimited),
            "json" => Ok(AnnotationFormat::Json),
            other => Err(format!("unknown annotation format '{}'", other)),
        }
    }
}

impl fmt::Display for AnnotationFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationFormat::Delimited => write!(f, "delimited"),
            AnnotationFormat::Json => write!(f, "json"),
        }
    }
}
