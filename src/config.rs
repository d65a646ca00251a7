use anyhow::{bail, Context, Result};
use std::path::PathBuf;

/// Output format of the validation report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => bail!("unknown report format '{}', expected 'text' or 'json'", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Input
    pub catalog_dir: PathBuf,

    // Fallback chain; empty keeps import order
    pub priority: Vec<String>,

    // Output
    pub report_format: ReportFormat,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            catalog_dir: std::env::var("CATALOG_DIR")
                .context("CATALOG_DIR not set")?
                .into(),

            priority: std::env::var("CATALOG_PRIORITY")
                .map(|v| parse_priority(&v))
                .unwrap_or_default(),

            report_format: std::env::var("CATALOG_REPORT_FORMAT")
                .ok()
                .map(|v| v.parse::<ReportFormat>())
                .transpose()
                .context("Invalid CATALOG_REPORT_FORMAT")?
                .unwrap_or(ReportFormat::Text),
        })
    }
}

/// Split a comma separated locale list, dropping blanks.
pub fn parse_priority(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_priority() {
        assert_eq!(parse_priority("en, de-AT ,und"), vec!["en", "de-AT", "und"]);
        assert!(parse_priority(" , ").is_empty());
    }

    #[test]
    fn test_report_format_parse() {
        assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert_eq!("text".parse::<ReportFormat>().unwrap(), ReportFormat::Text);
        assert!("xml".parse::<ReportFormat>().is_err());
    }
}
