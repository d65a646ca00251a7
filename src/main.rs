use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use text_catalog::catalog::{self, JsonImporter, Registry};
use text_catalog::config::{Config, ReportFormat};
use text_catalog::global;
use tracing::info;

fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("text_catalog=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    info!("Checking catalog in {}", config.catalog_dir.display());

    // Step 1: Import every JSON file, in name order
    let files = list_catalog_files(&config)?;
    if files.is_empty() {
        info!("No translation files found, nothing to check");
        return Ok(());
    }

    for path in &files {
        let store = global::import_file(&JsonImporter, path)
            .with_context(|| format!("Import of {} failed", path.display()))?;
        info!("Imported {} -> {} ({} strings)", path.display(), store.tag(), store.len());
    }

    // Step 2: Apply the operator's fallback chain
    if !config.priority.is_empty() {
        global::translation_priority(config.priority.as_slice());
    }

    // Step 3: Validate and report
    let report = catalog::check(&Registry::global().snapshot());
    match config.report_format {
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        ReportFormat::Text => {
            let locales: Vec<String> = report.locales.iter().map(|t| t.to_string()).collect();
            println!(
                "Checked {} string(s) across {} locale(s): {}",
                report.ids_checked,
                locales.len(),
                locales.join(", ")
            );
            for defect in &report.defects {
                println!("  - {}", defect);
            }
        }
    }

    if !report.is_clean() {
        bail!("{} translation defect(s) found", report.defects.len());
    }

    info!("Catalog is consistent");
    Ok(())
}

fn list_catalog_files(config: &Config) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(&config.catalog_dir)
        .with_context(|| format!("Cannot read {}", config.catalog_dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Cannot list {}", config.catalog_dir.display()))?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
