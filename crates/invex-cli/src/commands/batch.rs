//! Batch processing command for multiple converted documents.

use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{error, warn};

use invex_core::LineItemRow;

use super::process::extract_file;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory for per-document JSON files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error instead of aborting the batch
    #[arg(long)]
    continue_on_error: bool,
}

/// A row enriched with provenance for persisted batch output. The core
/// emits rows without provenance; stamping the source file and processing
/// time onto each record is this orchestration layer's job.
#[derive(Serialize)]
struct ProvenanceRow<'a> {
    #[serde(flatten)]
    row: &'a LineItemRow,
    file_name: &'a str,
    processing_timestamp: &'a str,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    rows: usize,
    error: Option<String>,
}

pub async fn run(args: BatchArgs) -> anyhow::Result<()> {
    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(
                ext.to_lowercase().as_str(),
                "html" | "htm" | "xhtml" | "xml" | "txt"
            )
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    // Each document is independent; a failure on one never touches the rows
    // already extracted from another.
    let mut results = Vec::with_capacity(files.len());
    for path in files {
        let result = process_single_file(&path, &args);

        if let Some(ref msg) = result.error {
            if args.continue_on_error {
                warn!("failed to process {}: {}", path.display(), msg);
            } else {
                error!("failed to process {}: {}", path.display(), msg);
                anyhow::bail!("Processing failed: {}", msg);
            }
        }

        results.push(result);
        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let succeeded = results.iter().filter(|r| r.error.is_none()).count();
    let failed = results.len() - succeeded;

    println!();
    println!(
        "{} Processed successfully: {}",
        style("✓").green(),
        succeeded
    );
    if failed > 0 {
        println!("{} Failed: {}", style("✗").red(), failed);
    }

    Ok(())
}

fn process_single_file(path: &PathBuf, args: &BatchArgs) -> ProcessResult {
    let extraction = match extract_file(path) {
        Ok(extraction) => extraction,
        Err(e) => {
            return ProcessResult {
                path: path.clone(),
                rows: 0,
                error: Some(format!("{}: {}", e.code(), e)),
            };
        }
    };

    if let Some(ref output_dir) = args.output_dir {
        let file_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("document");
        let timestamp = Utc::now().to_rfc3339();

        let enriched: Vec<ProvenanceRow<'_>> = extraction
            .rows
            .iter()
            .map(|row| ProvenanceRow {
                row,
                file_name,
                processing_timestamp: &timestamp,
            })
            .collect();

        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("document");
        let output_path = output_dir.join(format!("{}.json", stem));

        match serde_json::to_string_pretty(&enriched)
            .map_err(anyhow::Error::from)
            .and_then(|json| fs::write(&output_path, json).map_err(anyhow::Error::from))
        {
            Ok(()) => {}
            Err(e) => {
                return ProcessResult {
                    path: path.clone(),
                    rows: extraction.rows.len(),
                    error: Some(format!("write failed: {}", e)),
                };
            }
        }
    }

    ProcessResult {
        path: path.clone(),
        rows: extraction.rows.len(),
        error: None,
    }
}

/// Write the per-file failure bucket as a CSV summary.
fn write_summary(path: &PathBuf, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["file", "status", "rows", "error"])?;

    for result in results {
        let status = if result.error.is_none() { "ok" } else { "failed" };
        writer.write_record([
            result.path.display().to_string().as_str(),
            status,
            result.rows.to_string().as_str(),
            result.error.as_deref().unwrap_or(""),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
