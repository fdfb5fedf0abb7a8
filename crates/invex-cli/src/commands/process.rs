//! Process command - extract rows from a single converted document.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use tracing::info;

use invex_core::{DocumentExtractor, Extraction, ExtractionError, LineItemRow};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (converted HTML or plain text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Fail if any metadata field (invoice number, billing cycle date,
    /// currency) could not be resolved
    #[arg(long)]
    require_metadata: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON array of row objects
    Json,
    /// One JSON object per line
    Jsonl,
    /// CSV with header row
    Csv,
}

pub async fn run(args: ProcessArgs) -> anyhow::Result<()> {
    let extraction =
        extract_file(&args.input).map_err(|e| anyhow::anyhow!("{}: {}", e.code(), e))?;

    if args.require_metadata && !extraction.metadata.is_complete() {
        anyhow::bail!(
            "metadata incomplete, missing: {}",
            extraction.metadata.missing_fields().join(", ")
        );
    }

    let output = format_rows(&extraction.rows, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} {} rows written to {}",
            style("✓").green(),
            extraction.rows.len(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}

/// Read a converted document from disk and run the extraction engine over
/// it. A path that does not resolve to readable content is `INPUT_MISSING`;
/// everything past the read is the engine's own error taxonomy.
pub fn extract_file(path: &Path) -> Result<Extraction, ExtractionError> {
    if !path.is_file() {
        return Err(ExtractionError::InputMissing(path.display().to_string()));
    }
    let content = fs::read_to_string(path)
        .map_err(|e| ExtractionError::InputMissing(format!("{}: {}", path.display(), e)))?;

    info!("processing {}", path.display());

    let extractor = DocumentExtractor::new();
    if is_html(path) {
        extractor.extract_html(&content)
    } else {
        extractor.extract_text(&content)
    }
}

fn is_html(path: &Path) -> bool {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    matches!(ext.as_str(), "html" | "htm" | "xhtml" | "xml")
}

/// Serialize rows in the requested row-oriented format.
pub fn format_rows(rows: &[LineItemRow], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
        OutputFormat::Jsonl => {
            let mut out = String::new();
            for row in rows {
                out.push_str(&serde_json::to_string(row)?);
                out.push('\n');
            }
            Ok(out)
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            for row in rows {
                writer.serialize(row)?;
            }
            let data = writer
                .into_inner()
                .map_err(|e| anyhow::anyhow!("csv flush failed: {e}"))?;
            Ok(String::from_utf8(data)?)
        }
    }
}
