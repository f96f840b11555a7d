//! Batch processing command for multiple document files.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use bandoc_core::{
    Action, DocumentAgent, MemoryRepository, ProcessingResult, ProcessingStatus, Repository,
};

use super::process::{check_intake, document_from_path, load_config};
use crate::source::FileTextSource;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory for per-file JSON results
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Also run fraud analysis
    #[arg(long)]
    detect_fraud: bool,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Skip files rejected by the intake limits instead of aborting
    #[arg(long)]
    continue_on_error: bool,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(output_dir) = &args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let agent = DocumentAgent::from_config(Box::new(FileTextSource::new()), &config);
    let mut actions = vec![Action::Classify, Action::Extract, Action::Validate];
    if args.detect_fraud {
        actions.push(Action::DetectFraud);
    }

    let results: MemoryRepository<ProcessingResult> = MemoryRepository::new();
    let mut skipped: Vec<(PathBuf, String)> = Vec::new();

    for path in &files {
        let metadata = fs::metadata(path)?;

        if let Err(reason) = check_intake(path, metadata.len(), &config) {
            if args.continue_on_error {
                skipped.push((path.clone(), reason.to_string()));
                progress.inc(1);
                continue;
            }
            anyhow::bail!("{reason}");
        }

        let mut document = document_from_path(path, metadata.len());
        let result = agent.process_with_actions(&mut document, &actions);

        if let Some(output_dir) = &args.output_dir {
            let output_path = output_dir.join(format!("{}.json", document.id));
            fs::write(&output_path, serde_json::to_string_pretty(&result)?)?;
            debug!("Wrote output to {}", output_path.display());
        }

        results.put(&document.id, result);
        progress.inc(1);
    }

    progress.finish_with_message("Complete");

    let processed = results.list();
    let completed = count_with_status(&processed, ProcessingStatus::Completed);
    let rejected = count_with_status(&processed, ProcessingStatus::Rejected);
    let failed = count_with_status(&processed, ProcessingStatus::Failed);

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|dir| dir.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &processed)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        processed.len(),
        start.elapsed()
    );
    println!(
        "   {} completed, {} rejected, {} failed, {} skipped",
        style(completed).green(),
        style(rejected).yellow(),
        style(failed).red(),
        skipped.len()
    );

    if !skipped.is_empty() {
        println!();
        println!("{}", style("Skipped files:").yellow());
        for (path, reason) in &skipped {
            println!("  - {}: {}", path.display(), reason);
        }
    }

    Ok(())
}

fn count_with_status(results: &[ProcessingResult], status: ProcessingStatus) -> usize {
    results
        .iter()
        .filter(|result| result.document.status == status)
        .count()
}

fn write_summary(path: &PathBuf, results: &[ProcessingResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "document_type",
        "classification_confidence",
        "compliance_score",
        "risk_score",
        "processing_time_ms",
        "errors",
    ])?;

    for result in results {
        let document_type = result
            .document
            .document_type
            .map(|t| t.to_string())
            .unwrap_or_default();
        let confidence = result
            .classification
            .as_ref()
            .map(|c| format!("{:.2}", c.confidence))
            .unwrap_or_default();
        let compliance = result
            .validation
            .as_ref()
            .map(|v| format!("{:.2}", v.compliance_score))
            .unwrap_or_default();
        let risk = result
            .fraud_detection
            .as_ref()
            .map(|f| format!("{:.2}", f.risk_score))
            .unwrap_or_default();
        let time_ms = result
            .processing_time_ms
            .map(|t| t.to_string())
            .unwrap_or_default();

        wtr.write_record([
            result.document.filename.as_str(),
            result.document.status.as_str(),
            &document_type,
            &confidence,
            &compliance,
            &risk,
            &time_ms,
            &result.errors.join("; "),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
