//! Process command - run the pipeline over a single document file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use bandoc_core::{
    Action, BandocConfig, Document, DocumentAgent, ProcessingResult, ProcessingStatus,
};

use crate::source::FileTextSource;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Stages to run, in pipeline order
    #[arg(
        short,
        long,
        value_enum,
        value_delimiter = ',',
        default_values = ["classify", "extract", "validate"]
    )]
    actions: Vec<StageArg>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output of extracted fields
    Csv,
    /// Plain text summary
    Text,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum StageArg {
    Classify,
    Extract,
    Validate,
    DetectFraud,
}

impl From<StageArg> for Action {
    fn from(stage: StageArg) -> Self {
        match stage {
            StageArg::Classify => Action::Classify,
            StageArg::Extract => Action::Extract,
            StageArg::Validate => Action::Validate,
            StageArg::DetectFraud => Action::DetectFraud,
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let metadata = fs::metadata(&args.input)?;
    check_intake(&args.input, metadata.len(), &config)?;

    let mut document = document_from_path(&args.input, metadata.len());
    let agent = DocumentAgent::from_config(Box::new(FileTextSource::new()), &config);
    let actions: Vec<Action> = args.actions.iter().copied().map(Action::from).collect();

    info!("Processing file: {}", args.input.display());
    let result = agent.process_with_actions(&mut document, &actions);

    let output = format_result(&result, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    print_status_line(&result);

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub fn load_config(config_path: Option<&str>) -> anyhow::Result<BandocConfig> {
    Ok(if let Some(path) = config_path {
        BandocConfig::from_file(Path::new(path))?
    } else {
        BandocConfig::default()
    })
}

pub fn check_intake(path: &Path, file_size: u64, config: &BandocConfig) -> anyhow::Result<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    if !config.accepts_format(&format!(".{extension}")) {
        anyhow::bail!("File format not accepted for intake: .{extension}");
    }
    if file_size > config.intake.max_file_size {
        anyhow::bail!(
            "File exceeds the maximum accepted size of {} bytes",
            config.intake.max_file_size
        );
    }

    Ok(())
}

/// Build a pending document from a file on disk.
pub fn document_from_path(path: &Path, file_size: u64) -> Document {
    let filename = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("document")
        .to_string();
    let id = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document")
        .to_string();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    Document::new(
        id,
        filename,
        path.to_string_lossy().into_owned(),
        file_size,
        mime_type_for(&extension),
    )
}

fn mime_type_for(extension: &str) -> &'static str {
    match extension {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "tiff" => "image/tiff",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" | "text" => "text/plain",
        _ => "application/octet-stream",
    }
}

pub fn format_result(result: &ProcessingResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => format_result_csv(result),
        OutputFormat::Text => Ok(format_result_text(result)),
    }
}

fn format_result_csv(result: &ProcessingResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["field", "value", "confidence"])?;

    if let Some(extraction) = &result.extraction {
        let mut names: Vec<&String> = extraction.fields.keys().collect();
        names.sort();

        for name in names {
            let confidence = extraction
                .confidence_scores
                .get(name)
                .map(|c| format!("{c:.2}"))
                .unwrap_or_default();
            wtr.write_record([name.as_str(), extraction.fields[name].as_str(), &confidence])?;
        }
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_result_text(result: &ProcessingResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("Document: {}\n", result.document.filename));
    output.push_str(&format!("Status:   {}\n", result.document.status));

    if let Some(classification) = &result.classification {
        output.push_str(&format!(
            "Type:     {} ({:.0}% confidence)\n",
            classification.document_type.display_name(),
            classification.confidence * 100.0
        ));
    }

    if let Some(extraction) = &result.extraction {
        output.push_str("\nExtracted fields:\n");
        let mut names: Vec<&String> = extraction.fields.keys().collect();
        names.sort();
        for name in names {
            output.push_str(&format!("  {}: {}\n", name, extraction.fields[name]));
        }
    }

    if let Some(validation) = &result.validation {
        output.push_str(&format!(
            "\nCompliance: {} (score {:.2})\n",
            if validation.is_valid { "valid" } else { "invalid" },
            validation.compliance_score
        ));
        for error in &validation.errors {
            output.push_str(&format!("  error: {}\n", error));
        }
        for warning in &validation.warnings {
            output.push_str(&format!("  warning: {}\n", warning));
        }
    }

    if let Some(fraud) = &result.fraud_detection {
        output.push_str(&format!(
            "\nFraud risk: {:.2}{}\n",
            fraud.risk_score,
            if fraud.is_fraudulent { " (flagged)" } else { "" }
        ));
        for factor in &fraud.risk_factors {
            output.push_str(&format!("  factor: {}\n", factor));
        }
        for recommendation in &fraud.recommendations {
            output.push_str(&format!("  recommendation: {}\n", recommendation));
        }
    }

    for error in &result.errors {
        output.push_str(&format!("\nerror: {}\n", error));
    }

    if let Some(time_ms) = result.processing_time_ms {
        output.push_str(&format!("\nProcessed in {}ms\n", time_ms));
    }

    output
}

fn print_status_line(result: &ProcessingResult) {
    let status = result.document.status;
    let label = match status {
        ProcessingStatus::Completed => style(status.as_str()).green(),
        ProcessingStatus::Rejected => style(status.as_str()).yellow(),
        _ => style(status.as_str()).red(),
    };
    eprintln!("{} {}", style("·").blue(), label);
}
