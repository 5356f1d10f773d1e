//! Process command - extract fields from a single OCR text file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use inbill_core::{ContentType, DocumentProcessor, DocumentRecord};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// OCR text of one attachment
    #[arg(required = true)]
    input: PathBuf,

    /// MIME type of the original attachment
    #[arg(long, default_value = "application/pdf", conflicts_with = "source")]
    content_type: String,

    /// Original attachment file name; its extension selects the content type
    #[arg(long)]
    source: Option<PathBuf>,

    /// Email subject line
    #[arg(long, default_value = "")]
    subject: String,

    /// Email sender header, e.g. "Acme Corp <ap@acme.com>"
    #[arg(long, default_value = "")]
    sender: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Show extraction confidence
    #[arg(long)]
    show_confidence: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// File extension used when writing one output per document.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Text => "txt",
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = super::load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let content_type = match &args.source {
        Some(source) => ContentType::from_extension(source),
        None => ContentType::from_mime(&args.content_type),
    };

    info!("Processing file: {} ({})", args.input.display(), content_type);

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("##-"),
    );

    pb.set_message("Reading text...");
    pb.set_position(20);
    let document = super::read_document(&args.input, content_type, &args.subject, &args.sender)?;

    pb.set_message("Extracting fields...");
    pb.set_position(60);
    let processor = DocumentProcessor::from_config(&config.extraction);
    let record = processor.record(&document);

    pb.set_position(100);
    pb.finish_with_message("Done");

    let output = format_record(&record, args.format)?;

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

    if args.show_confidence {
        println!();
        println!(
            "{} Extraction confidence: {:.0}%",
            style("ℹ").blue(),
            record.confidence.value() * 100.0
        );
        println!(
            "{} Processing time: {}ms",
            style("ℹ").blue(),
            start.elapsed().as_millis()
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub(crate) fn format_record(record: &DocumentRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(record)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

fn join<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(";")
}

fn format_csv(record: &DocumentRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    let result = &record.result;

    wtr.write_record([
        "vendor_name",
        "amounts",
        "dates",
        "invoice_numbers",
        "content_type",
        "outcome",
        "confidence",
        "status",
        "subject",
        "sender",
        "processed_at",
    ])?;

    wtr.write_record([
        result.vendor_name.clone().unwrap_or_default(),
        join(&result.amounts),
        join(&result.dates),
        join(&result.invoice_numbers),
        record.content_type.to_string(),
        result.outcome.to_string(),
        format!("{:.2}", record.confidence.value()),
        record.status.to_string(),
        record.subject.clone(),
        record.sender.clone(),
        record.processed_at.to_rfc3339(),
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &DocumentRecord) -> String {
    let result = &record.result;
    let mut output = String::new();

    output.push_str(&format!(
        "Vendor: {}\n",
        result.vendor_name.as_deref().unwrap_or("-")
    ));
    match result.primary_amount() {
        Some(total) => output.push_str(&format!("Total: {:.2}\n", total)),
        None => output.push_str("Total: -\n"),
    }
    output.push('\n');

    if !result.amounts.is_empty() {
        output.push_str("Amounts:\n");
        for amount in &result.amounts {
            output.push_str(&format!("  {:.2}\n", amount));
        }
    }

    if !result.dates.is_empty() {
        output.push_str("Dates:\n");
        for date in &result.dates {
            output.push_str(&format!("  {}\n", date));
        }
    }

    if !result.invoice_numbers.is_empty() {
        output.push_str("Invoice numbers:\n");
        for number in &result.invoice_numbers {
            output.push_str(&format!("  {}\n", number));
        }
    }

    output.push('\n');
    output.push_str(&format!("Content type: {}\n", record.content_type));
    output.push_str(&format!("Confidence: {:.2}\n", record.confidence.value()));
    output.push_str(&format!("Status: {}\n", record.status));
    output.push_str(&format!(
        "Processed: {}\n",
        record
            .processed_at
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M:%S")
    ));

    output
}
