//! Batch processing command for multiple OCR text files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, error, warn};

use inbill_core::{ContentType, DocumentProcessor, DocumentRecord};

use super::process::{format_record, OutputFormat};

/// Suffix of the metadata file that sits next to each text file.
const SIDECAR_SUFFIX: &str = ".meta.json";

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for OCR text files
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers (default: from config)
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Per-document time limit in milliseconds (default: from config)
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// MIME type for files without a metadata sidecar
    #[arg(long, default_value = "application/pdf")]
    content_type: String,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Email metadata stored in `<stem>.meta.json` next to a text file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Sidecar {
    content_type: Option<String>,
    subject: String,
    sender: String,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    record: Option<DocumentRecord>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = super::load_config(config_path)?;
    let jobs = args.jobs.unwrap_or(config.batch.jobs);
    let timeout_ms = args.timeout_ms.unwrap_or(config.batch.document_timeout_ms);

    if jobs == 0 {
        anyhow::bail!("--jobs must be at least 1");
    }

    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file() && !is_sidecar(p))
        .collect();
    files.sort();

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

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let processor = Arc::new(DocumentProcessor::from_config(&config.extraction));
    let semaphore = Arc::new(Semaphore::new(jobs));
    let timeout = Duration::from_millis(timeout_ms);
    let mut handles = Vec::with_capacity(files.len());

    for path in files {
        let permit = semaphore.clone().acquire_owned().await?;
        let processor = processor.clone();
        let default_mime = args.content_type.clone();
        let pb = overall_pb.clone();

        handles.push(tokio::spawn(async move {
            let file_start = Instant::now();
            let outcome = run_limited(permit, timeout, {
                let path = path.clone();
                move || process_single_file(&path, &processor, &default_mime)
            })
            .await;
            pb.inc(1);

            let processing_time_ms = file_start.elapsed().as_millis() as u64;
            match outcome {
                Ok(record) => ProcessResult {
                    path,
                    record: Some(record),
                    error: None,
                    processing_time_ms,
                },
                Err(e) => ProcessResult {
                    path,
                    record: None,
                    error: Some(e.to_string()),
                    processing_time_ms,
                },
            }
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(handle.await?);
    }

    overall_pb.finish_with_message("Complete");

    for result in &results {
        if let Some(error_msg) = &result.error {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", result.path.display(), error_msg);
            } else {
                error!("Failed to process {}: {}", result.path.display(), error_msg);
                anyhow::bail!(
                    "Processing failed for {}: {}",
                    result.path.display(),
                    error_msg
                );
            }
        }
    }

    let successful: Vec<_> = results.iter().filter(|r| r.record.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    for result in &successful {
        if let (Some(record), Some(output_dir)) = (&result.record, &args.output_dir) {
            let output_name = result
                .path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("document");

            let output_path =
                output_dir.join(format!("{}.{}", output_name, args.format.extension()));

            fs::write(&output_path, format_record(record, args.format)?)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

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

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// Run `work` on the blocking pool with a time limit.
///
/// The permit moves into the blocking task and is released when the work
/// finishes, even if the caller has already given up on it.
async fn run_limited<T, F>(
    permit: OwnedSemaphorePermit,
    timeout: Duration,
    work: F,
) -> anyhow::Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
{
    let task = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        work()
    });

    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => Err(anyhow::anyhow!("Worker failed: {}", e)),
        Err(_) => Err(anyhow::anyhow!("Timed out after {}ms", timeout.as_millis())),
    }
}

fn is_sidecar(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(SIDECAR_SUFFIX))
}

fn sidecar_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    path.with_file_name(format!("{}{}", stem, SIDECAR_SUFFIX))
}

fn load_sidecar(path: &Path) -> anyhow::Result<Sidecar> {
    let sidecar = sidecar_path(path);
    if !sidecar.exists() {
        return Ok(Sidecar::default());
    }

    let content = fs::read_to_string(&sidecar)?;
    serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Invalid metadata in {}: {}", sidecar.display(), e))
}

fn process_single_file(
    path: &Path,
    processor: &DocumentProcessor,
    default_mime: &str,
) -> anyhow::Result<DocumentRecord> {
    let sidecar = load_sidecar(path)?;
    let mime = sidecar.content_type.as_deref().unwrap_or(default_mime);
    let content_type = ContentType::from_mime(mime);

    let document = super::read_document(path, content_type, &sidecar.subject, &sidecar.sender)?;
    Ok(processor.record(&document))
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "vendor_name",
        "invoice_number",
        "date",
        "total",
        "confidence",
        "review_status",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(record) = &result.record {
            let fields = &record.result;
            wtr.write_record([
                filename,
                "success",
                fields.vendor_name.as_deref().unwrap_or(""),
                fields.invoice_numbers.first().map(String::as_str).unwrap_or(""),
                &fields.dates.first().map(|d| d.to_string()).unwrap_or_default(),
                &fields
                    .primary_amount()
                    .map(|a| format!("{:.2}", a))
                    .unwrap_or_default(),
                &format!("{:.2}", record.confidence.value()),
                &record.status.to_string(),
                &result.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_timed_out_work_keeps_its_permit() {
        let semaphore = Arc::new(Semaphore::new(1));
        let permit = semaphore.clone().acquire_owned().await.unwrap();

        let result = run_limited(permit, Duration::from_millis(20), || {
            std::thread::sleep(Duration::from_millis(300));
            Ok(())
        })
        .await;

        assert!(result.unwrap_err().to_string().contains("Timed out"));
        assert_eq!(semaphore.available_permits(), 0);

        let permit = tokio::time::timeout(Duration::from_secs(5), semaphore.clone().acquire_owned())
            .await
            .unwrap()
            .unwrap();
        drop(permit);
        assert_eq!(semaphore.available_permits(), 1);
    }

    #[tokio::test]
    async fn test_finished_work_releases_its_permit() {
        let semaphore = Arc::new(Semaphore::new(1));
        let permit = semaphore.clone().acquire_owned().await.unwrap();

        let value = run_limited(permit, Duration::from_secs(5), || Ok(7)).await.unwrap();

        assert_eq!(value, 7);
        assert_eq!(semaphore.available_permits(), 1);
    }

    #[test]
    fn test_sidecar_path() {
        assert_eq!(
            sidecar_path(Path::new("in/acme.txt")),
            PathBuf::from("in/acme.meta.json")
        );
        assert_eq!(
            sidecar_path(Path::new("in/scan")),
            PathBuf::from("in/scan.meta.json")
        );
        assert!(is_sidecar(Path::new("in/acme.meta.json")));
        assert!(!is_sidecar(Path::new("in/acme.txt")));
    }

    #[test]
    fn test_process_single_file_uses_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let text = dir.path().join("acme.txt");
        fs::write(&text, "").unwrap();
        fs::write(
            dir.path().join("acme.meta.json"),
            r#"{"content_type": "image/png", "sender": "Acme Corp <ap@acme.com>"}"#,
        )
        .unwrap();

        let record = process_single_file(&text, &DocumentProcessor::new(), "application/pdf").unwrap();

        assert_eq!(record.content_type, ContentType::Image);
        assert_eq!(record.result.vendor_name.as_deref(), Some("Acme Corp"));
        assert_eq!(record.subject, "");
    }

    #[test]
    fn test_process_single_file_without_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let text = dir.path().join("plain.txt");
        fs::write(&text, "Amount Due $12.00").unwrap();

        let record = process_single_file(&text, &DocumentProcessor::new(), "text/plain").unwrap();

        assert_eq!(record.content_type, ContentType::Unsupported);
        assert!(record.result.amounts.is_empty());
    }

    #[test]
    fn test_invalid_sidecar_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let text = dir.path().join("bad.txt");
        fs::write(&text, "Total $1.00").unwrap();
        fs::write(dir.path().join("bad.meta.json"), "{not json").unwrap();

        let err = process_single_file(&text, &DocumentProcessor::new(), "application/pdf").unwrap_err();

        assert!(err.to_string().contains("Invalid metadata"));
    }
}
