//! Subcommand implementations.

pub mod batch;
pub mod config;
pub mod process;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use inbill_core::{ContentType, InbillConfig, RawDocument, TextSource, Utf8TextSource};

/// Location used when `--config` is not given.
pub(crate) fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("inbill")
        .join("config.json")
}

/// Load the config file given with `--config`, else the default file if it
/// exists, else the defaults.
pub(crate) fn load_config(config_path: Option<&str>) -> anyhow::Result<InbillConfig> {
    let config = match config_path {
        Some(path) => InbillConfig::from_file(Path::new(path))?,
        None => {
            let path = default_config_path();
            if path.exists() {
                debug!("Using config file {}", path.display());
                InbillConfig::from_file(&path)?
            } else {
                InbillConfig::default()
            }
        }
    };
    Ok(config)
}

/// Read an OCR text file and attach the email metadata.
pub(crate) fn read_document(
    path: &Path,
    content_type: ContentType,
    subject: &str,
    sender: &str,
) -> anyhow::Result<RawDocument> {
    let content = fs::read(path)?;
    let text = if content_type.is_supported() {
        Utf8TextSource.extract_text(&content, content_type)
    } else {
        String::new()
    };

    Ok(RawDocument {
        text,
        content_type,
        subject: subject.to_string(),
        sender: sender.to_string(),
    })
}
