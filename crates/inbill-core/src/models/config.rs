//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{InbillError, Result};

/// Main configuration for inbill.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InbillConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Batch processing configuration.
    pub batch: BatchConfig,
}

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Smallest amount accepted.
    pub min_amount: f64,

    /// Largest amount accepted.
    pub max_amount: f64,

    /// Number of non-empty lines inspected for a vendor name.
    pub vendor_scan_lines: usize,

    /// Minimum vendor name length in characters.
    pub min_vendor_len: usize,

    /// Minimum length of an unlabeled invoice number.
    pub min_standalone_invoice_len: usize,

    /// Substrings that mark a line as a company name (case-sensitive).
    pub company_indicators: Vec<String>,

    /// Lines equal to one of these (ignoring case) are never a vendor.
    pub header_tokens: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_amount: 0.01,
            max_amount: 1_000_000.0,
            vendor_scan_lines: 5,
            min_vendor_len: 4,
            min_standalone_invoice_len: 6,
            company_indicators: [
                "LLC", "Inc", "Corp", "Ltd", "Company", "Partners", "Group", "Solutions",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            header_tokens: ["INVOICE", "BILL", "STATEMENT"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Batch processing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Number of documents processed concurrently.
    pub jobs: usize,

    /// Wall-clock budget per document, in milliseconds.
    pub document_timeout_ms: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            jobs: 4,
            document_timeout_ms: 5_000,
        }
    }
}

impl InbillConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check that the values are usable.
    pub fn validate(&self) -> Result<()> {
        let ex = &self.extraction;

        if ex.min_amount.is_nan() || ex.min_amount <= 0.0 {
            return Err(InbillError::Config(format!(
                "extraction.min_amount must be positive, got {}",
                ex.min_amount
            )));
        }
        if ex.min_amount > ex.max_amount {
            return Err(InbillError::Config(format!(
                "extraction.min_amount ({}) exceeds extraction.max_amount ({})",
                ex.min_amount, ex.max_amount
            )));
        }
        if ex.vendor_scan_lines == 0 {
            return Err(InbillError::Config(
                "extraction.vendor_scan_lines must be at least 1".to_string(),
            ));
        }
        if self.batch.jobs == 0 {
            return Err(InbillError::Config("batch.jobs must be at least 1".to_string()));
        }
        if self.batch.document_timeout_ms == 0 {
            return Err(InbillError::Config(
                "batch.document_timeout_ms must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
