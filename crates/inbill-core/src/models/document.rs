//! Document input and extraction output models.

use std::fmt;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Content family of the original attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// Scanned image (`image/*`).
    Image,
    /// PDF document (`application/pdf`).
    Pdf,
    /// Anything the OCR collaborator cannot handle.
    Unsupported,
}

impl ContentType {
    /// Map a MIME type such as `image/png` or `application/pdf; name=a.pdf`.
    pub fn from_mime(mime: &str) -> Self {
        let essence = mime
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();

        if essence.starts_with("image/") {
            Self::Image
        } else if essence == "application/pdf" {
            Self::Pdf
        } else {
            Self::Unsupported
        }
    }

    /// Map an attachment file name by its extension.
    pub fn from_extension(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "pdf" => Self::Pdf,
            "jpg" | "jpeg" | "png" | "tiff" | "tif" => Self::Image,
            _ => Self::Unsupported,
        }
    }

    /// Whether text extraction is attempted for this content type.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Image => "image",
            Self::Pdf => "pdf",
            Self::Unsupported => "unsupported",
        };
        f.write_str(name)
    }
}

/// One attachment's OCR text plus the email metadata it arrived with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDocument {
    /// Text recovered by the OCR collaborator (may be empty).
    pub text: String,
    /// Content family of the original attachment.
    pub content_type: ContentType,
    /// Email subject line.
    pub subject: String,
    /// Raw sender header, e.g. `Acme Corp <ap@acme.com>`.
    pub sender: String,
}

impl RawDocument {
    /// Build a document from a MIME type string.
    pub fn new(
        text: impl Into<String>,
        mime: &str,
        subject: impl Into<String>,
        sender: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            content_type: ContentType::from_mime(mime),
            subject: subject.into(),
            sender: sender.into(),
        }
    }
}

/// How far extraction got for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionOutcome {
    /// Text was present and all extractors ran.
    Extracted,
    /// The OCR collaborator produced no text; only metadata could be used.
    EmptyText,
    /// The content type is not handled; nothing was extracted.
    UnsupportedContentType,
}

impl fmt::Display for ExtractionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Extracted => "extracted",
            Self::EmptyText => "empty_text",
            Self::UnsupportedContentType => "unsupported_content_type",
        };
        f.write_str(name)
    }
}

/// Structured fields derived from one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// The text the fields were extracted from.
    pub text: String,
    /// Monetary amounts, largest first, no duplicates.
    pub amounts: Vec<f64>,
    /// Distinct calendar dates in order of first appearance.
    pub dates: Vec<NaiveDate>,
    /// Distinct invoice numbers in order of first appearance.
    pub invoice_numbers: Vec<String>,
    /// Resolved vendor name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_name: Option<String>,
    /// Content family of the source attachment.
    pub content_type: ContentType,
    /// Whether extraction ran, and on what.
    pub outcome: ExtractionOutcome,
}

impl ExtractionResult {
    /// A result with every field empty.
    pub fn empty(text: impl Into<String>, content_type: ContentType, outcome: ExtractionOutcome) -> Self {
        Self {
            text: text.into(),
            amounts: Vec::new(),
            dates: Vec::new(),
            invoice_numbers: Vec::new(),
            vendor_name: None,
            content_type,
            outcome,
        }
    }

    /// Largest amount, usually the invoice total.
    pub fn primary_amount(&self) -> Option<f64> {
        self.amounts.first().copied()
    }

    /// Check if no field was extracted.
    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
            && self.dates.is_empty()
            && self.invoice_numbers.is_empty()
            && self.vendor_name.is_none()
    }
}
