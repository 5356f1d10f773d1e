//! Document processor: runs every field extractor over one document.

use std::sync::Arc;

use crate::models::config::ExtractionConfig;
use crate::models::document::{ContentType, ExtractionOutcome, ExtractionResult, RawDocument};
use crate::models::record::DocumentRecord;
use crate::source::TextSource;

use super::observer::{ExtractionObserver, TracingObserver};
use super::rules::{AmountExtractor, DateExtractor, InvoiceNumberExtractor, VendorResolver};

/// Extracts amounts, dates, invoice numbers and the vendor from a document.
///
/// Holds only configuration and shares the compiled patterns, so one
/// processor can serve any number of threads.
#[derive(Clone)]
pub struct DocumentProcessor {
    amounts: AmountExtractor,
    dates: DateExtractor,
    invoice_numbers: InvoiceNumberExtractor,
    vendor: VendorResolver,
    observer: Arc<dyn ExtractionObserver>,
}

impl DocumentProcessor {
    /// Create a processor with default settings.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            amounts: AmountExtractor::from_config(config),
            dates: DateExtractor::new(),
            invoice_numbers: InvoiceNumberExtractor::from_config(config),
            vendor: VendorResolver::from_config(config),
            observer: Arc::new(TracingObserver),
        }
    }

    /// Replace the observer that receives extraction events.
    pub fn with_observer(mut self, observer: Arc<dyn ExtractionObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Extract every field from `document`.
    ///
    /// Never fails: unsupported content yields an empty result and text
    /// without matches yields empty fields.
    pub fn process(&self, document: &RawDocument) -> ExtractionResult {
        if !document.content_type.is_supported() {
            self.observer.unsupported_content_type(document.content_type);
            return ExtractionResult::empty(
                document.text.clone(),
                document.content_type,
                ExtractionOutcome::UnsupportedContentType,
            );
        }

        let outcome = if document.text.trim().is_empty() {
            self.observer.empty_text(document.content_type);
            ExtractionOutcome::EmptyText
        } else {
            ExtractionOutcome::Extracted
        };

        let text = document.text.as_str();
        let vendor = self.vendor.resolve(text, &document.subject, &document.sender);
        let vendor_tier = vendor.as_ref().map(|v| v.tier);

        let result = ExtractionResult {
            text: document.text.clone(),
            amounts: self.amounts.values(text),
            dates: self.dates.values(text),
            invoice_numbers: self.invoice_numbers.values(text),
            vendor_name: vendor.map(|v| v.name),
            content_type: document.content_type,
            outcome,
        };

        self.observer.document_processed(&result, vendor_tier);
        result
    }

    /// Run the text source over raw attachment bytes, then extract.
    ///
    /// The source is not consulted for unsupported content types.
    pub fn process_content(
        &self,
        source: &dyn TextSource,
        content: &[u8],
        mime: &str,
        subject: &str,
        sender: &str,
    ) -> ExtractionResult {
        let content_type = ContentType::from_mime(mime);
        let text = if content_type.is_supported() {
            source.extract_text(content, content_type)
        } else {
            String::new()
        };

        self.process(&RawDocument {
            text,
            content_type,
            subject: subject.to_string(),
            sender: sender.to_string(),
        })
    }

    /// Extract and wrap the result as a pending record for storage.
    pub fn record(&self, document: &RawDocument) -> DocumentRecord {
        DocumentRecord::new(self.process(document), &document.subject, &document.sender)
    }
}

impl Default for DocumentProcessor {
    fn default() -> Self {
        Self::new()
    }
}
