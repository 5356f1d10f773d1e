//! Hooks for reporting what the processor did with a document.

use tracing::{debug, info, warn};

use super::rules::VendorTier;
use crate::models::document::{ContentType, ExtractionResult};

/// Receives extraction events. Every method defaults to doing nothing.
pub trait ExtractionObserver: Send + Sync {
    /// The document's content type is not handled.
    fn unsupported_content_type(&self, _content_type: ContentType) {}

    /// The OCR collaborator produced no text.
    fn empty_text(&self, _content_type: ContentType) {}

    /// A result was assembled; `vendor_tier` names where the vendor came from.
    fn document_processed(&self, _result: &ExtractionResult, _vendor_tier: Option<VendorTier>) {}
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ExtractionObserver for NoopObserver {}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ExtractionObserver for TracingObserver {
    fn unsupported_content_type(&self, content_type: ContentType) {
        warn!("Unsupported content type: {}", content_type);
    }

    fn empty_text(&self, content_type: ContentType) {
        warn!("No text extracted from {} document", content_type);
    }

    fn document_processed(&self, result: &ExtractionResult, vendor_tier: Option<VendorTier>) {
        match (&result.vendor_name, vendor_tier) {
            (Some(name), Some(tier)) => debug!("Vendor {:?} resolved from {:?}", name, tier),
            _ => debug!("No vendor name found"),
        }

        info!(
            "Document processing complete. Found: {} amounts, {} dates, {} invoice numbers",
            result.amounts.len(),
            result.dates.len(),
            result.invoice_numbers.len()
        );
    }
}
