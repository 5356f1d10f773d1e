//! Rule-based field extractors for invoices and receipts.

pub mod amounts;
pub mod dates;
pub mod invoice_numbers;
pub mod patterns;
pub mod vendor;

pub use amounts::{parse_amount, AmountExtractor};
pub use dates::{parse_date, DateExtractor};
pub use invoice_numbers::{InvoiceNumberExtractor, InvoicePhase};
pub use patterns::*;
pub use vendor::{clean_vendor_name, VendorMatch, VendorResolver, VendorTier};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A value together with where and how it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Name of the pattern that produced it.
    pub pattern: &'static str,
    /// Byte span in the source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, pattern: &'static str, source: impl Into<String>) -> Self {
        Self {
            value,
            pattern,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
