//! Core library for invoice and receipt field extraction.
//!
//! This crate provides:
//! - Rule-based extraction of amounts, dates, invoice numbers and vendor names
//!   from OCR text
//! - A document processor that assembles the fields into one result
//! - A completeness-based confidence score
//! - Records and configuration shared with the surrounding pipeline

pub mod error;
pub mod models;
pub mod source;
pub mod invoice;

pub use error::{InbillError, Result};
pub use models::config::{BatchConfig, ExtractionConfig, InbillConfig};
pub use models::document::{ContentType, ExtractionOutcome, ExtractionResult, RawDocument};
pub use models::record::{DocumentRecord, ReviewStatus};
pub use source::{TextSource, Utf8TextSource};
pub use invoice::{
    ConfidenceScore, DocumentProcessor, ExtractionObserver, NoopObserver, TracingObserver,
};
