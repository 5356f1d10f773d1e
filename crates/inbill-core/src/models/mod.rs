//! Data models: documents, results, records and configuration.

pub mod config;
pub mod document;
pub mod record;

pub use config::{BatchConfig, ExtractionConfig, InbillConfig};
pub use document::{ContentType, ExtractionOutcome, ExtractionResult, RawDocument};
pub use record::{DocumentRecord, ReviewStatus};
