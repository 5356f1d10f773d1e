//! Invoice field extraction module.

pub mod confidence;
pub mod observer;
mod processor;
pub mod rules;

pub use confidence::ConfidenceScore;
pub use observer::{ExtractionObserver, NoopObserver, TracingObserver};
pub use processor::DocumentProcessor;
