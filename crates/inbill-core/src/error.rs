//! Error types for the inbill-core library.
//!
//! Field-level extraction never fails: a candidate that does not parse is
//! dropped and an unsupported document yields an empty result. The errors
//! below cover the surrounding plumbing only.

use thiserror::Error;

use crate::models::record::ReviewStatus;

/// Main error type for the inbill library.
#[derive(Error, Debug)]
pub enum InbillError {
    /// Configuration could not be loaded or failed validation.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A review status change that the lifecycle does not allow.
    #[error("cannot move document from {from} to {to}")]
    InvalidTransition { from: ReviewStatus, to: ReviewStatus },
}

/// Result type for the inbill library.
pub type Result<T> = std::result::Result<T, InbillError>;
