//! Record handed to the persistence layer after extraction.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{InbillError, Result};
use crate::invoice::confidence::ConfidenceScore;
use crate::models::document::{ContentType, ExtractionResult};

/// Review state of a processed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    /// Waiting for a human to check the extracted fields.
    #[default]
    PendingReview,
    /// Fields confirmed.
    Approved,
    /// Fields rejected.
    Rejected,
}

impl ReviewStatus {
    /// Move to `to`; only a pending document can be decided.
    pub fn transition(self, to: ReviewStatus) -> Result<ReviewStatus> {
        match (self, to) {
            (Self::PendingReview, Self::Approved | Self::Rejected) => Ok(to),
            _ => Err(InbillError::InvalidTransition { from: self, to }),
        }
    }

    /// Whether a decision has been made.
    pub fn is_final(&self) -> bool {
        !matches!(self, Self::PendingReview)
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PendingReview => "pending_review",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// Extraction result plus the metadata the store keeps alongside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Email subject line.
    pub subject: String,
    /// Raw sender header.
    pub sender: String,
    /// Content family of the attachment.
    pub content_type: ContentType,
    /// Extracted fields.
    pub result: ExtractionResult,
    /// Completeness of the extracted fields.
    pub confidence: ConfidenceScore,
    /// Review state.
    pub status: ReviewStatus,
    /// When the record was created.
    pub processed_at: DateTime<Utc>,
}

impl DocumentRecord {
    /// Wrap a result as a new pending record.
    pub fn new(result: ExtractionResult, subject: impl Into<String>, sender: impl Into<String>) -> Self {
        let confidence = ConfidenceScore::of(&result);
        Self {
            subject: subject.into(),
            sender: sender.into(),
            content_type: result.content_type,
            result,
            confidence,
            status: ReviewStatus::PendingReview,
            processed_at: Utc::now(),
        }
    }

    /// Apply a review decision.
    pub fn set_status(&mut self, status: ReviewStatus) -> Result<()> {
        self.status = self.status.transition(status)?;
        Ok(())
    }
}
