//! Completeness score over the four extracted field categories.

use serde::{Deserialize, Serialize};

use crate::models::document::ExtractionResult;

/// Number of field categories that count towards the score.
pub const SCORED_FIELDS: u8 = 4;

/// Fraction of field categories that were found: 0, 0.25, 0.5, 0.75 or 1.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfidenceScore(f64);

impl ConfidenceScore {
    /// Score a result: vendor, amounts, dates and invoice numbers each count once.
    pub fn of(result: &ExtractionResult) -> Self {
        let present = [
            result.vendor_name.is_some(),
            !result.amounts.is_empty(),
            !result.dates.is_empty(),
            !result.invoice_numbers.is_empty(),
        ]
        .iter()
        .filter(|&&found| found)
        .count() as u8;

        Self::from_present(present)
    }

    /// Score for `present` categories found; clamped to the category count.
    pub fn from_present(present: u8) -> Self {
        Self(f64::from(present.min(SCORED_FIELDS)) / f64::from(SCORED_FIELDS))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl From<ConfidenceScore> for f64 {
    fn from(score: ConfidenceScore) -> Self {
        score.0
    }
}
