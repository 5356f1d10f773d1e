//! Date extraction for invoices and receipts.

use std::collections::HashSet;

use chrono::NaiveDate;

use super::patterns::{DateShape, DATE_PATTERNS};
use super::{ExtractionMatch, FieldExtractor};

/// Date field extractor.
///
/// Numeric forms are read month first; no locale detection is attempted.
#[derive(Debug, Clone, Default)]
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Distinct dates in order of first appearance per shape.
    pub fn values(&self, text: &str) -> Vec<NaiveDate> {
        self.extract_all(text).into_iter().map(|m| m.value).collect()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<NaiveDate>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results: Vec<Self::Output> = Vec::new();
        let mut seen: HashSet<NaiveDate> = HashSet::new();

        for (shape, pattern) in DATE_PATTERNS.iter() {
            for m in pattern.candidates(text) {
                let Some(date) = parse_date(m.as_str(), *shape) else {
                    continue;
                };

                // Skip if already found, whatever form it was written in
                if !seen.insert(date) {
                    continue;
                }

                results.push(
                    ExtractionMatch::new(date, pattern.name, m.as_str())
                        .with_position(m.start(), m.end()),
                );
            }
        }

        results
    }
}

/// Parse `s` with the templates of `shape`, first success wins.
pub fn parse_date(s: &str, shape: DateShape) -> Option<NaiveDate> {
    let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");

    shape
        .templates()
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&normalized, fmt).ok())
}
