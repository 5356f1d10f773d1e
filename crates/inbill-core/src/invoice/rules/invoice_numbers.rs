//! Invoice number extraction.
//!
//! Runs in two phases. Labeled tokens ("Invoice #", "Bill", "Reference")
//! come first and claim their spans; bare codes recognised by shape alone are
//! then added only where no labeled token was found.

use std::collections::HashSet;

use super::patterns::{INVOICE_CONTEXTUAL_PATTERNS, INVOICE_STANDALONE_PATTERNS};
use super::{ExtractionMatch, FieldExtractor};
use crate::models::config::ExtractionConfig;

/// Which phase produced a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoicePhase {
    /// A label keyword precedes the token.
    Contextual,
    /// The token was recognised by shape alone.
    Standalone,
}

/// Invoice number extractor.
#[derive(Debug, Clone)]
pub struct InvoiceNumberExtractor {
    min_standalone_len: usize,
}

impl InvoiceNumberExtractor {
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            min_standalone_len: config.min_standalone_invoice_len,
        }
    }

    /// Set the minimum length of an unlabeled token.
    pub fn with_min_standalone_len(mut self, len: usize) -> Self {
        self.min_standalone_len = len;
        self
    }

    /// Distinct tokens in order of first appearance.
    pub fn values(&self, text: &str) -> Vec<String> {
        self.extract_all(text).into_iter().map(|m| m.value).collect()
    }

    /// Tokens tagged with the phase that found them.
    pub fn extract_phased(&self, text: &str) -> Vec<(InvoicePhase, ExtractionMatch<String>)> {
        let mut results: Vec<(InvoicePhase, ExtractionMatch<String>)> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        // Spans captured by any labeled match, kept even for duplicate tokens.
        let mut claimed: Vec<(usize, usize)> = Vec::new();

        for pattern in INVOICE_CONTEXTUAL_PATTERNS.iter() {
            for m in pattern.candidates(text) {
                claimed.push((m.start(), m.end()));

                let token = m.as_str().trim();
                if token.is_empty() || !seen.insert(token.to_string()) {
                    continue;
                }

                results.push((
                    InvoicePhase::Contextual,
                    ExtractionMatch::new(token.to_string(), pattern.name, m.as_str())
                        .with_position(m.start(), m.end()),
                ));
            }
        }

        let claimed = merge_spans(claimed);

        for pattern in INVOICE_STANDALONE_PATTERNS.iter() {
            for m in pattern.candidates(text) {
                if overlaps_any(&claimed, m.start(), m.end()) {
                    continue;
                }

                let token = m.as_str().trim();
                if token.chars().count() < self.min_standalone_len {
                    continue;
                }
                if !seen.insert(token.to_string()) {
                    continue;
                }

                results.push((
                    InvoicePhase::Standalone,
                    ExtractionMatch::new(token.to_string(), pattern.name, m.as_str())
                        .with_position(m.start(), m.end()),
                ));
            }
        }

        results
    }
}

/// Sort spans and merge the overlapping ones into disjoint, ordered spans.
fn merge_spans(mut spans: Vec<(usize, usize)>) -> Vec<(usize, usize)> {
    spans.sort_unstable();

    let mut merged: Vec<(usize, usize)> = Vec::with_capacity(spans.len());
    for (start, end) in spans {
        match merged.last_mut() {
            Some(last) if start < last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}

/// Whether `[start, end)` overlaps any span of a merged list.
fn overlaps_any(merged: &[(usize, usize)], start: usize, end: usize) -> bool {
    let idx = merged.partition_point(|&(_, e)| e <= start);
    merged.get(idx).is_some_and(|&(s, _)| s < end)
}

impl Default for InvoiceNumberExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for InvoiceNumberExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.extract_phased(text).into_iter().map(|(_, m)| m).collect()
    }
}
