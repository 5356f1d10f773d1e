//! Amount extraction for invoices and receipts.

use std::collections::HashSet;

use super::patterns::AMOUNT_PATTERNS;
use super::{ExtractionMatch, FieldExtractor};
use crate::models::config::ExtractionConfig;

/// Amount field extractor.
///
/// Every pattern is scanned in priority order; values are range-checked,
/// deduplicated and returned largest first, since the invoice total is
/// usually the biggest figure on the page.
#[derive(Debug, Clone)]
pub struct AmountExtractor {
    min: f64,
    max: f64,
}

impl AmountExtractor {
    pub fn new() -> Self {
        let defaults = ExtractionConfig::default();
        Self::with_range(defaults.min_amount, defaults.max_amount)
    }

    /// Accept only values in `[min, max]`.
    pub fn with_range(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::with_range(config.min_amount, config.max_amount)
    }

    /// Extracted values only, largest first.
    pub fn values(&self, text: &str) -> Vec<f64> {
        self.extract_all(text).into_iter().map(|m| m.value).collect()
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = ExtractionMatch<f64>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results: Vec<Self::Output> = Vec::new();
        let mut seen: HashSet<u64> = HashSet::new();

        for pattern in AMOUNT_PATTERNS.iter() {
            for m in pattern.candidates(text) {
                let Some(amount) = parse_amount(m.as_str()) else {
                    continue;
                };

                if amount < self.min || amount > self.max {
                    continue;
                }

                // Skip if already found by an earlier pattern
                if !seen.insert(amount.to_bits()) {
                    continue;
                }

                results.push(
                    ExtractionMatch::new(amount, pattern.name, m.as_str())
                        .with_position(m.start(), m.end()),
                );
            }
        }

        results.sort_by(|a, b| b.value.total_cmp(&a.value));
        results
    }
}

/// Parse a US-formatted amount such as `$1,234.56` or `USD 99.00`.
///
/// Everything but digits, commas and periods is dropped and commas are
/// treated as thousands separators.
pub fn parse_amount(s: &str) -> Option<f64> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("$1,234.56"), Some(1234.56));
        assert_eq!(parse_amount("USD 99.00"), Some(99.0));
        assert_eq!(parse_amount("$ 12,345,678.90"), Some(12345678.90));
        assert_eq!(parse_amount("45"), Some(45.0));
        assert_eq!(parse_amount("1.2.3"), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn test_extract_amounts_sorted_descending() {
        let extractor = AmountExtractor::new();
        let text = "Total: $1,234.56\nAmount Due $99.00";

        assert_eq!(extractor.values(text), vec![1234.56, 99.00]);
    }

    #[test]
    fn test_duplicates_are_collapsed() {
        let extractor = AmountExtractor::new();
        let text = "Subtotal $50.00\nTotal: 50.00\nBalance $50.00";

        assert_eq!(extractor.values(text), vec![50.0]);
    }

    #[test]
    fn test_out_of_range_amounts_are_dropped() {
        let extractor = AmountExtractor::new();
        let text = "Price $0.00 and $2,000,000.00";

        assert!(extractor.values(text).is_empty());
    }

    #[test]
    fn test_custom_range() {
        let extractor = AmountExtractor::with_range(10.0, 100.0);
        let text = "$5.00 $50.00 $500.00";

        assert_eq!(extractor.values(text), vec![50.0]);
    }

    #[test]
    fn test_currency_codes_are_discarded() {
        let extractor = AmountExtractor::new();
        let text = "USD 1,250.00 and CAD 80.50";

        assert_eq!(extractor.values(text), vec![1250.0, 80.5]);
    }

    #[test]
    fn test_labeled_amount_without_cents() {
        let extractor = AmountExtractor::new();

        assert_eq!(extractor.values("Total 45 items"), vec![45.0]);
    }

    #[test]
    fn test_first_pattern_claims_the_value() {
        let extractor = AmountExtractor::new();
        let found = extractor.extract("Amount: $75.25").unwrap();

        assert_eq!(found.value, 75.25);
        assert_eq!(found.pattern, "dollar_grouped");
        assert_eq!(found.source, "$75.25");
        assert_eq!(found.position, Some((8, 14)));
    }

    #[test]
    fn test_no_amounts() {
        let extractor = AmountExtractor::new();

        assert!(extractor.extract_all("").is_empty());
        assert!(extractor.extract("thank you for your business").is_none());
    }
}
