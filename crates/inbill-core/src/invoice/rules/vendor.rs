//! Vendor name resolution.
//!
//! Tries the document body, then the email subject, then the sender header.
//! The first tier that yields a long enough name wins.

use serde::{Deserialize, Serialize};

use super::patterns::{ANGLE_FRAGMENT, SUBJECT_FROM, VENDOR_DISALLOWED};
use crate::models::config::ExtractionConfig;

/// Source a vendor name was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VendorTier {
    Body,
    Subject,
    Sender,
}

/// A resolved vendor name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorMatch {
    pub name: String,
    pub tier: VendorTier,
}

/// Vendor name resolver.
#[derive(Debug, Clone)]
pub struct VendorResolver {
    scan_lines: usize,
    min_len: usize,
    company_indicators: Vec<String>,
    header_tokens: Vec<String>,
}

impl VendorResolver {
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            scan_lines: config.vendor_scan_lines,
            min_len: config.min_vendor_len,
            company_indicators: config.company_indicators.clone(),
            header_tokens: config.header_tokens.clone(),
        }
    }

    /// Resolve a vendor name from the document and its email metadata.
    pub fn resolve(&self, text: &str, subject: &str, sender: &str) -> Option<VendorMatch> {
        self.from_body(text)
            .map(|name| VendorMatch { name, tier: VendorTier::Body })
            .or_else(|| {
                self.from_subject(subject)
                    .map(|name| VendorMatch { name, tier: VendorTier::Subject })
            })
            .or_else(|| {
                self.from_sender(sender)
                    .map(|name| VendorMatch { name, tier: VendorTier::Sender })
            })
    }

    /// First company-looking line near the top of the document.
    pub fn from_body(&self, text: &str) -> Option<String> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .take(self.scan_lines)
            .filter(|line| !self.is_header(line))
            .filter(|line| self.has_company_indicator(line))
            .map(clean_vendor_name)
            .find(|name| self.is_acceptable(name))
    }

    /// Text after the word "from" in the subject, minus any `<...>` address.
    pub fn from_subject(&self, subject: &str) -> Option<String> {
        let m = SUBJECT_FROM.find(subject)?;
        let rest = &subject[m.end()..];
        let name = ANGLE_FRAGMENT.replace_all(rest, "").trim().to_string();

        self.is_acceptable(&name).then_some(name)
    }

    /// Display name of the sender, or the mailbox part of a bare address.
    pub fn from_sender(&self, sender: &str) -> Option<String> {
        let raw = if let Some((display, _)) = sender.split_once('<') {
            display
        } else if let Some((mailbox, _)) = sender.split_once('@') {
            mailbox
        } else {
            sender
        };

        let name = clean_vendor_name(raw);
        self.is_acceptable(&name).then_some(name)
    }

    fn is_header(&self, line: &str) -> bool {
        self.header_tokens.iter().any(|h| h.eq_ignore_ascii_case(line))
    }

    fn has_company_indicator(&self, line: &str) -> bool {
        self.company_indicators
            .iter()
            .any(|indicator| line.contains(indicator.as_str()))
    }

    fn is_acceptable(&self, name: &str) -> bool {
        !name.is_empty() && name.chars().count() >= self.min_len
    }
}

impl Default for VendorResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Keep word characters, whitespace, `&`, `.` and `,`; trim the ends.
pub fn clean_vendor_name(s: &str) -> String {
    VENDOR_DISALLOWED.replace_all(s, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_body_first_line_with_suffix() {
        let resolver = VendorResolver::new();
        let text = "Acme Solutions LLC\n123 Main St\nINVOICE";

        let found = resolver.resolve(text, "", "").unwrap();
        assert_eq!(found.name, "Acme Solutions LLC");
        assert_eq!(found.tier, VendorTier::Body);
    }

    #[test]
    fn test_body_skips_headers_and_blank_lines() {
        let resolver = VendorResolver::new();
        let text = "\n   \nInvoice\n\n* Globex Corp. *\n";

        assert_eq!(resolver.from_body(text), Some("Globex Corp.".to_string()));
    }

    #[test]
    fn test_body_only_scans_first_lines() {
        let resolver = VendorResolver::new();
        let text = "one\ntwo\nthree\nfour\nfive\nLate Arrivals Inc";

        assert_eq!(resolver.from_body(text), None);
    }

    #[test]
    fn test_body_indicator_is_case_sensitive() {
        let resolver = VendorResolver::new();

        assert_eq!(resolver.from_body("acme llc\nthanks"), None);
    }

    #[test]
    fn test_subject_tier() {
        let resolver = VendorResolver::new();
        let found = resolver
            .resolve(
                "",
                "Invoice INV-2024-0007 from Acme Corp <ap@acme.com>",
                "Someone Else <x@y.com>",
            )
            .unwrap();

        assert_eq!(found.name, "Acme Corp");
        assert_eq!(found.tier, VendorTier::Subject);
    }

    #[test]
    fn test_subject_without_from_falls_through() {
        let resolver = VendorResolver::new();
        let found = resolver.resolve("", "Your invoice", "Acme Corp <ap@acme.com>").unwrap();

        assert_eq!(found.name, "Acme Corp");
        assert_eq!(found.tier, VendorTier::Sender);
    }

    #[test]
    fn test_short_subject_candidate_falls_through() {
        let resolver = VendorResolver::new();
        let found = resolver.resolve("", "Bill from IBM", "billing@initech.com").unwrap();

        assert_eq!(found.name, "billing");
        assert_eq!(found.tier, VendorTier::Sender);
    }

    #[test]
    fn test_sender_forms() {
        let resolver = VendorResolver::new();

        assert_eq!(
            resolver.from_sender("\"Umbrella Group\" <ar@umbrella.com>"),
            Some("Umbrella Group".to_string())
        );
        assert_eq!(resolver.from_sender("accounts@vendor.io"), Some("accounts".to_string()));
        assert_eq!(resolver.from_sender("Initech"), Some("Initech".to_string()));
        assert_eq!(resolver.from_sender("ap@x.io"), None);
        assert_eq!(resolver.from_sender(""), None);
    }

    #[test]
    fn test_nothing_resolves() {
        let resolver = VendorResolver::new();

        assert_eq!(resolver.resolve("", "", ""), None);
    }

    #[test]
    fn test_clean_vendor_name() {
        assert_eq!(clean_vendor_name("  Smith & Sons, Ltd.™ "), "Smith & Sons, Ltd.");
        assert_eq!(clean_vendor_name("<<>>"), "");
    }
}
