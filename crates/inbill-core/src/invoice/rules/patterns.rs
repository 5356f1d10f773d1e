//! Pattern library for invoice and receipt field extraction.
//!
//! Each field kind has an ordered [`PatternSet`]. Patterns run in descending
//! priority, which is also their declaration order, so the most specific
//! layout gets first claim on a value.

use lazy_static::lazy_static;
use regex::{Captures, Match, Regex};

/// Field a pattern produces candidates for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Amount,
    Date,
    InvoiceNumber,
}

/// A compiled pattern with its priority and the capture group holding the value.
#[derive(Debug)]
pub struct FieldPattern {
    /// Field this pattern extracts.
    pub kind: FieldKind,
    /// Short identifier used in logs and tests.
    pub name: &'static str,
    /// Compiled expression.
    pub regex: Regex,
    /// Higher runs first.
    pub priority: u8,
    /// Group holding the value; `None` means the whole match.
    pub capture_group: Option<usize>,
}

impl FieldPattern {
    fn new(
        kind: FieldKind,
        name: &'static str,
        pattern: &str,
        priority: u8,
        capture_group: Option<usize>,
    ) -> Self {
        Self {
            kind,
            name,
            regex: Regex::new(pattern).unwrap(),
            priority,
            capture_group,
        }
    }

    /// The value-bearing part of one match.
    pub fn candidate<'t>(&self, caps: &Captures<'t>) -> Option<Match<'t>> {
        caps.get(self.capture_group.unwrap_or(0))
    }

    /// Every non-overlapping candidate in `text`, left to right.
    pub fn candidates<'t>(&self, text: &'t str) -> impl Iterator<Item = Match<'t>> {
        self.regex
            .captures_iter(text)
            .filter_map(|caps| self.candidate(&caps))
    }
}

/// Patterns for one field kind, ordered by descending priority.
#[derive(Debug)]
pub struct PatternSet {
    patterns: Vec<FieldPattern>,
}

impl PatternSet {
    /// Build a set; ties keep their declared order.
    pub fn new(mut patterns: Vec<FieldPattern>) -> Self {
        patterns.sort_by(|a, b| b.priority.cmp(&a.priority));
        Self { patterns }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldPattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl<'a> IntoIterator for &'a PatternSet {
    type Item = &'a FieldPattern;
    type IntoIter = std::slice::Iter<'a, FieldPattern>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Textual layout of a date; decides which format templates are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateShape {
    /// `01/15/2024`, month first.
    SlashMonthFirst,
    /// `01-15-2024`, month first.
    DashMonthFirst,
    /// `2024-01-15`.
    Iso,
    /// `January 15, 2024`.
    FullMonthName,
    /// `Jan 15 2024`.
    AbbreviatedMonthName,
}

impl DateShape {
    /// `chrono` format strings tried in order for this shape.
    pub fn templates(&self) -> &'static [&'static str] {
        match self {
            Self::SlashMonthFirst => &["%m/%d/%Y"],
            Self::DashMonthFirst => &["%m-%d-%Y"],
            Self::Iso => &["%Y-%m-%d"],
            Self::FullMonthName => &["%B %d, %Y", "%B %d %Y"],
            // The abbreviated pattern also matches full names ("Jan" + "uary").
            Self::AbbreviatedMonthName => &["%b %d, %Y", "%b %d %Y", "%B %d, %Y", "%B %d %Y"],
        }
    }
}

lazy_static! {
    // Amounts: symbol-prefixed first, then labeled, then bare decimals.
    pub static ref AMOUNT_PATTERNS: PatternSet = PatternSet::new(vec![
        FieldPattern::new(
            FieldKind::Amount,
            "dollar_grouped",
            r"(?i)\$\s*\d{1,3}(?:,\d{3})*(?:\.\d{2})",
            100,
            None,
        ),
        FieldPattern::new(
            FieldKind::Amount,
            "dollar_plain",
            r"(?i)\$\s*\d+\.\d{2}",
            90,
            None,
        ),
        FieldPattern::new(
            FieldKind::Amount,
            "labeled",
            r"(?i)(?:Total|Amount|Due|Balance)[\s:]*\$?\s*(\d{1,3}(?:,\d{3})*(?:\.\d{2})?)",
            80,
            Some(1),
        ),
        FieldPattern::new(
            FieldKind::Amount,
            "currency_code",
            r"(?i)(?:USD|CAD)?\s*\$?\s*(\d{1,3}(?:,\d{3})*(?:\.\d{2}))",
            70,
            Some(1),
        ),
    ]);

    // Dates: one pattern per shape.
    pub static ref DATE_PATTERNS: Vec<(DateShape, FieldPattern)> = vec![
        (
            DateShape::SlashMonthFirst,
            FieldPattern::new(FieldKind::Date, "slash_mdy", r"\d{1,2}/\d{1,2}/\d{4}", 100, None),
        ),
        (
            DateShape::DashMonthFirst,
            FieldPattern::new(FieldKind::Date, "dash_mdy", r"\d{1,2}-\d{1,2}-\d{4}", 90, None),
        ),
        (
            DateShape::Iso,
            FieldPattern::new(FieldKind::Date, "iso", r"\d{4}-\d{1,2}-\d{1,2}", 80, None),
        ),
        (
            DateShape::FullMonthName,
            FieldPattern::new(
                FieldKind::Date,
                "month_name",
                r"(?i)(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2},?\s+\d{4}",
                70,
                None,
            ),
        ),
        (
            DateShape::AbbreviatedMonthName,
            FieldPattern::new(
                FieldKind::Date,
                "month_abbrev",
                r"(?i)(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\s+\d{1,2},?\s+\d{4}",
                60,
                None,
            ),
        ),
    ];

    // Invoice numbers behind a label, matched without regard to case.
    pub static ref INVOICE_CONTEXTUAL_PATTERNS: PatternSet = PatternSet::new(vec![
        FieldPattern::new(
            FieldKind::InvoiceNumber,
            "invoice_coded",
            r"(?i)\binvoice\s*#?\s*:?\s*([A-Z]{2,4}-\d{4}-\d{4,6})",
            100,
            Some(1),
        ),
        FieldPattern::new(
            FieldKind::InvoiceNumber,
            "inv_coded",
            r"(?i)\binv\s*#?\s*:?\s*([A-Z]{2,4}-\d{4}-\d{4,6})",
            90,
            Some(1),
        ),
        FieldPattern::new(
            FieldKind::InvoiceNumber,
            "invoice_number",
            r"(?i)\binvoice\s*(?:number|no|#)\s*:?\s*([A-Z0-9-]{6,})",
            80,
            Some(1),
        ),
        FieldPattern::new(
            FieldKind::InvoiceNumber,
            "bill",
            r"(?i)\bbill\s*#?\s*:?\s*([A-Z0-9-]{6,})",
            70,
            Some(1),
        ),
        FieldPattern::new(
            FieldKind::InvoiceNumber,
            "reference",
            r"(?i)\breference\s*#?\s*:?\s*([A-Z0-9-]{6,})",
            60,
            Some(1),
        ),
    ]);

    // Bare invoice codes, recognised by shape alone.
    pub static ref INVOICE_STANDALONE_PATTERNS: PatternSet = PatternSet::new(vec![
        FieldPattern::new(
            FieldKind::InvoiceNumber,
            "coded",
            r"\b([A-Z]{2,4}-\d{4}-\d{4,6})\b",
            50,
            Some(1),
        ),
        FieldPattern::new(
            FieldKind::InvoiceNumber,
            "letters_digits",
            r"\b([A-Z]{3,}\d{6,})\b",
            40,
            Some(1),
        ),
    ]);

    // Vendor name cleanup
    pub static ref VENDOR_DISALLOWED: Regex = Regex::new(r"[^\w\s&.,]").unwrap();

    pub static ref ANGLE_FRAGMENT: Regex = Regex::new(r"<.*?>").unwrap();

    pub static ref SUBJECT_FROM: Regex = Regex::new(r"(?i)\bfrom\b").unwrap();
}
