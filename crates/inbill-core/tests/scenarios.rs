use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use inbill_core::{
    ConfidenceScore, ContentType, DocumentProcessor, ExtractionOutcome, NoopObserver, RawDocument,
};

fn processor() -> DocumentProcessor {
    DocumentProcessor::new().with_observer(Arc::new(NoopObserver))
}

fn pdf(text: &str) -> RawDocument {
    RawDocument::new(text, "application/pdf", "", "")
}

const CORPUS: &[&str] = &[
    "",
    "   \n\t",
    "Total: $1,234.56\nAmount Due $99.00",
    "$1234.56 $1,234.56 USD 1234.56 Balance 1234.56",
    "Price $0.00, deposit $0.01, cap $1,000,000.00, over $1,000,000.01",
    "12.34.56 $ .99 1,2,3.45 $$$ 9999999.99",
    "01/15/2024 01-15-2024 2024-01-15 January 15, 2024 Jan 15 2024 13/45/2024",
    "Invoice #: INV-2024-0001 Reference: REF123456 ABC1234567 INV-2024-0001",
    "Globex Corp\nINVOICE\nBill # GX-20240101\nDue date 03/01/2024\nBalance Due: $4,500.00",
    "Ünïcödé Group Ltd™\n€ 12,50 — £3.20 — $7.25",
];

#[test]
fn scenario_a_amounts_descending() {
    let result = processor().process(&pdf("Total: $1,234.56\nAmount Due $99.00"));

    assert_eq!(result.amounts, vec![1234.56, 99.00]);
}

#[test]
fn scenario_b_vendor_from_first_line() {
    let result = processor().process(&pdf("Acme Solutions LLC\n1 Main St\nTotal $10.00"));

    assert_eq!(result.vendor_name.as_deref(), Some("Acme Solutions LLC"));
}

#[test]
fn scenario_c_vendor_from_subject_when_text_is_empty() {
    let doc = RawDocument::new(
        "",
        "application/pdf",
        "Invoice INV-2024-0007 from Acme Corp <ap@acme.com>",
        "Acme Corp <ap@acme.com>",
    );
    let result = processor().process(&doc);

    assert_eq!(result.vendor_name.as_deref(), Some("Acme Corp"));
    assert_eq!(result.outcome, ExtractionOutcome::EmptyText);
    // The subject is metadata only; it is not scanned for invoice numbers.
    assert!(result.invoice_numbers.is_empty());
}

#[test]
fn scenario_d_repeated_date_kept_once() {
    let result = processor().process(&pdf("Issued 01/15/2024\nShipped 01/15/2024"));

    assert_eq!(result.dates, vec![NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()]);
}

#[test]
fn scenario_e_unsupported_content_type() {
    let doc = RawDocument::new(
        "Acme Corp\nTotal $5.00 on 01/15/2024 INV-2024-0001",
        "text/plain",
        "Invoice from Acme Corp",
        "Acme Corp <ap@acme.com>",
    );
    let result = processor().process(&doc);

    assert_eq!(result.content_type, ContentType::Unsupported);
    assert_eq!(result.outcome, ExtractionOutcome::UnsupportedContentType);
    assert!(result.amounts.is_empty());
    assert!(result.dates.is_empty());
    assert!(result.invoice_numbers.is_empty());
    assert_eq!(result.vendor_name, None);
    assert_eq!(ConfidenceScore::of(&result).value(), 0.0);
}

#[test]
fn amounts_are_strictly_descending_and_in_range() {
    let processor = processor();

    for text in CORPUS {
        let amounts = processor.process(&pdf(text)).amounts;

        assert!(
            amounts.windows(2).all(|w| w[0] > w[1]),
            "not strictly descending for {:?}: {:?}",
            text,
            amounts
        );
        assert!(
            amounts.iter().all(|a| (0.01..=1_000_000.0).contains(a)),
            "out of range for {:?}: {:?}",
            text,
            amounts
        );
    }
}

#[test]
fn amount_range_bounds_are_inclusive() {
    let result = processor().process(&pdf(CORPUS[4]));

    assert_eq!(result.amounts, vec![1_000_000.0, 0.01]);
}

#[test]
fn extraction_is_deterministic() {
    let processor = processor();

    for text in CORPUS {
        let doc = RawDocument::new(*text, "image/jpeg", "Invoice from Globex Corp", "x@y.com");
        assert_eq!(processor.process(&doc), processor.process(&doc));
        assert_eq!(processor.process(&doc), DocumentProcessor::new().process(&doc));
    }
}

#[test]
fn dates_and_invoice_numbers_have_no_duplicates() {
    let processor = processor();

    for text in CORPUS {
        let result = processor.process(&pdf(text));

        let dates: HashSet<_> = result.dates.iter().collect();
        assert_eq!(dates.len(), result.dates.len(), "{:?}", text);

        let numbers: HashSet<_> = result.invoice_numbers.iter().collect();
        assert_eq!(numbers.len(), result.invoice_numbers.len(), "{:?}", text);
    }
}

#[test]
fn confidence_is_a_quarter_step() {
    let processor = processor();
    let allowed = [0.0, 0.25, 0.5, 0.75, 1.0];

    for text in CORPUS {
        for mime in ["application/pdf", "image/png", "text/plain"] {
            let doc = RawDocument::new(*text, mime, "", "Globex Corp <ar@globex.com>");
            let score = ConfidenceScore::of(&processor.process(&doc)).value();
            assert!(allowed.contains(&score), "{} for {:?}", score, text);
        }
    }
}

#[test]
fn mixed_document() {
    let result = processor().process(&pdf(CORPUS[8]));

    assert_eq!(result.vendor_name.as_deref(), Some("Globex Corp"));
    assert_eq!(result.invoice_numbers, vec!["GX-20240101".to_string()]);
    assert_eq!(result.dates, vec![NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()]);
    assert_eq!(result.amounts, vec![4500.0]);
    assert_eq!(ConfidenceScore::of(&result).value(), 1.0);
}

#[test]
fn result_serializes_to_json() {
    let result = processor().process(&pdf("Total: $1,234.56 on 2024-01-15"));
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["amounts"][0], 1234.56);
    assert_eq!(json["dates"][0], "2024-01-15");
    assert_eq!(json["content_type"], "pdf");
    assert_eq!(json["outcome"], "extracted");
    assert!(json.get("vendor_name").is_none());
}
