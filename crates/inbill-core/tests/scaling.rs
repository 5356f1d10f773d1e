use std::time::{Duration, Instant};

use inbill_core::invoice::rules::{AmountExtractor, DateExtractor, InvoiceNumberExtractor};

/// Fastest of three runs, to keep scheduler noise out of the comparison.
fn best_of_three(f: impl Fn()) -> Duration {
    (0..3)
        .map(|_| {
            let start = Instant::now();
            f();
            start.elapsed()
        })
        .min()
        .unwrap_or_default()
}

/// `make(n)` must build text whose match count grows linearly with `n`.
/// An 8x larger input may take at most 24x as long.
fn assert_near_linear(make: impl Fn(usize) -> String, run: impl Fn(&str) -> usize) {
    let small = make(2_500);
    let large = make(20_000);

    assert_eq!(run(&small) * 8, run(&large));

    let small_time = best_of_three(|| {
        run(&small);
    });
    let large_time = best_of_three(|| {
        run(&large);
    });

    let ratio = large_time.as_secs_f64() / small_time.as_secs_f64().max(1e-6);
    assert!(
        ratio < 24.0,
        "8x input took {:.1}x as long ({:?} vs {:?})",
        ratio,
        large_time,
        small_time
    );
}

#[test]
fn distinct_amounts_scale_linearly() {
    let extractor = AmountExtractor::new();

    assert_near_linear(
        |n| (0..n).map(|i| format!("${}.{:02} ", i / 100 + 1, i % 100)).collect(),
        |text| extractor.values(text).len(),
    );
}

#[test]
fn labeled_invoice_numbers_scale_linearly() {
    let extractor = InvoiceNumberExtractor::new();

    assert_near_linear(
        |n| (0..n).map(|i| format!("Bill # ABC{:07} ", i)).collect(),
        |text| extractor.values(text).len(),
    );
}

#[test]
fn repeated_dates_collapse_without_slowdown() {
    let extractor = DateExtractor::new();
    let text = "01/15/2024 2024-01-15 ".repeat(20_000);

    let start = Instant::now();
    assert_eq!(extractor.values(&text).len(), 1);
    assert!(start.elapsed() < Duration::from_secs(10));
}
