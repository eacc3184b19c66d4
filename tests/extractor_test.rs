//! Integration tests for ListingExtractor against fixture documents

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use flipfinder::parser::{ListingExtractor, SelectorCascade, SelectorTier};
use scraper::Selector;

/// Tier that counts how often it is consulted
fn counting_tier(name: &'static str, css: &str, hits: Arc<AtomicUsize>) -> SelectorTier {
    let selector = Selector::parse(css).unwrap();
    SelectorTier::new(name, move |document| {
        hits.fetch_add(1, Ordering::SeqCst);
        document.select(&selector).collect()
    })
}

#[test]
fn test_sponsored_plus_three_yields_two_in_order() {
    let html = common::results_page(&[
        common::info_block("Nintendo Switch OLED", "$10.00", "https://x/item/1?hash=a"),
        common::info_block("Nintendo Switch Lite", "$25.50", "https://x/item/2?hash=b"),
        common::info_block("Broken Switch", "$0.00", "https://x/item/3?hash=c"),
    ]);

    let (records, report) = ListingExtractor::new().extract_with_report(&html);

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].title, "Nintendo Switch OLED");
    assert_eq!(records[0].price.value, 10.00);
    assert_eq!(records[0].url, "https://x/item/1");
    assert_eq!(records[1].title, "Nintendo Switch Lite");
    assert_eq!(records[1].price.value, 25.50);
    assert_eq!(records[1].url, "https://x/item/2");

    assert_eq!(report.tier, Some("s-item__info clearfix"));
    assert_eq!(report.candidates, 4);
    assert_eq!(report.accepted, 2);
}

#[test]
fn test_placeholder_title_excluded_regardless_of_price() {
    let html = common::results_page(&[
        common::info_block("SHOP ON EBAY", "$15.00", "https://x/item/1"),
        common::info_block("Real Listing", "$15.00", "https://x/item/2"),
    ]);

    let records = ListingExtractor::new().extract(&html);

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "Real Listing");
}

#[test]
fn test_loose_tier_used_when_exact_signature_missing() {
    let html = r#"<html><body>
        <div class="s-item__info s-item__info--v2"><div class="s-item__title">Sponsored</div>
            <span class="s-item__price">$1.00</span><a href="https://x/0"></a></div>
        <div class="s-item__info s-item__info--v2"><div class="s-item__title">Camera</div>
            <span class="s-item__price">US $199.99</span><a href="https://x/1?x=y"></a></div>
    </body></html>"#;

    let (records, report) = ListingExtractor::new().extract_with_report(html);

    assert_eq!(report.tier, Some("s-item__info*"));
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "Camera");
    assert_eq!(records[0].price.value, 199.99);
    assert_eq!(records[0].url, "https://x/1");
}

#[test]
fn test_structural_tier_fallback() {
    let html = r#"<html><body><ul class="srp-results">
        <li><div class="s-item"><div class="s-item__title">Sponsored</div></div></li>
        <li><div class="s-item"><a href="https://x/7"></a>
            <div class="s-item__title"><span>Vintage Lens</span></div>
            <span class="s-item__price">$1,250.00</span></div></li>
    </ul></body></html>"#;

    let (records, report) = ListingExtractor::new().extract_with_report(html);

    assert_eq!(report.tier, Some("div.s-item"));
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].price.value, 1250.0);
}

#[test]
fn test_cascade_stops_at_first_matching_tier() {
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));
    let third = Arc::new(AtomicUsize::new(0));

    let cascade = SelectorCascade::new(vec![
        counting_tier("exact", r#"div[class="s-item__info clearfix"]"#, first.clone()),
        counting_tier("loose", r#"div[class*="s-item__info"]"#, second.clone()),
        counting_tier("structural", "div.s-item", third.clone()),
    ]);
    let extractor = ListingExtractor::with_cascade(cascade);

    // Matches the loose tier but not the exact one
    let html = r#"<html><body>
        <div class="s-item"><div class="s-item__info"><div class="s-item__title">Ad</div></div></div>
        <div class="s-item"><div class="s-item__info"><a href="https://x/1"></a>
            <div class="s-item__title">Headphones</div>
            <span class="s-item__price">$49.00</span></div></div>
    </body></html>"#;

    let (records, report) = extractor.extract_with_report(html);

    assert_eq!(report.tier, Some("loose"));
    assert_eq!(records.len(), 1);
    assert_eq!(first.load(Ordering::SeqCst), 1);
    assert_eq!(second.load(Ordering::SeqCst), 1);
    assert_eq!(third.load(Ordering::SeqCst), 0, "lower tier must not be consulted");
}

#[test]
fn test_no_tier_matches() {
    let (records, report) =
        ListingExtractor::new().extract_with_report("<html><body><p>captcha</p></body></html>");

    assert!(records.is_empty());
    assert_eq!(report.tier, None);
    assert_eq!(report.candidates, 0);
}

#[test]
fn test_candidate_cap_bounds_accepted_records() {
    let html = common::numbered_page(40);

    let records = ListingExtractor::new().extract(&html);
    assert_eq!(records.len(), 15);
    assert_eq!(records[0].title, "Widget 1");
    assert_eq!(records[14].title, "Widget 15");

    let records = ListingExtractor::new().candidate_cap(3).extract(&html);
    assert_eq!(records.len(), 3);
}

#[test]
fn test_malformed_block_skipped_not_fatal() {
    let html = common::results_page(&[
        common::info_block("", "$5.00", "https://x/1"),
        common::info_block("No Price", "Free", "https://x/2"),
        common::info_block("Too Expensive", "$1,000,000.00", "https://x/3"),
        common::info_block("Keeper", "$5.00", "https://x/4?hash=abc"),
    ]);

    let records = ListingExtractor::new().extract(&html);

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "Keeper");
    assert_eq!(records[0].url, "https://x/4");
}
