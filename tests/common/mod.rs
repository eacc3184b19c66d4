//! Shared fixtures for integration tests

#![allow(dead_code)]

use flipfinder::config::FetcherConfig;

/// One listing block using the exact info-container class signature
pub fn info_block(title: &str, price: &str, href: &str) -> String {
    format!(
        r#"<div class="s-item__info clearfix">
             <a href="{href}"></a>
             <div class="s-item__title"><span>{title}</span></div>
             <span class="s-item__price">{price}</span>
           </div>"#
    )
}

/// Sponsored slot that always occupies the first position
pub fn sponsored_block() -> String {
    info_block("Shop on eBay", "$20.00", "https://ebay.com/itm/sponsored")
}

/// A results page: sponsored slot followed by `blocks`
pub fn results_page(blocks: &[String]) -> String {
    format!(
        "<!DOCTYPE html><html><body><ul class=\"srp-results\">{}{}</ul></body></html>",
        sponsored_block(),
        blocks.concat()
    )
}

/// A results page with `n` valid listings priced $1.00, $2.00, ...
pub fn numbered_page(n: usize) -> String {
    let blocks: Vec<String> = (1..=n)
        .map(|i| {
            info_block(
                &format!("Widget {i}"),
                &format!("${i}.00"),
                &format!("https://ebay.com/itm/{i}?hash=abc"),
            )
        })
        .collect();
    results_page(&blocks)
}

/// Fetcher configuration pointed at a mock server
pub fn mock_fetcher_config(uri: &str) -> FetcherConfig {
    FetcherConfig {
        base_url: Some(uri.to_string()),
        user_agent: "flipfinder-test/1.0".to_string(),
        request_timeout_secs: 5,
        accept_invalid_certs: false,
    }
}
