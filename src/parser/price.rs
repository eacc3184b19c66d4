//! Price text normalization
//!
//! Turns the free-form price label of a listing ("$1,234.50", "US $9.99",
//! "$10.00 to $20.00") into a single positive amount.

use regex::Regex;
use std::sync::LazyLock;

use crate::models::MAX_PRICE;

static CURRENCY_MARKER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:USD|GBP|EUR|CAD|AUD)\b|\b(?:US|AU|C|CA)\s*\$|[$£€]").unwrap()
});

static NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+(?:\.[0-9]+)?").unwrap());

/// Normalize a price label into a value in `(0, 1_000_000)`
///
/// Currency markers and thousands separators are removed, then the first
/// decimal or integer substring is parsed. Returns `None` when nothing
/// numeric is found or the value is out of range. Never panics.
///
/// # Examples
///
/// ```
/// use flipfinder::parser::price::normalize_price;
///
/// assert_eq!(normalize_price("$1,234.50"), Some(1234.50));
/// assert_eq!(normalize_price("Free"), None);
/// ```
pub fn normalize_price(text: &str) -> Option<f64> {
    let stripped = CURRENCY_MARKER_REGEX.replace_all(text, " ");
    let cleaned = stripped.replace(',', "");

    let value: f64 = NUMBER_REGEX.find(&cleaned)?.as_str().parse().ok()?;

    (value.is_finite() && value > 0.0 && value < MAX_PRICE).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dollar_with_thousands_separator() {
        assert_eq!(normalize_price("$1,234.50"), Some(1234.50));
    }

    #[test]
    fn test_usd_prefix() {
        assert_eq!(normalize_price("USD 9.99"), Some(9.99));
        assert_eq!(normalize_price("US $9.99"), Some(9.99));
        assert_eq!(normalize_price("C $15"), Some(15.0));
    }

    #[test]
    fn test_non_numeric_is_none() {
        assert_eq!(normalize_price("Free"), None);
        assert_eq!(normalize_price(""), None);
        assert_eq!(normalize_price("   "), None);
    }

    #[test]
    fn test_zero_and_out_of_range() {
        assert_eq!(normalize_price("$0.00"), None);
        assert_eq!(normalize_price("$1,000,000.00"), None);
        assert_eq!(normalize_price("$999,999.99"), Some(999_999.99));
    }

    #[test]
    fn test_price_range_takes_first_value() {
        assert_eq!(normalize_price("$10.00 to $20.00"), Some(10.0));
    }

    #[test]
    fn test_surrounding_text() {
        assert_eq!(normalize_price("Sold for $45.00 + shipping"), Some(45.0));
        assert_eq!(normalize_price("£12.30"), Some(12.30));
    }

    #[test]
    fn test_integer_price() {
        assert_eq!(normalize_price("$250"), Some(250.0));
    }

    #[test]
    fn test_huge_digit_run_does_not_panic() {
        let text = "9".repeat(400);
        assert_eq!(normalize_price(&text), None);
    }
}
