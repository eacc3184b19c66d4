use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, USER_AGENT,
};

/// Desktop browser identity sent with every search request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Build browser-like headers for marketplace search pages
///
/// An unparseable `user_agent` falls back to [`DEFAULT_USER_AGENT`].
///
/// # Examples
///
/// ```
/// use flipfinder::crawler::headers::{build_browser_headers, DEFAULT_USER_AGENT};
///
/// let headers = build_browser_headers(DEFAULT_USER_AGENT);
/// assert!(headers.contains_key(reqwest::header::USER_AGENT));
/// ```
pub fn build_browser_headers(user_agent: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();

    let agent = HeaderValue::from_str(user_agent)
        .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT));
    headers.insert(USER_AGENT, agent);
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));

    // Sec-Fetch headers for modern browser compatibility
    headers.insert(
        HeaderName::from_static("sec-fetch-dest"),
        HeaderValue::from_static("document"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-mode"),
        HeaderValue::from_static("navigate"),
    );

    headers
}
