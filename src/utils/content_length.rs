//! Content length extraction utilities.
//!
//! Supports both Content-Range and Content-Length headers, so a transfer can
//! learn the full size of a resource whether the response is a plain `200`
//! or a ranged `206`.

use reqwest::Response;

/// Extracts the full resource size from a response.
///
/// A `Content-Range` header (present on ranged responses) names the total
/// after the slash and wins; otherwise `Content-Length` plus the starting
/// offset is used. Returns `None` when neither is usable.
pub fn get_content_length(response: &Response, offset: u64) -> Option<u64> {
    if let Some(content_range) = response.headers().get("Content-Range") {
        // Content-Range format is typically: "bytes 200-1023/230917262"
        content_range
            .to_str()
            .ok()
            .and_then(parse_content_range_total)
    } else {
        response.content_length().map(|len| len + offset)
    }
}

/// Parses a `Content-Range` header value, extracting the total size.
///
/// # Example
///
/// ```rust
/// use hauler::utils::parse_content_range_total;
///
/// let total = parse_content_range_total("bytes 0-1023/2048");
/// assert_eq!(total, Some(2048));
/// ```
pub fn parse_content_range_total(content_range: &str) -> Option<u64> {
    content_range
        .split('/')
        .next_back()
        .and_then(|size| size.trim().parse::<u64>().ok())
}
