//! Probe-only header retrieval.

use crate::error::{Error, Result};
use crate::transfer::HeaderInfo;

use reqwest::header::{ACCEPT_RANGES, CONTENT_LENGTH, ETAG, LAST_MODIFIED};
use reqwest::Url;
use reqwest_middleware::ClientWithMiddleware;
use tracing::debug;

/// Issues a HEAD request and interprets the resumability and size headers.
///
/// No body is transferred. Every failure — request error, error status,
/// unparsable headers aside — surfaces as [`Error::PrepareHeader`].
pub async fn probe_header(client: &ClientWithMiddleware, url: &Url) -> Result<HeaderInfo> {
    debug!("Probing headers for {}", url);
    let res = client
        .head(url.clone())
        .send()
        .await
        .map_err(|e| Error::PrepareHeader(e.to_string()))?;

    let res = res
        .error_for_status()
        .map_err(|e| Error::PrepareHeader(e.to_string()))?;

    let headers = res.headers();

    let accept_ranges = match headers.get(ACCEPT_RANGES) {
        None => false,
        Some(v) if v == "none" => false,
        Some(_) => true,
    };

    let content_length = headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());

    let last_modified = headers
        .get(LAST_MODIFIED)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let etag = headers
        .get(ETAG)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    Ok(HeaderInfo {
        content_length,
        accept_ranges,
        last_modified,
        etag,
    })
}
