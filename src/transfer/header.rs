//! Header metadata retrieved by a probe-only request.

/// Metadata from a HEAD-style probe of a remote resource.
///
/// The transfer core interprets two things out of it: whether the remote
/// supports range resumption and what content length it reports. The raw
/// validator fields are carried for callers that pre-check resources before
/// committing to a full download.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderInfo {
    /// Reported size of the resource, if the remote names one.
    pub content_length: Option<u64>,
    /// Whether the remote advertises byte-range requests.
    pub accept_ranges: bool,
    /// `Last-Modified` header value, verbatim.
    pub last_modified: Option<String>,
    /// `ETag` header value, verbatim.
    pub etag: Option<String>,
}

impl HeaderInfo {
    /// Whether a partial transfer of this resource can be resumed.
    pub fn is_resumable(&self) -> bool {
        self.accept_ranges
    }
}
