//! The description of one requested transfer.
//!
//! A [`TransferUnit`] names a source URL, a storage destination and a
//! caller-chosen correlation id. Units are built by the public download
//! operations (or directly by the caller for batch downloads), validated at
//! dispatch time, and discarded once the transfer concludes.

use crate::error::{ErrorKind, TransferError};

use reqwest::Url;
use std::path::PathBuf;

/// Represents one logical request to fetch a single URL to a single
/// destination.
///
/// `custom_id` need not be unique — it is the correlation key echoed back
/// through every callback concerning this unit. An empty `storage_path`
/// means the unit has no destination and is rejected at dispatch; transfers
/// into memory go through
/// [`download_to_buffer`](crate::downloader::Downloader::download_to_buffer)
/// with the caller's own buffer and never appear in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferUnit {
    /// URL of the resource to fetch.
    pub source_url: String,
    /// Local destination. A directory (or a path ending with a separator)
    /// is joined with the filename derived from the URL.
    pub storage_path: PathBuf,
    /// Caller-facing correlation key for callbacks.
    pub custom_id: String,
}

impl TransferUnit {
    /// Creates a new [`TransferUnit`].
    pub fn new(
        source_url: impl Into<String>,
        storage_path: impl Into<PathBuf>,
        custom_id: impl Into<String>,
    ) -> Self {
        Self {
            source_url: source_url.into(),
            storage_path: storage_path.into(),
            custom_id: custom_id.into(),
        }
    }

    /// Validates the unit's URL, producing the parsed form.
    ///
    /// Fails with [`ErrorKind::InvalidUrl`] when the URL is empty or cannot
    /// be parsed. Detected before any network activity.
    pub(crate) fn parse_url(&self) -> Result<Url, TransferError> {
        parse_source_url(&self.source_url, &self.custom_id)
    }

    /// Validates that the unit names a storage destination at all.
    pub(crate) fn require_storage_path(&self) -> Result<(), TransferError> {
        if self.storage_path.as_os_str().is_empty() {
            return Err(TransferError::new(
                ErrorKind::InvalidStoragePath,
                "storage path is empty",
                &self.source_url,
                &self.custom_id,
            ));
        }
        Ok(())
    }
}

/// Parses and validates a source URL outside the context of a unit.
pub(crate) fn parse_source_url(source_url: &str, custom_id: &str) -> Result<Url, TransferError> {
    if source_url.is_empty() {
        return Err(TransferError::new(
            ErrorKind::InvalidUrl,
            "url is empty",
            source_url,
            custom_id,
        ));
    }
    Url::parse(source_url).map_err(|e| {
        TransferError::new(
            ErrorKind::InvalidUrl,
            format!("the url \"{source_url}\" cannot be parsed: {e}"),
            source_url,
            custom_id,
        )
    })
}
