//! Error handling for the Hauler library.
//!
//! Two layers coexist here. [`Error`] is the crate-level error returned by
//! fallible constructors and by [`get_header`]: operations where the caller
//! holds a `Result`. [`TransferError`] is the record delivered through the
//! registered error callback — for transfer operations no `Err` ever crosses
//! the async boundary, the callback is the only failure channel.
//!
//! [`get_header`]: crate::downloader::Downloader::get_header

use std::io;
use thiserror::Error;

/// Errors that can happen when using Hauler's fallible-return operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Error from an underlying system.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Error from the underlying URL parser or the expected URL format.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// I/O Error.
    #[error("I/O error")]
    IOError {
        #[from]
        source: io::Error,
    },

    /// Error from the Reqwest library.
    #[error("Reqwest Error")]
    Reqwest {
        #[from]
        source: reqwest::Error,
    },

    /// Failure to retrieve header information from the remote resource.
    #[error("Failed to retrieve header info: {0}")]
    PrepareHeader(String),
}

/// Result type alias for operations that can fail with a Hauler error.
pub type Result<T> = std::result::Result<T, Error>;

/// The failure origin of a transfer, as a closed taxonomy.
///
/// Each variant names a distinct origin; classification never conflates one
/// with another when surfacing a failure.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The destination file could not be created or written.
    #[error("failed to create or write the destination file")]
    CreateFile,

    /// Network-level failure: connect, timeout, request, or HTTP status.
    #[error("network error")]
    Network,

    /// No new version of the resource is available.
    ///
    /// Never raised by the transfer core itself; reserved for version-check
    /// logic layered on top of it.
    #[error("no new version available")]
    NoNewVersion,

    /// Post-download decompression failed.
    #[error("decompression failed")]
    Uncompress,

    /// The transfer engine could not be initialized.
    #[error("transfer engine is not initialized")]
    EngineUninitialized,

    /// The engine's multi-transfer facility failed while driving a batch.
    #[error("multi-transfer error")]
    EngineMultiError,

    /// The engine failed mid-stream while transferring bytes.
    #[error("transfer error")]
    EngineTransferError,

    /// The given URL is empty or not syntactically well-formed.
    #[error("invalid URL")]
    InvalidUrl,

    /// The given storage destination is unusable.
    #[error("invalid storage path")]
    InvalidStoragePath,

    /// Header information could not be retrieved from the remote resource.
    #[error("failed to retrieve header info")]
    PrepareHeaderError,
}

/// The failure record delivered through the error callback.
///
/// Always carries enough context to identify which logical request failed,
/// independent of batch membership: the unit's URL and custom id travel with
/// the error.
///
/// Engine-native diagnostic codes are preserved when the failure is
/// classifiable: `engine_minor_code` carries the HTTP status for status
/// failures; both codes are `0` otherwise.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message} (url: {url}, id: {custom_id})")]
pub struct TransferError {
    /// The failure origin.
    pub kind: ErrorKind,
    /// Engine-native major diagnostic code, `0` when not applicable.
    pub engine_major_code: i32,
    /// Engine-native minor diagnostic code, `0` when not applicable.
    pub engine_minor_code: i32,
    /// Human-readable failure description.
    pub message: String,
    /// The custom id of the failing unit.
    pub custom_id: String,
    /// The source URL of the failing unit.
    pub url: String,
}

impl TransferError {
    /// Creates a new [`TransferError`] with zeroed engine codes.
    pub fn new(
        kind: ErrorKind,
        message: impl Into<String>,
        url: impl Into<String>,
        custom_id: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            engine_major_code: 0,
            engine_minor_code: 0,
            message: message.into(),
            custom_id: custom_id.into(),
            url: url.into(),
        }
    }

    /// Attaches engine-native diagnostic codes.
    pub fn with_engine_codes(mut self, major: i32, minor: i32) -> Self {
        self.engine_major_code = major;
        self.engine_minor_code = minor;
        self
    }

    /// Relabels the error with another custom id, keeping everything else.
    ///
    /// Used when a member failure is re-reported as the batch-level outcome.
    pub fn relabel(mut self, custom_id: impl Into<String>) -> Self {
        self.custom_id = custom_id.into();
        self
    }
}
