//! Configuration structures and callback types for the downloader.
//!
//! # Examples
//!
//! ## Callback signatures
//!
//! ```rust
//! use hauler::downloader::{ErrorCallback, ProgressCallback, SuccessCallback};
//!
//! let on_error: ErrorCallback = Box::new(|err| {
//!     eprintln!("{} failed: {}", err.custom_id, err.message);
//! });
//! let on_progress: ProgressCallback = Box::new(|total, downloaded, _url, id| {
//!     println!("{id}: {downloaded}/{total}");
//! });
//! let on_success: SuccessCallback = Box::new(|url, path, id| {
//!     println!("{id}: {url} -> {path}");
//! });
//! ```

use crate::engine::client::DEFAULT_CONNECTION_TIMEOUT;
use crate::error::TransferError;

use reqwest::header::HeaderMap;
use reqwest::Proxy;

/// Callback invoked once per failing unit with the normalized error record.
pub type ErrorCallback = Box<dyn Fn(&TransferError) + Send + Sync>;

/// Callback invoked on progress ticks: `(total_bytes, downloaded_bytes, url,
/// custom_id)`. `total_bytes` is `0` while the total is unknown.
pub type ProgressCallback = Box<dyn Fn(u64, u64, &str, &str) + Send + Sync>;

/// Callback invoked once per successful unit: `(url, storage_path_or_empty,
/// custom_id)`.
pub type SuccessCallback = Box<dyn Fn(&str, &str, &str) + Send + Sync>;

/// Configuration structure for the downloader.
#[derive(Clone)]
pub struct DownloaderConfig {
    /// Connection timeout in seconds, applied when a transfer starts.
    pub connection_timeout: u64,
    /// Resume partial transfers when the remote supports it.
    pub resumable: bool,
    /// Bound handed to the engine's multi-transfer facility for batches.
    pub concurrent_transfers: usize,
    /// Custom HTTP headers.
    pub headers: Option<HeaderMap>,
    /// Optional proxy configuration.
    pub proxy: Option<Proxy>,
    /// Unpack `.gz` destinations after a completed file transfer.
    pub decompress: bool,
}

impl std::fmt::Debug for DownloaderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloaderConfig")
            .field("connection_timeout", &self.connection_timeout)
            .field("resumable", &self.resumable)
            .field("concurrent_transfers", &self.concurrent_transfers)
            .field("headers", &self.headers)
            .field("proxy", &self.proxy.is_some())
            .field("decompress", &self.decompress)
            .finish()
    }
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
            resumable: true,
            concurrent_transfers: 32,
            headers: None,
            proxy: None,
            decompress: false,
        }
    }
}
