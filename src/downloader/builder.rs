//! Builder pattern implementation for creating Downloader instances.
//!
//! # Examples
//!
//! ## Basic Builder Usage
//!
//! ```rust
//! use hauler::downloader::DownloaderBuilder;
//!
//! let downloader = DownloaderBuilder::new()
//!     .connection_timeout(10)
//!     .resumable(false)
//!     .concurrent_transfers(5)
//!     .build();
//! ```
//!
//! ## Custom Headers
//!
//! ```rust
//! use hauler::downloader::DownloaderBuilder;
//! use reqwest::header::{HeaderMap, USER_AGENT};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut headers = HeaderMap::new();
//! headers.insert(USER_AGENT, "MyApp/1.0".parse()?);
//!
//! let downloader = DownloaderBuilder::new().headers(headers).build();
//! # Ok(())
//! # }
//! ```

use super::{config::DownloaderConfig, downloader::Downloader};

use reqwest::header::{HeaderMap, HeaderValue, IntoHeaderName};
use reqwest::Proxy;

/// A builder used to create a [`Downloader`].
///
/// ```rust
/// # fn main()  {
/// use hauler::downloader::DownloaderBuilder;
///
/// let d = DownloaderBuilder::new().connection_timeout(15).build();
/// # }
/// ```
#[derive(Default)]
pub struct DownloaderBuilder {
    config: DownloaderConfig,
}

impl DownloaderBuilder {
    /// Creates a builder with the default options.
    pub fn new() -> Self {
        DownloaderBuilder::default()
    }

    /// Sets the connection timeout in seconds.
    pub fn connection_timeout(mut self, seconds: u64) -> Self {
        self.config.connection_timeout = seconds;
        self
    }

    /// Sets whether partial transfers are resumed when the remote allows it.
    pub fn resumable(mut self, resumable: bool) -> Self {
        self.config.resumable = resumable;
        self
    }

    /// Sets the concurrency bound handed to the engine for batch downloads.
    pub fn concurrent_transfers(mut self, concurrent_transfers: usize) -> Self {
        self.config.concurrent_transfers = concurrent_transfers;
        self
    }

    /// Sets the proxy every transfer is routed through.
    pub fn proxy(mut self, proxy: Proxy) -> Self {
        self.config.proxy = Some(proxy);
        self
    }

    /// Unpack `.gz` destinations after a completed file transfer.
    ///
    /// The unpacked path replaces the archive and is the path reported in
    /// the success callback. Unpack failures surface as decompression
    /// errors for the unit.
    pub fn decompress(mut self, decompress: bool) -> Self {
        self.config.decompress = decompress;
        self
    }

    /// Helper method to get or create a new HeaderMap.
    fn new_header(&self) -> HeaderMap {
        match self.config.headers {
            Some(ref h) => h.to_owned(),
            _ => HeaderMap::new(),
        }
    }

    /// Adds the http headers.
    ///
    /// You can call `.headers()` multiple times and all `HeaderMap`s will be
    /// merged into a single one.
    ///
    /// # Example
    ///
    /// ```
    /// use reqwest::header::{self, HeaderValue, HeaderMap};
    /// use hauler::downloader::DownloaderBuilder;
    ///
    /// let ua = HeaderValue::from_str("curl/7.87").expect("Invalid UA");
    ///
    /// let builder = DownloaderBuilder::new()
    ///     .headers(HeaderMap::from_iter([(header::USER_AGENT, ua)]))
    ///     .build();
    /// ```
    ///
    /// See also [`header()`].
    ///
    /// [`header()`]: DownloaderBuilder::header
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        let mut new = self.new_header();
        new.extend(headers);

        self.config.headers = Some(new);
        self
    }

    /// Adds one http header.
    ///
    /// # Example
    ///
    /// ```
    /// use reqwest::header::{self, HeaderValue};
    /// use hauler::downloader::DownloaderBuilder;
    ///
    /// let auth = HeaderValue::from_str("Basic aGk6MTIzNDU2Cg==").expect("Invalid auth");
    ///
    /// let builder = DownloaderBuilder::new()
    ///     .header(header::AUTHORIZATION, auth)
    ///     .build();
    /// ```
    ///
    /// See also [`headers()`].
    ///
    /// [`headers()`]: DownloaderBuilder::headers
    pub fn header<K: IntoHeaderName>(mut self, name: K, value: HeaderValue) -> Self {
        let mut new = self.new_header();

        new.insert(name, value);

        self.config.headers = Some(new);
        self
    }

    /// Creates the [`Downloader`] with the specified options.
    pub fn build(self) -> Downloader {
        Downloader::new(self.config)
    }
}
