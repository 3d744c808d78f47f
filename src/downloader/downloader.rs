//! Core downloader implementation with transfer orchestration logic.
//!
//! This module contains the main [`Downloader`] struct: the public download
//! operations (single file, in-memory buffer, batch — each in async and sync
//! form), the header probe, and the logic that turns engine-level events
//! into the public callback contract.
//!
//! # Examples
//!
//! ## Basic Download
//!
//! ```rust,no_run
//! use hauler::downloader::DownloaderBuilder;
//!
//! # async fn example() {
//! let downloader = DownloaderBuilder::new().build();
//! downloader.set_success_callback(|url, path, id| {
//!     println!("{id}: {url} saved to {path}");
//! });
//! downloader
//!     .download("https://example.com/pack.zip", "/tmp/pack.zip", "pack")
//!     .await;
//! # }
//! ```
//!
//! ## Batch Download with Aggregate Progress
//!
//! ```rust,no_run
//! use hauler::downloader::DownloaderBuilder;
//! use hauler::transfer::TransferUnit;
//!
//! # async fn example() {
//! let downloader = DownloaderBuilder::new().concurrent_transfers(4).build();
//! downloader.set_progress_callback(|total, downloaded, _url, id| {
//!     println!("{id}: {downloaded}/{total}");
//! });
//! let units = vec![
//!     TransferUnit::new("https://example.com/a.zip", "/tmp/a.zip", "a"),
//!     TransferUnit::new("https://example.com/b.zip", "/tmp/b.zip", "b"),
//! ];
//! downloader.batch_download(&units, "assets").await;
//! # }
//! ```

use super::batch::{BatchEvent, BatchTracker};
use super::callbacks::CallbackHub;
use super::config::DownloaderConfig;
use crate::archive;
use crate::engine::{create_engine_client, probe_header, EngineConfig};
use crate::error::{Error, ErrorKind, Result, TransferError};
use crate::transfer::unit::parse_source_url;
use crate::transfer::{HeaderInfo, StreamData, TransferUnit};
use crate::utils::content_length::get_content_length;
use crate::utils::filename::resolve_storage_path;

use futures::stream::{self, StreamExt};
use reqwest::{header::RANGE, StatusCode, Url};
use reqwest_middleware::ClientWithMiddleware;
use std::fmt;
use std::fmt::Debug;
use std::path::Path;
use std::sync::Arc;
use tokio::{fs, fs::OpenOptions, io::AsyncWriteExt, sync::mpsc};
use tracing::{debug, warn};

/// Where a running transfer reports its lifecycle events.
///
/// Single transfers notify the hub directly; batch members funnel through
/// the channel consumed by the batch event loop, which owns the aggregate
/// state and serializes delivery.
enum EventSink<'a> {
    Direct {
        hub: &'a CallbackHub,
        url: &'a str,
        custom_id: &'a str,
    },
    Batch {
        tx: mpsc::UnboundedSender<BatchEvent>,
        index: usize,
    },
}

impl EventSink<'_> {
    fn progress(&self, total: Option<u64>, downloaded: u64) {
        match self {
            EventSink::Direct {
                hub,
                url,
                custom_id,
            } => hub.progress(total.unwrap_or(0), downloaded, url, custom_id),
            EventSink::Batch { tx, index } => {
                let _ = tx.send(BatchEvent::Progress {
                    index: *index,
                    total,
                    downloaded,
                });
            }
        }
    }

    fn finished(&self, storage_path: &str) {
        match self {
            EventSink::Direct {
                hub,
                url,
                custom_id,
            } => hub.success(url, storage_path, custom_id),
            EventSink::Batch { tx, index } => {
                let _ = tx.send(BatchEvent::Finished {
                    index: *index,
                    storage_path: storage_path.to_string(),
                });
            }
        }
    }

    fn failed(&self, error: TransferError) {
        match self {
            EventSink::Direct { hub, .. } => hub.error(&error),
            EventSink::Batch { tx, index } => {
                let _ = tx.send(BatchEvent::Failed {
                    index: *index,
                    error,
                });
            }
        }
    }
}

/// Represents the transfer controller.
///
/// A downloader can be created via its builder:
///
/// ```rust
/// # fn main()  {
/// use hauler::downloader::DownloaderBuilder;
///
/// let d = DownloaderBuilder::new().build();
/// # }
/// ```
///
/// Clones share the same callback slots: registering a callback on a clone
/// replaces it for every clone.
#[derive(Clone)]
pub struct Downloader {
    config: DownloaderConfig,
    callbacks: Arc<CallbackHub>,
}

impl Debug for Downloader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Downloader")
            .field("config", &self.config)
            .finish()
    }
}

impl Downloader {
    /// Creates a new Downloader with the given configuration.
    pub(crate) fn new(config: DownloaderConfig) -> Self {
        Self {
            config,
            callbacks: Arc::new(CallbackHub::default()),
        }
    }

    /// Gets the connection timeout in seconds.
    pub fn connection_timeout(&self) -> u64 {
        self.config.connection_timeout
    }

    /// Sets the connection timeout in seconds.
    ///
    /// Applied when the next transfer starts; running transfers keep the
    /// timeout they started with.
    pub fn set_connection_timeout(&mut self, seconds: u64) {
        self.config.connection_timeout = seconds;
    }

    /// Gets whether partial transfers are resumed when possible.
    pub fn resumable(&self) -> bool {
        self.config.resumable
    }

    /// Gets the concurrency bound for batch downloads.
    pub fn concurrent_transfers(&self) -> usize {
        self.config.concurrent_transfers
    }

    /// Gets the custom headers.
    pub fn headers(&self) -> Option<&reqwest::header::HeaderMap> {
        self.config.headers.as_ref()
    }

    /// Gets whether completed `.gz` destinations are unpacked.
    pub fn decompress(&self) -> bool {
        self.config.decompress
    }

    /// Sets the callback notified of unit failures. Replaces any previous
    /// error callback.
    pub fn set_error_callback<F>(&self, callback: F)
    where
        F: Fn(&TransferError) + Send + Sync + 'static,
    {
        self.callbacks.set_error(Box::new(callback));
    }

    /// Sets the callback notified of progress ticks. Replaces any previous
    /// progress callback.
    pub fn set_progress_callback<F>(&self, callback: F)
    where
        F: Fn(u64, u64, &str, &str) + Send + Sync + 'static,
    {
        self.callbacks.set_progress(Box::new(callback));
    }

    /// Sets the callback notified of unit completions. Replaces any previous
    /// success callback.
    pub fn set_success_callback<F>(&self, callback: F)
    where
        F: Fn(&str, &str, &str) + Send + Sync + 'static,
    {
        self.callbacks.set_success(Box::new(callback));
    }

    /// Downloads a file to local storage.
    ///
    /// The outcome is delivered exclusively through the registered
    /// callbacks: exactly one of success or error fires for the unit.
    pub async fn download(&self, url: &str, storage_path: impl AsRef<Path>, custom_id: &str) {
        let Some(client) = self.engine_client(url, custom_id) else {
            return;
        };
        let unit = TransferUnit::new(url, storage_path.as_ref(), custom_id);
        let sink = EventSink::Direct {
            hub: self.callbacks.as_ref(),
            url,
            custom_id,
        };
        self.fetch_to_file(&client, &unit, &sink).await;
    }

    /// Downloads a file to local storage, blocking until it concludes.
    ///
    /// Callbacks fire before the call returns. Must not be called from
    /// within an async context.
    pub fn download_sync(&self, url: &str, storage_path: impl AsRef<Path>, custom_id: &str) {
        match sync_runtime() {
            Ok(rt) => rt.block_on(self.download(url, storage_path, custom_id)),
            Err(e) => self.notify_runtime_failure(e, url, custom_id),
        }
    }

    /// Streams a file into the caller-supplied buffer.
    ///
    /// The buffer's length bounds the transfer: a response reported or
    /// streamed past it fails the unit before anything is written out of
    /// bounds. Success reports an empty storage path.
    pub async fn download_to_buffer(&self, url: &str, buffer: &mut [u8], custom_id: &str) {
        let parsed = match parse_source_url(url, custom_id) {
            Ok(parsed) => parsed,
            Err(e) => {
                self.callbacks.error(&e);
                return;
            }
        };
        if buffer.is_empty() {
            self.callbacks.error(&TransferError::new(
                ErrorKind::InvalidStoragePath,
                "buffer size must be positive",
                url,
                custom_id,
            ));
            return;
        }
        let Some(client) = self.engine_client(url, custom_id) else {
            return;
        };
        self.fetch_to_buffer(&client, &parsed, url, buffer, custom_id)
            .await;
    }

    /// Streams a file into the caller-supplied buffer, blocking until it
    /// concludes. Callbacks fire before the call returns.
    pub fn download_to_buffer_sync(&self, url: &str, buffer: &mut [u8], custom_id: &str) {
        match sync_runtime() {
            Ok(rt) => rt.block_on(self.download_to_buffer(url, buffer, custom_id)),
            Err(e) => self.notify_runtime_failure(e, url, custom_id),
        }
    }

    /// Downloads every unit concurrently as one logical batch.
    ///
    /// Per-unit callbacks fire with each unit's own custom id; aggregate
    /// progress and the single terminal batch notification fire with
    /// `batch_id`. One member's failure never cancels its siblings.
    pub async fn batch_download(&self, units: &[TransferUnit], batch_id: &str) {
        if units.is_empty() {
            self.callbacks.success("", "", batch_id);
            return;
        }
        let Some(client) = self.engine_client("", batch_id) else {
            return;
        };

        let (tx, mut rx) = mpsc::unbounded_channel();

        let producer = async move {
            stream::iter(units.iter().enumerate())
                .for_each_concurrent(self.config.concurrent_transfers, |(index, unit)| {
                    let tx = tx.clone();
                    let client = &client;
                    async move {
                        let sink = EventSink::Batch { tx, index };
                        self.fetch_to_file(client, unit, &sink).await;
                    }
                })
                .await;
            // The channel closes here: every member sender is gone.
        };

        let consumer = async {
            let mut tracker = BatchTracker::new(units.len());
            while let Some(event) = rx.recv().await {
                self.handle_batch_event(event, units, batch_id, &mut tracker);
            }
            tracker
        };

        let ((), tracker) = futures::join!(producer, consumer);

        if !tracker.is_complete() {
            // A member vanished without reporting a terminal state.
            self.callbacks.error(&TransferError::new(
                ErrorKind::EngineMultiError,
                format!("{} batch member(s) unaccounted for", tracker.unaccounted()),
                "",
                batch_id,
            ));
        }
    }

    /// Downloads every unit as one logical batch, blocking until all units
    /// conclude. Callbacks fire before the call returns.
    pub fn batch_download_sync(&self, units: &[TransferUnit], batch_id: &str) {
        match sync_runtime() {
            Ok(rt) => rt.block_on(self.batch_download(units, batch_id)),
            Err(e) => self.notify_runtime_failure(e, "", batch_id),
        }
    }

    /// Retrieves the header information of the given URL synchronously.
    ///
    /// Probe only — no body is transferred. Must not be called from within
    /// an async context; async callers use [`header_info`].
    ///
    /// [`header_info`]: Downloader::header_info
    pub fn get_header(&self, url: &str) -> Result<HeaderInfo> {
        let rt = sync_runtime().map_err(|e| Error::Internal(e.to_string()))?;
        rt.block_on(self.header_info(url))
    }

    /// Retrieves the header information of the given URL.
    pub async fn header_info(&self, url: &str) -> Result<HeaderInfo> {
        let parsed = Url::parse(url)
            .map_err(|e| Error::InvalidUrl(format!("the url \"{url}\" cannot be parsed: {e}")))?;
        let client = create_engine_client(self.engine_config())?;
        probe_header(&client, &parsed).await
    }

    fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            connection_timeout: self.config.connection_timeout,
            proxy: self.config.proxy.clone(),
            headers: self.config.headers.clone(),
        }
    }

    /// Builds the engine client, reporting a failure through the error
    /// callback.
    fn engine_client(&self, url: &str, custom_id: &str) -> Option<ClientWithMiddleware> {
        match create_engine_client(self.engine_config()) {
            Ok(client) => Some(client),
            Err(e) => {
                self.callbacks.error(&TransferError::new(
                    ErrorKind::EngineUninitialized,
                    e.to_string(),
                    url,
                    custom_id,
                ));
                None
            }
        }
    }

    fn notify_runtime_failure(&self, e: std::io::Error, url: &str, custom_id: &str) {
        self.callbacks.error(&TransferError::new(
            ErrorKind::EngineUninitialized,
            format!("failed to start worker runtime: {e}"),
            url,
            custom_id,
        ));
    }

    /// Fetches one unit onto local storage and reports through `sink`.
    ///
    /// Exactly one terminal event leaves this function per call.
    async fn fetch_to_file(
        &self,
        client: &ClientWithMiddleware,
        unit: &TransferUnit,
        sink: &EventSink<'_>,
    ) {
        // Caller-input validation, before any network activity.
        if let Err(e) = unit.require_storage_path() {
            sink.failed(e);
            return;
        }
        let url = match unit.parse_url() {
            Ok(url) => url,
            Err(e) => {
                sink.failed(e);
                return;
            }
        };
        let Some(output) = resolve_storage_path(&unit.storage_path, &url) else {
            sink.failed(TransferError::new(
                ErrorKind::InvalidUrl,
                format!("the url \"{url}\" does not name a file"),
                &unit.source_url,
                &unit.custom_id,
            ));
            return;
        };

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            debug!("Creating destination directory {:?}", parent);
            if let Err(e) = fs::create_dir_all(parent).await {
                sink.failed(TransferError::new(
                    ErrorKind::InvalidStoragePath,
                    format!("cannot create destination directory {parent:?}: {e}"),
                    &unit.source_url,
                    &unit.custom_id,
                ));
                return;
            }
        }

        // Resume decision: probe only when there is a partial file to keep.
        let size_on_disk = match fs::metadata(&output).await {
            Ok(m) => m.len(),
            Err(_) => 0,
        };
        let mut resume_from = 0u64;
        if self.config.resumable && size_on_disk > 0 {
            debug!("A file with the same name already exists at the destination.");
            let info = match probe_header(client, &url).await {
                Ok(info) => info,
                Err(e) => {
                    sink.failed(TransferError::new(
                        ErrorKind::PrepareHeaderError,
                        e.to_string(),
                        &unit.source_url,
                        &unit.custom_id,
                    ));
                    return;
                }
            };
            match (info.is_resumable(), info.content_length) {
                (true, Some(total)) if size_on_disk == total => {
                    // Nothing left to transfer.
                    sink.progress(Some(total), total);
                    self.finish_file(&output, unit, sink);
                    return;
                }
                (true, Some(total)) if size_on_disk < total => resume_from = size_on_disk,
                (true, None) => resume_from = size_on_disk,
                // Stale partial or a range-incapable remote: restart.
                _ => resume_from = 0,
            }
        }

        // Request the file.
        debug!("Fetching {}", url);
        let mut req = client.get(url.clone());
        if resume_from > 0 {
            req = req.header(RANGE, format!("bytes={resume_from}-"));
        }
        let res = match req.send().await {
            Ok(res) => res,
            Err(e) => {
                sink.failed(TransferError::new(
                    ErrorKind::Network,
                    e.to_string(),
                    &unit.source_url,
                    &unit.custom_id,
                ));
                return;
            }
        };
        if let Err(e) = res.error_for_status_ref() {
            let status = e.status().map(|s| i32::from(s.as_u16())).unwrap_or(0);
            sink.failed(
                TransferError::new(
                    ErrorKind::Network,
                    e.to_string(),
                    &unit.source_url,
                    &unit.custom_id,
                )
                .with_engine_codes(0, status),
            );
            return;
        }

        // A server that ignores the range answers 200 with the whole body.
        if resume_from > 0 && res.status() == StatusCode::OK {
            warn!("{} ignored the range request, restarting from zero", url);
            resume_from = 0;
        }

        let total = get_content_length(&res, resume_from);

        debug!("Creating destination file {:?}", &output);
        let mut file = match OpenOptions::new()
            .create(true)
            .write(true)
            .append(resume_from > 0)
            .truncate(resume_from == 0)
            .open(&output)
            .await
        {
            Ok(file) => file,
            Err(e) => {
                sink.failed(TransferError::new(
                    ErrorKind::CreateFile,
                    format!("cannot open {output:?}: {e}"),
                    &unit.source_url,
                    &unit.custom_id,
                ));
                return;
            }
        };

        // First tick of the attempt: the resume offset, not zero.
        sink.progress(total, resume_from);

        let mut downloaded = resume_from;

        debug!("Retrieving chunks...");
        let mut stream = res.bytes_stream();
        while let Some(item) = stream.next().await {
            let mut chunk = match item {
                Ok(chunk) => chunk,
                Err(e) => {
                    sink.failed(TransferError::new(
                        ErrorKind::EngineTransferError,
                        e.to_string(),
                        &unit.source_url,
                        &unit.custom_id,
                    ));
                    return;
                }
            };
            downloaded += chunk.len() as u64;

            if let Err(e) = file.write_all_buf(&mut chunk).await {
                sink.failed(TransferError::new(
                    ErrorKind::CreateFile,
                    format!("cannot write to {output:?}: {e}"),
                    &unit.source_url,
                    &unit.custom_id,
                ));
                return;
            }
            sink.progress(total, downloaded);
        }

        if let Err(e) = file.flush().await {
            sink.failed(TransferError::new(
                ErrorKind::CreateFile,
                format!("cannot flush {output:?}: {e}"),
                &unit.source_url,
                &unit.custom_id,
            ));
            return;
        }
        // Handle released before any post-processing touches the file.
        drop(file);

        self.finish_file(&output, unit, sink);
    }

    /// Concludes a completed file transfer: optional unpack, then success.
    fn finish_file(&self, output: &Path, unit: &TransferUnit, sink: &EventSink<'_>) {
        let final_path = if self.config.decompress && archive::gzip::is_gzip_path(output) {
            match archive::unpack_gzip(output) {
                Ok(path) => path,
                Err(e) => {
                    sink.failed(TransferError::new(
                        ErrorKind::Uncompress,
                        e.to_string(),
                        &unit.source_url,
                        &unit.custom_id,
                    ));
                    return;
                }
            }
        } else {
            output.to_path_buf()
        };
        sink.finished(&final_path.to_string_lossy());
    }

    /// Fetches one resource into the caller's buffer.
    async fn fetch_to_buffer(
        &self,
        client: &ClientWithMiddleware,
        url: &Url,
        source_url: &str,
        buffer: &mut [u8],
        custom_id: &str,
    ) {
        debug!("Fetching {} into a {} byte buffer", url, buffer.len());
        let res = match client.get(url.clone()).send().await {
            Ok(res) => res,
            Err(e) => {
                self.callbacks.error(&TransferError::new(
                    ErrorKind::Network,
                    e.to_string(),
                    source_url,
                    custom_id,
                ));
                return;
            }
        };
        if let Err(e) = res.error_for_status_ref() {
            let status = e.status().map(|s| i32::from(s.as_u16())).unwrap_or(0);
            self.callbacks.error(
                &TransferError::new(ErrorKind::Network, e.to_string(), source_url, custom_id)
                    .with_engine_codes(0, status),
            );
            return;
        }

        let total = get_content_length(&res, 0);

        // Reject an oversized response before a single byte is copied.
        if let Some(total) = total {
            if total > buffer.len() as u64 {
                self.callbacks.error(&TransferError::new(
                    ErrorKind::Network,
                    format!(
                        "response of {} bytes exceeds buffer capacity of {}",
                        total,
                        buffer.len()
                    ),
                    source_url,
                    custom_id,
                ));
                return;
            }
        }

        let mut data = StreamData::new(buffer, total.unwrap_or(0));
        self.callbacks
            .progress(data.total(), 0, source_url, custom_id);

        let mut stream = res.bytes_stream();
        while let Some(item) = stream.next().await {
            let chunk = match item {
                Ok(chunk) => chunk,
                Err(e) => {
                    self.callbacks.error(&TransferError::new(
                        ErrorKind::EngineTransferError,
                        e.to_string(),
                        source_url,
                        custom_id,
                    ));
                    return;
                }
            };
            if let Err(e) = data.write(&chunk, source_url, custom_id) {
                self.callbacks.error(&e);
                return;
            }
            self.callbacks
                .progress(data.total(), data.offset() as u64, source_url, custom_id);
        }

        self.callbacks.success(source_url, "", custom_id);
    }

    /// Applies one member event to the batch state and emits callbacks.
    fn handle_batch_event(
        &self,
        event: BatchEvent,
        units: &[TransferUnit],
        batch_id: &str,
        tracker: &mut BatchTracker,
    ) {
        match event {
            BatchEvent::Progress {
                index,
                total,
                downloaded,
            } => {
                tracker.on_progress(index, total, downloaded);
                let unit = &units[index];
                self.callbacks.progress(
                    total.unwrap_or(0),
                    downloaded,
                    &unit.source_url,
                    &unit.custom_id,
                );
                let (agg_total, agg_downloaded) = tracker.aggregate();
                self.callbacks
                    .progress(agg_total, agg_downloaded, "", batch_id);
            }
            BatchEvent::Finished {
                index,
                storage_path,
            } => {
                let newly_terminal = tracker.on_finished(index);
                let unit = &units[index];
                self.callbacks
                    .success(&unit.source_url, &storage_path, &unit.custom_id);
                if newly_terminal && tracker.is_complete() {
                    self.finish_batch(tracker, batch_id);
                }
            }
            BatchEvent::Failed { index, error } => {
                let newly_terminal = tracker.on_failed(index, error.clone());
                self.callbacks.error(&error);
                if newly_terminal && tracker.is_complete() {
                    self.finish_batch(tracker, batch_id);
                }
            }
        }
    }

    /// Emits the single batch-level terminal notification.
    fn finish_batch(&self, tracker: &BatchTracker, batch_id: &str) {
        match tracker.first_error() {
            Some(error) => {
                debug!("Batch {:?} failed: {}", batch_id, error);
                self.callbacks.error(&error.clone().relabel(batch_id));
            }
            None => {
                debug!("Batch {:?} complete", batch_id);
                self.callbacks.success("", "", batch_id);
            }
        }
    }
}

/// Builds the private runtime backing the blocking variants.
fn sync_runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}
