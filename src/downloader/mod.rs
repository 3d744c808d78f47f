//! Downloader module containing the transfer orchestration engine.
//!
//! # Overview
//!
//! The downloader module is organized into five components:
//!
//! - `downloader` - Core [`Downloader`] with the public transfer operations
//! - `builder` - [`DownloaderBuilder`] for flexible configuration
//! - `config` - Configuration structure and callback types
//! - `callbacks` - Callback slot storage with serialized delivery
//! - `batch` - Batch coordination state
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use hauler::downloader::DownloaderBuilder;
//!
//! # async fn example() {
//! let downloader = DownloaderBuilder::new()
//!     .connection_timeout(15)
//!     .build();
//!
//! downloader.set_error_callback(|err| eprintln!("failed: {err}"));
//! downloader.set_success_callback(|_, path, id| println!("{id} -> {path}"));
//!
//! downloader
//!     .download("https://example.com/file.zip", "/tmp/file.zip", "file")
//!     .await;
//! # }
//! ```

pub(crate) mod batch;
pub(crate) mod callbacks;

pub mod builder;
pub mod config;
pub mod downloader;

pub use builder::DownloaderBuilder;
pub use config::{DownloaderConfig, ErrorCallback, ProgressCallback, SuccessCallback};
pub use downloader::Downloader;
