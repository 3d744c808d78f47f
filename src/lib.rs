//! Hauler is a crate for managing concurrent HTTP(S) file transfers: into
//! memory or onto local storage, one at a time or as a batch with aggregate
//! progress, with resuming of partial transfers.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use hauler::downloader::DownloaderBuilder;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let downloader = DownloaderBuilder::new().build();
//! downloader.set_success_callback(|url, path, _id| {
//!     println!("{url} saved to {path}");
//! });
//! downloader
//!     .download(
//!         "https://github.com/seanmonstar/reqwest/archive/refs/tags/v0.11.9.zip",
//!         "output/reqwest.zip",
//!         "reqwest",
//!     )
//!     .await;
//! # }
//! ```
//!
//! Outcomes of transfer operations are delivered exclusively through the
//! three registered callbacks — exactly one of success or error fires per
//! attempted unit, progress ticks in between. Synchronous variants of every
//! operation block until the callbacks have fired.
//!
//! # Module Organization
//!
//! - [`transfer`] - Transfer units, the buffer write cursor, header metadata
//! - [`downloader`] - The `Downloader`, its builder, and batch coordination
//! - [`engine`] - Construction of the underlying transfer engine client
//! - [`error`] - The error taxonomy and the callback error record
//! - [`archive`] - Post-download gzip unpacking
//! - [`utils`] - Filename derivation and content-length interpretation

pub mod archive;
pub mod downloader;
pub mod engine;
pub mod error;
pub mod transfer;
pub mod utils;

pub use archive::unpack_gzip;
pub use downloader::{Downloader, DownloaderBuilder};
pub use engine::{create_engine_client, EngineConfig};
pub use error::{Error, ErrorKind, Result, TransferError};
pub use transfer::{HeaderInfo, StreamData, TransferUnit};
pub use utils::content_length::{get_content_length, parse_content_range_total};
pub use utils::filename::filename_from_url;
