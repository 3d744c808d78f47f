//! Transfer module containing the data structures a transfer is built from.
//!
//! This module provides the leaf types of the library:
//!
//! - [`unit`] - The [`TransferUnit`] describing one requested transfer
//! - [`stream`] - The [`StreamData`] write cursor for buffer targets
//! - [`header`] - The [`HeaderInfo`] metadata returned by header probes
//!
//! # Examples
//!
//! ## Describing a batch member
//!
//! ```rust
//! use hauler::transfer::TransferUnit;
//!
//! let unit = TransferUnit::new(
//!     "https://example.com/pack-0.1.2.zip",
//!     "/tmp/assets/pack-0.1.2.zip",
//!     "pack",
//! );
//! assert_eq!(unit.custom_id, "pack");
//! ```

pub mod header;
pub mod stream;
pub mod unit;

pub use header::HeaderInfo;
pub use stream::StreamData;
pub use unit::TransferUnit;
