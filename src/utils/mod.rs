//! Shared utility functions.
//!
//! # Overview
//!
//! - [`filename`] - URL to local filename derivation
//! - [`content_length`] - Content length extraction from HTTP responses
//!
//! # Examples
//!
//! ```rust
//! use hauler::utils::parse_content_range_total;
//!
//! let total = parse_content_range_total("bytes 0-1023/2048");
//! assert_eq!(total, Some(2048));
//! ```

pub mod content_length;
pub mod filename;

pub use content_length::{get_content_length, parse_content_range_total};
pub use filename::filename_from_url;
