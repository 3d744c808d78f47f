//! The transfer-engine seam.
//!
//! The actual byte transfer is performed by a reqwest client wrapped in
//! middleware; this module owns its construction and the probe-only header
//! request. Everything above it (the downloader) treats the engine as an
//! opaque capability: start a transfer, stream chunks, probe headers.
//!
//! # Examples
//!
//! ```rust
//! use hauler::engine::{create_engine_client, EngineConfig};
//!
//! # fn example() -> Result<(), hauler::Error> {
//! let client = create_engine_client(EngineConfig::default())?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod probe;

pub use client::{create_engine_client, EngineConfig};
pub use probe::probe_header;
