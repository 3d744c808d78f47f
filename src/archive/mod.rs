//! Post-download archive handling.

pub mod gzip;

pub use gzip::unpack_gzip;
