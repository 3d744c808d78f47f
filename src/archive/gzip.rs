//! Gzip unpacking for completed file transfers.
//!
//! When the downloader is built with `decompress(true)`, a destination
//! carrying a `.gz` suffix is unpacked in place once the transfer completes:
//! the decoded content lands at the path minus the suffix and the archive is
//! removed. Failures here surface to the caller as the decompression failure
//! origin, not as transfer failures.

use crate::error::{Error, Result};

use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Whether a completed destination should be unpacked.
pub(crate) fn is_gzip_path(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

/// Unpacks `archive` next to itself, stripping the `.gz` suffix.
///
/// `pack.json.gz` becomes `pack.json`; the archive is removed on success.
/// Returns the unpacked path.
pub fn unpack_gzip(archive: &Path) -> Result<PathBuf> {
    let target = unpacked_path(archive)?;
    debug!("Unpacking {:?} to {:?}", archive, target);

    let input = File::open(archive)?;
    let mut decoder = GzDecoder::new(BufReader::new(input));
    let mut output = BufWriter::new(File::create(&target)?);
    io::copy(&mut decoder, &mut output)?;
    output.flush()?;

    fs::remove_file(archive)?;
    Ok(target)
}

fn unpacked_path(archive: &Path) -> Result<PathBuf> {
    let stem = archive
        .file_stem()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            Error::Internal(format!("no unpacked name derivable from {archive:?}"))
        })?;
    Ok(match archive.parent() {
        Some(parent) => parent.join(stem),
        None => PathBuf::from(stem),
    })
}
