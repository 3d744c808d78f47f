//! URL to filename derivation.
//!
//! When a storage path names a directory, the local filename is derived from
//! the URL's last path segment, percent-decoded.

use reqwest::Url;
use std::path::{Path, PathBuf};

/// Derives a local filename from the URL's last path segment.
///
/// Returns `None` when the URL carries no usable segment (no path, or a path
/// ending in `/`). The segment is percent-decoded, so
/// `https://host/my%20file.zip` maps to `my file.zip`.
pub fn filename_from_url(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.next_back()?;
    if segment.is_empty() {
        return None;
    }
    let decoded: String = form_urlencoded::parse(segment.as_bytes())
        .map(|(key, val)| [key, val].concat())
        .collect();
    Some(decoded)
}

/// Resolves the effective destination file for a transfer.
///
/// A path that names an existing directory, or whose textual form ends with
/// a separator, is joined with the filename derived from the URL. Any other
/// path is taken verbatim. Returns `None` when a filename is needed but the
/// URL provides none.
pub(crate) fn resolve_storage_path(storage_path: &Path, url: &Url) -> Option<PathBuf> {
    let ends_with_separator = storage_path
        .to_str()
        .is_some_and(|s| s.ends_with('/') || s.ends_with(std::path::MAIN_SEPARATOR));
    if storage_path.is_dir() || ends_with_separator {
        let filename = filename_from_url(url)?;
        Some(storage_path.join(filename))
    } else {
        Some(storage_path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_from_url() {
        let url = Url::parse("https://example.com/dir/file-0.1.2.zip").unwrap();
        assert_eq!(filename_from_url(&url), Some("file-0.1.2.zip".to_string()));
    }

    #[test]
    fn test_filename_is_percent_decoded() {
        let url = Url::parse("https://example.com/my%20file.zip").unwrap();
        assert_eq!(filename_from_url(&url), Some("my file.zip".to_string()));
    }

    #[test]
    fn test_filename_missing() {
        let url = Url::parse("https://example.com/dir/").unwrap();
        assert_eq!(filename_from_url(&url), None);
    }

    #[test]
    fn test_resolve_plain_file_path() {
        let url = Url::parse("https://example.com/a.zip").unwrap();
        let resolved = resolve_storage_path(Path::new("/tmp/out.zip"), &url).unwrap();
        assert_eq!(resolved, PathBuf::from("/tmp/out.zip"));
    }

    #[test]
    fn test_resolve_trailing_separator_joins_filename() {
        let url = Url::parse("https://example.com/a.zip").unwrap();
        let resolved = resolve_storage_path(Path::new("/tmp/downloads/"), &url).unwrap();
        assert_eq!(resolved, PathBuf::from("/tmp/downloads/a.zip"));
    }

    #[test]
    fn test_resolve_existing_directory_joins_filename() {
        let dir = tempfile::tempdir().unwrap();
        let url = Url::parse("https://example.com/a.zip").unwrap();
        let resolved = resolve_storage_path(dir.path(), &url).unwrap();
        assert_eq!(resolved, dir.path().join("a.zip"));
    }

    #[test]
    fn test_resolve_directory_without_filename_fails() {
        let url = Url::parse("https://example.com/dir/").unwrap();
        assert!(resolve_storage_path(Path::new("/tmp/downloads/"), &url).is_none());
    }
}
