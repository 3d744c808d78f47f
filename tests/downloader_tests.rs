//! Tests for the downloader configuration surface.
//!
//! Covers the builder pattern, configuration accessors, and the callback
//! registration contract.

use hauler::downloader::DownloaderBuilder;
use hauler::ErrorKind;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

mod common;
use common::helpers::*;

#[test]
fn test_builder_defaults() {
    let downloader = DownloaderBuilder::new().build();

    assert_eq!(downloader.connection_timeout(), 30);
    assert!(downloader.resumable());
    assert_eq!(downloader.concurrent_transfers(), 32);
    assert!(!downloader.decompress());
    assert!(downloader.headers().is_none());
}

#[test]
fn test_builder_configuration() {
    let downloader = DownloaderBuilder::new()
        .connection_timeout(10)
        .resumable(false)
        .concurrent_transfers(5)
        .decompress(true)
        .build();

    assert_eq!(downloader.connection_timeout(), 10);
    assert!(!downloader.resumable());
    assert_eq!(downloader.concurrent_transfers(), 5);
    assert!(downloader.decompress());
}

#[test]
fn test_builder_headers() {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static("hauler-test-agent"));
    let downloader = DownloaderBuilder::new().headers(headers).build();

    assert!(downloader.headers().is_some());
    assert_eq!(
        downloader.headers().unwrap().get(USER_AGENT),
        Some(&HeaderValue::from_static("hauler-test-agent"))
    );
}

#[test]
fn test_builder_single_header() {
    let downloader = DownloaderBuilder::new()
        .header(USER_AGENT, HeaderValue::from_static("single-test-agent"))
        .build();

    assert_eq!(
        downloader.headers().unwrap().get(USER_AGENT),
        Some(&HeaderValue::from_static("single-test-agent"))
    );
}

#[test]
fn test_builder_headers_merge() {
    let mut first = HeaderMap::new();
    first.insert(USER_AGENT, HeaderValue::from_static("agent"));
    let downloader = DownloaderBuilder::new()
        .headers(first)
        .header(
            reqwest::header::AUTHORIZATION,
            HeaderValue::from_static("Basic aGk6MTIzNDU2Cg=="),
        )
        .build();

    let headers = downloader.headers().unwrap();
    assert_eq!(headers.len(), 2);
}

#[test]
fn test_set_connection_timeout() {
    let mut downloader = DownloaderBuilder::new().build();
    assert_eq!(downloader.connection_timeout(), 30);

    downloader.set_connection_timeout(120);
    assert_eq!(downloader.connection_timeout(), 120);
}

#[test]
fn test_downloader_debug() {
    let downloader = DownloaderBuilder::new().build();
    let debug_str = format!("{:?}", downloader);

    assert!(debug_str.contains("Downloader"));
    assert!(debug_str.contains("config"));
}

#[test]
fn test_downloader_clone_shares_config() {
    let downloader = DownloaderBuilder::new().connection_timeout(7).build();
    let cloned = downloader.clone();

    assert_eq!(cloned.connection_timeout(), 7);
    assert_eq!(cloned.resumable(), downloader.resumable());
}

#[tokio::test]
async fn test_callback_registration_replaces() {
    let downloader = DownloaderBuilder::new().build();

    let first = Arc::new(AtomicUsize::new(0));
    let counter = first.clone();
    downloader.set_error_callback(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let second = Arc::new(AtomicUsize::new(0));
    let counter = second.clone();
    downloader.set_error_callback(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    // An invalid URL fails before any network activity, driving the slot.
    downloader.download("not a url", "/tmp/x", "id").await;

    assert_eq!(first.load(Ordering::SeqCst), 0, "replaced slot fired");
    assert_eq!(second.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_invalid_url_is_caller_error() {
    let downloader = DownloaderBuilder::new().build();
    let recorder = Recorder::attach(&downloader);

    downloader.download("::not-a-url::", "/tmp/out.bin", "bad").await;

    let errors = recorder.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::InvalidUrl);
    assert_eq!(errors[0].custom_id, "bad");
    assert!(recorder.successes().is_empty());
}

#[tokio::test]
async fn test_empty_url_is_caller_error() {
    let downloader = DownloaderBuilder::new().build();
    let recorder = Recorder::attach(&downloader);

    downloader.download("", "/tmp/out.bin", "empty").await;

    let errors = recorder.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::InvalidUrl);
}

#[tokio::test]
async fn test_empty_storage_path_is_caller_error() {
    let downloader = DownloaderBuilder::new().build();
    let recorder = Recorder::attach(&downloader);

    downloader.download("http://host/a.zip", "", "id1").await;

    let errors = recorder.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::InvalidStoragePath);
    assert_eq!(errors[0].url, "http://host/a.zip");
}

#[test]
fn test_sync_variant_delivers_before_return() {
    // No server needed: the URL fails validation, but the callback still
    // must have fired by the time the call returns.
    let downloader = DownloaderBuilder::new().build();
    let recorder = Recorder::attach(&downloader);

    downloader.download_sync("not a url", "/tmp/x", "sync-id");

    let errors = recorder.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::InvalidUrl);
    assert_eq!(errors[0].custom_id, "sync-id");
}
