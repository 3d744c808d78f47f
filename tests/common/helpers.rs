use rand::RngCore;
use std::path::Path;
use std::sync::{Arc, Mutex, Once};
use tempfile::TempDir;

use hauler::{Downloader, TransferError};

static TRACING: Once = Once::new();

/// Installs a tracing subscriber honoring `RUST_LOG`, once per test binary.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Creates a temporary directory for testing purposes.
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Creates test file content of the given size with a deterministic pattern.
pub fn create_test_content(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 256) as u8).collect()
}

/// Creates random test file content of the given size.
pub fn create_random_content(size: usize) -> Vec<u8> {
    let mut content = vec![0u8; size];
    rand::rng().fill_bytes(&mut content);
    content
}

/// Asserts that a file exists and holds exactly `expected`.
pub fn assert_file_content(path: &Path, expected: &[u8]) {
    let actual = std::fs::read(path).expect("Failed to read file");
    assert_eq!(actual.len(), expected.len(), "size mismatch at {path:?}");
    assert_eq!(actual, expected, "content mismatch at {path:?}");
}

/// Records every callback a downloader fires, for later assertions.
///
/// Registering goes through the public callback slots, so the recorder also
/// exercises the registration surface.
#[derive(Clone, Default)]
pub struct Recorder {
    errors: Arc<Mutex<Vec<TransferError>>>,
    successes: Arc<Mutex<Vec<(String, String, String)>>>,
    progress: Arc<Mutex<Vec<(u64, u64, String, String)>>>,
}

impl Recorder {
    /// Registers all three callbacks on `downloader` and returns the
    /// recorder observing them.
    pub fn attach(downloader: &Downloader) -> Self {
        let recorder = Recorder::default();

        let errors = recorder.errors.clone();
        downloader.set_error_callback(move |err| {
            errors.lock().unwrap().push(err.clone());
        });

        let successes = recorder.successes.clone();
        downloader.set_success_callback(move |url, path, id| {
            successes
                .lock()
                .unwrap()
                .push((url.to_string(), path.to_string(), id.to_string()));
        });

        let progress = recorder.progress.clone();
        downloader.set_progress_callback(move |total, downloaded, url, id| {
            progress
                .lock()
                .unwrap()
                .push((total, downloaded, url.to_string(), id.to_string()));
        });

        recorder
    }

    pub fn errors(&self) -> Vec<TransferError> {
        self.errors.lock().unwrap().clone()
    }

    pub fn successes(&self) -> Vec<(String, String, String)> {
        self.successes.lock().unwrap().clone()
    }

    pub fn progress(&self) -> Vec<(u64, u64, String, String)> {
        self.progress.lock().unwrap().clone()
    }

    /// Progress ticks whose custom id equals `id`, as `(total, downloaded)`.
    pub fn progress_for(&self, id: &str) -> Vec<(u64, u64)> {
        self.progress()
            .into_iter()
            .filter(|(_, _, _, custom_id)| custom_id == id)
            .map(|(total, downloaded, _, _)| (total, downloaded))
            .collect()
    }

    pub fn errors_for(&self, id: &str) -> Vec<TransferError> {
        self.errors()
            .into_iter()
            .filter(|err| err.custom_id == id)
            .collect()
    }

    pub fn successes_for(&self, id: &str) -> Vec<(String, String, String)> {
        self.successes()
            .into_iter()
            .filter(|(_, _, custom_id)| custom_id == id)
            .collect()
    }

    /// Asserts the downloaded counts for `id` never decrease.
    pub fn assert_monotonic_progress(&self, id: &str) {
        let ticks = self.progress_for(id);
        for window in ticks.windows(2) {
            assert!(
                window[1].1 >= window[0].1,
                "progress rewound for {id}: {window:?}"
            );
        }
    }
}
