//! Callback slot storage and serialized delivery.
//!
//! One hub per downloader (shared by clones) holds the three registered
//! slots. Registration replaces the previous callback — last wins, never
//! composes. Delivery takes a dedicated lock so no two callbacks of one hub
//! run concurrently, even while the underlying transfers proceed in
//! parallel; reconfiguring slots during an in-flight batch is the caller's
//! responsibility.

use super::config::{ErrorCallback, ProgressCallback, SuccessCallback};
use crate::error::TransferError;

use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Slots {
    on_error: Option<Arc<ErrorCallback>>,
    on_progress: Option<Arc<ProgressCallback>>,
    on_success: Option<Arc<SuccessCallback>>,
}

/// The single notification channel back to the caller.
#[derive(Default)]
pub(crate) struct CallbackHub {
    slots: Mutex<Slots>,
    delivery: Mutex<()>,
}

impl CallbackHub {
    pub fn set_error(&self, callback: ErrorCallback) {
        self.slots.lock().unwrap().on_error = Some(Arc::new(callback));
    }

    pub fn set_progress(&self, callback: ProgressCallback) {
        self.slots.lock().unwrap().on_progress = Some(Arc::new(callback));
    }

    pub fn set_success(&self, callback: SuccessCallback) {
        self.slots.lock().unwrap().on_success = Some(Arc::new(callback));
    }

    pub fn error(&self, err: &TransferError) {
        let cb = self.slots.lock().unwrap().on_error.clone();
        if let Some(cb) = cb {
            let _serialized = self.delivery.lock().unwrap();
            cb(err);
        }
    }

    pub fn progress(&self, total: u64, downloaded: u64, url: &str, custom_id: &str) {
        let cb = self.slots.lock().unwrap().on_progress.clone();
        if let Some(cb) = cb {
            let _serialized = self.delivery.lock().unwrap();
            cb(total, downloaded, url, custom_id);
        }
    }

    pub fn success(&self, url: &str, storage_path: &str, custom_id: &str) {
        let cb = self.slots.lock().unwrap().on_success.clone();
        if let Some(cb) = cb {
            let _serialized = self.delivery.lock().unwrap();
            cb(url, storage_path, custom_id);
        }
    }
}
