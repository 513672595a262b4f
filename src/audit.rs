//! Append-only audit log of fetch outcomes
//!
//! Every fetch a worker completes produces exactly one line here, success or
//! failure. The file is a write-only record: nothing in the pipeline reads
//! it back to make decisions.

use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// One-line-per-fetch sink, shared by all workers.
#[derive(Debug)]
pub struct AuditLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl AuditLog {
    /// Opens (and truncates) the audit log at `path`.
    ///
    /// A fresh run starts a fresh log; the structured run report, not this
    /// file, is the durable record of what failed.
    pub fn create(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
        })
    }

    /// Appends one timestamped line.
    pub fn record(&self, msg: &str) {
        let date = Local::now().format("%d-%m-%Y %H:%M:%S");
        let mut file = self.file.lock().unwrap();
        if let Err(e) = writeln!(file, "[{}]: {}", date, msg) {
            tracing::warn!("Failed to write audit line to {:?}: {}", self.path, e);
        }
    }

    /// Records a delivered fetch outcome.
    pub fn record_fetch(&self, path: &str, status: u16) {
        if status < 400 {
            self.record(&format!("{} successfully downloaded!", path));
        } else {
            self.record(&format!("{} download failed with code {}!", path, status));
        }
    }

    /// Records a fetch that produced no outcome at all.
    pub fn record_transport_failure(&self, path: &str, error: &str) {
        self.record(&format!("{} download aborted: {}!", path, error));
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
