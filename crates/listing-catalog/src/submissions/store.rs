//! Durable storage for the submission set.
//!
//! Stores always read and write the whole collection; there are no per-record updates.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use super::domain::Submission;

/// Persistence boundary the lifecycle service depends on.
pub trait SubmissionStore: Send + Sync {
    /// Load every stored submission in insertion order. A store that was never written loads as empty.
    fn load_submissions(&self) -> Result<Vec<Submission>, StoreError>;

    /// Replace the stored collection with `submissions`.
    fn save_submissions(&self, submissions: &[Submission]) -> Result<(), StoreError>;
}

/// Storage could not be read or written.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("persistence unavailable: {0}")]
    Io(#[from] std::io::Error),
    #[error("persistence unavailable: stored submissions are not valid JSON: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error("persistence unavailable: unsupported store version {0}")]
    UnsupportedVersion(u32),
    #[error("persistence unavailable: {0}")]
    Unavailable(String),
}

const STORE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StoreDocument<T> {
    version: u32,
    #[serde(default)]
    submissions: T,
}

/// JSON document on the local filesystem, replaced atomically on every save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SubmissionStore for JsonFileStore {
    fn load_submissions(&self) -> Result<Vec<Submission>, StoreError> {
        if !self.path.exists() {
            tracing::debug!(path = ?self.path, "submission store not created yet");
            return Ok(Vec::new());
        }

        let contents = std::fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        let document: StoreDocument<Vec<Submission>> = serde_json::from_str(&contents)?;
        if document.version != STORE_VERSION {
            return Err(StoreError::UnsupportedVersion(document.version));
        }

        tracing::debug!(
            path = ?self.path,
            count = document.submissions.len(),
            "loaded submissions"
        );
        Ok(document.submissions)
    }

    fn save_submissions(&self, submissions: &[Submission]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let document = StoreDocument {
            version: STORE_VERSION,
            submissions,
        };
        let json = serde_json::to_string_pretty(&document)?;

        let tmp_path = self.path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.path)?;

        tracing::debug!(path = ?self.path, count = submissions.len(), "saved submissions");
        Ok(())
    }
}

/// Process-local store, used by tests and the demo command.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    submissions: Arc<Mutex<Vec<Submission>>>,
}

impl MemoryStore {
    pub fn with_submissions(submissions: Vec<Submission>) -> Self {
        Self {
            submissions: Arc::new(Mutex::new(submissions)),
        }
    }

    pub fn snapshot(&self) -> Vec<Submission> {
        self.submissions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl SubmissionStore for MemoryStore {
    fn load_submissions(&self) -> Result<Vec<Submission>, StoreError> {
        Ok(self.snapshot())
    }

    fn save_submissions(&self, submissions: &[Submission]) -> Result<(), StoreError> {
        let mut guard = self
            .submissions
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))?;
        *guard = submissions.to_vec();
        Ok(())
    }
}
