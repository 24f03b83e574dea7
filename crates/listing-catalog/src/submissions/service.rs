use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;

use super::domain::{
    Submission, SubmissionCounts, SubmissionId, SubmissionPayload, SubmissionStatus,
};
use super::store::SubmissionStore;
use crate::catalog::domain::ListingId;

/// Hands out submission ids from the wall clock, never repeating or touching a reserved id.
#[derive(Debug, Clone, Default)]
pub struct SubmissionIdSource {
    last_issued: i64,
    reserved: HashSet<i64>,
}

impl SubmissionIdSource {
    pub fn new(reserved: impl IntoIterator<Item = ListingId>) -> Self {
        Self {
            last_issued: 0,
            reserved: reserved.into_iter().map(|id| id.0).collect(),
        }
    }

    /// Record an id that already exists so later ids stay above it.
    pub fn observe(&mut self, id: SubmissionId) {
        self.last_issued = self.last_issued.max(id.0);
    }

    pub fn next_at(&mut self, now_millis: i64) -> SubmissionId {
        let mut candidate = now_millis.max(self.last_issued.saturating_add(1));
        while self.reserved.contains(&candidate) {
            candidate = candidate.saturating_add(1);
        }
        self.last_issued = candidate;
        SubmissionId(candidate)
    }
}

/// Error raised by the submission lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("cannot {action} submission {id}: it is already {status}")]
    InvalidTransition {
        id: SubmissionId,
        status: SubmissionStatus,
        action: &'static str,
    },
    #[error("submission {id} needs a cover image chosen from its uploaded images")]
    InvalidCoverImage { id: SubmissionId },
    #[error("submission {0} not found")]
    NotFound(SubmissionId),
}

#[derive(Debug, Default)]
struct Ledger {
    submissions: Vec<Submission>,
    ids: SubmissionIdSource,
}

impl Ledger {
    fn position(&self, id: SubmissionId) -> Result<usize, SubmissionError> {
        self.submissions
            .iter()
            .position(|submission| submission.id == id)
            .ok_or(SubmissionError::NotFound(id))
    }
}

/// Single writer over the submission set. Every successful mutation is followed by a
/// whole-collection save; a failed save is logged and counted but the in-memory change stands.
pub struct SubmissionService<S> {
    store: Arc<S>,
    ledger: Mutex<Ledger>,
    persistence_failures: AtomicU64,
}

impl<S> SubmissionService<S>
where
    S: SubmissionStore + 'static,
{
    /// Load the stored submissions, degrading to an empty set when the store is unreadable.
    pub fn open(store: Arc<S>, reserved: impl IntoIterator<Item = ListingId>) -> Self {
        let mut ids = SubmissionIdSource::new(reserved);
        let mut failures = 0;
        let submissions = match store.load_submissions() {
            Ok(submissions) => submissions,
            Err(error) => {
                tracing::warn!(%error, "submission store unreadable; starting with no submissions");
                failures += 1;
                Vec::new()
            }
        };
        for submission in &submissions {
            ids.observe(submission.id);
        }
        tracing::info!(count = submissions.len(), "submission ledger ready");

        Self {
            store,
            ledger: Mutex::new(Ledger { submissions, ids }),
            persistence_failures: AtomicU64::new(failures),
        }
    }

    /// Register a new pending submission.
    pub fn create(&self, payload: SubmissionPayload) -> Submission {
        let mut ledger = self.lock();
        let id = ledger.ids.next_at(Utc::now().timestamp_millis());
        let submission = Submission::from_payload(id, payload);
        ledger.submissions.push(submission.clone());
        tracing::info!(%id, images = submission.uploaded_images.len(), "submission received");
        self.persist(&ledger);
        submission
    }

    /// Publish a pending submission using one of its own uploaded images as cover.
    pub fn approve(
        &self,
        id: SubmissionId,
        cover_image: &str,
    ) -> Result<Submission, SubmissionError> {
        let mut ledger = self.lock();
        let index = ledger.position(id)?;
        let submission = &mut ledger.submissions[index];
        ensure_pending(submission, "approve")?;
        if cover_image.trim().is_empty() || !submission.has_image(cover_image) {
            return Err(SubmissionError::InvalidCoverImage { id });
        }

        submission.status = SubmissionStatus::Approved;
        submission.cover_image = Some(cover_image.to_string());
        let approved = submission.clone();
        tracing::info!(%id, "submission approved");
        self.persist(&ledger);
        Ok(approved)
    }

    pub fn reject(&self, id: SubmissionId) -> Result<Submission, SubmissionError> {
        let mut ledger = self.lock();
        let index = ledger.position(id)?;
        let submission = &mut ledger.submissions[index];
        ensure_pending(submission, "reject")?;

        submission.status = SubmissionStatus::Rejected;
        let rejected = submission.clone();
        tracing::info!(%id, "submission rejected");
        self.persist(&ledger);
        Ok(rejected)
    }

    /// Delete a submission in any state. Returns whether anything was removed; absence is not an error.
    pub fn remove(&self, id: SubmissionId) -> bool {
        let mut ledger = self.lock();
        let before = ledger.submissions.len();
        ledger.submissions.retain(|submission| submission.id != id);
        if ledger.submissions.len() == before {
            tracing::debug!(%id, "remove ignored unknown submission");
            return false;
        }
        tracing::info!(%id, "submission removed");
        self.persist(&ledger);
        true
    }

    /// Submissions in insertion order, optionally restricted to one status.
    pub fn list(&self, status: Option<SubmissionStatus>) -> Vec<Submission> {
        self.lock()
            .submissions
            .iter()
            .filter(|submission| status.map_or(true, |wanted| submission.status == wanted))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: SubmissionId) -> Result<Submission, SubmissionError> {
        let ledger = self.lock();
        let index = ledger.position(id)?;
        Ok(ledger.submissions[index].clone())
    }

    pub fn contains(&self, id: SubmissionId) -> bool {
        self.lock().position(id).is_ok()
    }

    pub fn counts(&self) -> SubmissionCounts {
        SubmissionCounts::tally(self.lock().submissions.iter())
    }

    /// Number of load or save attempts that failed since the service was opened.
    pub fn persistence_failures(&self) -> u64 {
        self.persistence_failures.load(Ordering::Relaxed)
    }

    fn lock(&self) -> MutexGuard<'_, Ledger> {
        self.ledger
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // Runs under the ledger lock so saves land in mutation order.
    fn persist(&self, ledger: &Ledger) {
        if let Err(error) = self.store.save_submissions(&ledger.submissions) {
            self.persistence_failures.fetch_add(1, Ordering::Relaxed);
            tracing::error!(%error, "failed to persist submissions; keeping in-memory state");
        }
    }
}

fn ensure_pending(submission: &Submission, action: &'static str) -> Result<(), SubmissionError> {
    if submission.is_pending() {
        Ok(())
    } else {
        Err(SubmissionError::InvalidTransition {
            id: submission.id,
            status: submission.status,
            action,
        })
    }
}
