//! Owner submissions and their moderation lifecycle.
//!
//! Submissions enter as `pending` and leave that state exactly once, through approval
//! (which attaches a cover image) or rejection. Removal deletes the record outright.

pub mod domain;
pub mod service;
pub mod store;

#[cfg(test)]
pub(crate) mod tests;

pub use domain::{
    CandidateListing, Submission, SubmissionCounts, SubmissionId, SubmissionPayload,
    SubmissionStatus,
};
pub use service::{SubmissionError, SubmissionIdSource, SubmissionService};
pub use store::{JsonFileStore, MemoryStore, StoreError, SubmissionStore};
