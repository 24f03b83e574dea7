use serde::Serialize;

use super::domain::{Listing, ListingId, LocalizedText};
use crate::submissions::{Submission, SubmissionId, SubmissionStatus};

/// Collection that owns a given listing id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingSource {
    Baseline,
    Submission,
}

/// Cover used when an approved submission somehow lacks a chosen image.
pub fn placeholder_cover(id: ListingId) -> String {
    format!("https://picsum.photos/seed/{}/800/600", id.0)
}

/// Publish an approved submission as a listing. The owner's free-text address is used
/// verbatim for every locale.
pub fn project_submission(submission: &Submission) -> Listing {
    let id = submission.id.listing_id();
    Listing {
        id,
        cover_image: submission
            .cover_image
            .clone()
            .unwrap_or_else(|| placeholder_cover(id)),
        address: LocalizedText::uniform(&submission.property.full_address),
        features: submission.property.features.clone(),
    }
}

/// Baseline listings followed by approved submissions, each in its own order.
pub fn visible_catalog(baseline: &[Listing], submissions: &[Submission]) -> Vec<Listing> {
    baseline
        .iter()
        .cloned()
        .chain(
            submissions
                .iter()
                .filter(|submission| submission.status == SubmissionStatus::Approved)
                .map(project_submission),
        )
        .collect()
}

/// Which collection holds `id`. Baseline wins if both somehow do.
pub fn locate_listing(
    id: ListingId,
    baseline: &[Listing],
    submissions: &[Submission],
) -> Option<ListingSource> {
    if baseline.iter().any(|listing| listing.id == id) {
        Some(ListingSource::Baseline)
    } else if submissions
        .iter()
        .any(|submission| submission.id == SubmissionId::from(id))
    {
        Some(ListingSource::Submission)
    } else {
        None
    }
}

/// Remove `id` from exactly one collection. Unknown ids leave both untouched.
pub fn remove_listing(
    id: ListingId,
    mut baseline: Vec<Listing>,
    mut submissions: Vec<Submission>,
) -> (Vec<Listing>, Vec<Submission>) {
    match locate_listing(id, &baseline, &submissions) {
        Some(ListingSource::Baseline) => baseline.retain(|listing| listing.id != id),
        Some(ListingSource::Submission) => {
            let target = SubmissionId::from(id);
            submissions.retain(|submission| submission.id != target);
        }
        None => {}
    }
    (baseline, submissions)
}
