use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::domain::{ListingFeatures, ListingId};

/// Identity assigned to a submission at intake; approved submissions keep it as their listing id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(pub i64);

impl SubmissionId {
    pub const fn listing_id(self) -> ListingId {
        ListingId(self.0)
    }
}

impl From<ListingId> for SubmissionId {
    fn from(value: ListingId) -> Self {
        SubmissionId(value.0)
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Moderation state. Removal deletes the record instead of adding a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Approved => "approved",
            SubmissionStatus::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(SubmissionStatus::Pending),
            "approved" => Some(SubmissionStatus::Approved),
            "rejected" => Some(SubmissionStatus::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Listing proposed by an owner, before moderation attaches identity and cover image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateListing {
    #[serde(flatten)]
    pub features: ListingFeatures,
    /// Free-text address typed by the owner; becomes the address in every locale.
    pub full_address: String,
}

/// Intake form output. File references are already converted to storable strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub owner_name: String,
    pub owner_phone: String,
    pub property: CandidateListing,
    #[serde(default)]
    pub uploaded_images: Vec<String>,
    #[serde(default)]
    pub uploaded_documents: Vec<String>,
    #[serde(default)]
    pub uploaded_owner_id: Vec<String>,
}

/// Durable moderation record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: SubmissionId,
    pub status: SubmissionStatus,
    pub owner_name: String,
    pub owner_phone: String,
    pub property: CandidateListing,
    /// Chosen during approval; always one of `uploaded_images`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub uploaded_images: Vec<String>,
    #[serde(default)]
    pub uploaded_documents: Vec<String>,
    #[serde(default)]
    pub uploaded_owner_id: Vec<String>,
}

impl Submission {
    pub(crate) fn from_payload(id: SubmissionId, payload: SubmissionPayload) -> Self {
        let SubmissionPayload {
            owner_name,
            owner_phone,
            property,
            uploaded_images,
            uploaded_documents,
            uploaded_owner_id,
        } = payload;

        Self {
            id,
            status: SubmissionStatus::Pending,
            owner_name,
            owner_phone,
            property,
            cover_image: None,
            uploaded_images,
            uploaded_documents,
            uploaded_owner_id,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == SubmissionStatus::Pending
    }

    pub fn has_image(&self, reference: &str) -> bool {
        self.uploaded_images.iter().any(|image| image == reference)
    }
}

/// Per-status totals for the moderation tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SubmissionCounts {
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

impl SubmissionCounts {
    pub fn tally<'a>(submissions: impl IntoIterator<Item = &'a Submission>) -> Self {
        submissions
            .into_iter()
            .fold(Self::default(), |mut counts, submission| {
                match submission.status {
                    SubmissionStatus::Pending => counts.pending += 1,
                    SubmissionStatus::Approved => counts.approved += 1,
                    SubmissionStatus::Rejected => counts.rejected += 1,
                }
                counts
            })
    }
}
