use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::catalog::domain::{
    BuildingDetails, ElectricitySource, ListingFeatures, ListingId, PropertyLayout,
};
use crate::submissions::domain::{
    CandidateListing, Submission, SubmissionId, SubmissionPayload,
};
use crate::submissions::service::SubmissionService;
use crate::submissions::store::{MemoryStore, StoreError, SubmissionStore};

pub(crate) fn apartment_features() -> ListingFeatures {
    ListingFeatures {
        layout: PropertyLayout::Apartment(BuildingDetails {
            total_floors: 9,
            floor_number: 3,
            elevator: true,
        }),
        price: 200_000.0,
        size: 120.0,
        bedrooms: 2,
        bathrooms: 2,
        living_rooms: 1,
        kitchens: 1,
        balconies: 1,
        parking: 1,
        furnished: true,
        construction_year: 2015,
        water_source: "Municipal".to_string(),
        electricity_sources: BTreeSet::from([
            ElectricitySource::Solar,
            ElectricitySource::BuildingGenerator,
        ]),
        maps_link: "https://maps.example/tripoli".to_string(),
        description: Some("Sea view".to_string()),
    }
}

pub(crate) fn payload(full_address: &str, images: &[&str]) -> SubmissionPayload {
    SubmissionPayload {
        owner_name: "Rima Haddad".to_string(),
        owner_phone: "+961 70 123 456".to_string(),
        property: CandidateListing {
            features: apartment_features(),
            full_address: full_address.to_string(),
        },
        uploaded_images: images.iter().map(|image| image.to_string()).collect(),
        uploaded_documents: vec!["deed.pdf".to_string()],
        uploaded_owner_id: vec!["id-front.png".to_string()],
    }
}

pub(crate) fn submission(id: i64, payload: SubmissionPayload) -> Submission {
    Submission::from_payload(SubmissionId(id), payload)
}

pub(crate) fn build_service() -> (SubmissionService<MemoryStore>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = SubmissionService::open(store.clone(), [ListingId(1), ListingId(2)]);
    (service, store)
}

/// Store whose reads and writes always fail.
#[derive(Default)]
pub(crate) struct UnavailableStore {
    pub(crate) save_attempts: AtomicUsize,
}

impl SubmissionStore for UnavailableStore {
    fn load_submissions(&self) -> Result<Vec<Submission>, StoreError> {
        Err(StoreError::Unavailable("disk offline".to_string()))
    }

    fn save_submissions(&self, _submissions: &[Submission]) -> Result<(), StoreError> {
        self.save_attempts.fetch_add(1, Ordering::Relaxed);
        Err(StoreError::Unavailable("disk offline".to_string()))
    }
}

/// Store that records every snapshot it is handed.
#[derive(Default)]
pub(crate) struct RecordingStore {
    pub(crate) writes: Mutex<Vec<Vec<Submission>>>,
}

impl RecordingStore {
    pub(crate) fn write_count(&self) -> usize {
        self.writes.lock().expect("lock").len()
    }
}

impl SubmissionStore for RecordingStore {
    fn load_submissions(&self) -> Result<Vec<Submission>, StoreError> {
        Ok(Vec::new())
    }

    fn save_submissions(&self, submissions: &[Submission]) -> Result<(), StoreError> {
        self.writes.lock().expect("lock").push(submissions.to_vec());
        Ok(())
    }
}
