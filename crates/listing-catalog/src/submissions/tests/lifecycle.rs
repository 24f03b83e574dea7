use super::common::*;
use crate::catalog::domain::ListingId;
use crate::submissions::domain::{SubmissionId, SubmissionStatus};
use crate::submissions::service::{SubmissionError, SubmissionIdSource, SubmissionService};
use crate::submissions::store::{MemoryStore, SubmissionStore};
use std::sync::atomic::Ordering;
use std::sync::Arc;

#[test]
fn create_stores_payload_as_pending() {
    let (service, store) = build_service();
    let created = service.create(payload("Tripoli Center", &["a", "b", "c"]));

    assert_eq!(created.status, SubmissionStatus::Pending);
    assert_eq!(created.cover_image, None);
    assert_eq!(created.uploaded_images, vec!["a", "b", "c"]);
    assert_eq!(created.property.full_address, "Tripoli Center");
    assert_eq!(store.snapshot(), vec![created]);
}

#[test]
fn created_ids_are_unique_and_increasing() {
    let (service, _) = build_service();
    let ids: Vec<_> = (0..5)
        .map(|_| service.create(payload("Sidon", &["a"])).id)
        .collect();

    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn id_source_skips_reserved_and_stays_above_loaded_ids() {
    let mut source = SubmissionIdSource::new([ListingId(100), ListingId(101)]);
    assert_eq!(source.next_at(100), SubmissionId(102));
    assert_eq!(source.next_at(50), SubmissionId(103));

    source.observe(SubmissionId(500));
    assert_eq!(source.next_at(10), SubmissionId(501));
}

#[test]
fn approve_attaches_cover_image() {
    let (service, store) = build_service();
    let created = service.create(payload("Tripoli Center", &["a", "b", "c"]));

    let approved = service.approve(created.id, "b").expect("approval succeeds");
    assert_eq!(approved.status, SubmissionStatus::Approved);
    assert_eq!(approved.cover_image.as_deref(), Some("b"));
    assert_eq!(store.snapshot()[0].status, SubmissionStatus::Approved);
}

#[test]
fn approve_rejects_foreign_or_empty_cover_image() {
    let (service, _) = build_service();
    let created = service.create(payload("Tripoli Center", &["a", "b", "c"]));

    for cover in ["", "   ", "z"] {
        assert_eq!(
            service.approve(created.id, cover),
            Err(SubmissionError::InvalidCoverImage { id: created.id })
        );
    }
    let unchanged = service.get(created.id).expect("still present");
    assert_eq!(unchanged, created);
}

#[test]
fn approve_without_uploaded_images_is_impossible() {
    let (service, _) = build_service();
    let created = service.create(payload("Byblos", &[]));
    assert!(matches!(
        service.approve(created.id, "a"),
        Err(SubmissionError::InvalidCoverImage { .. })
    ));
}

#[test]
fn approved_and_rejected_are_terminal() {
    let (service, _) = build_service();
    let approved = service.create(payload("Tripoli", &["a"]));
    let rejected = service.create(payload("Tyre", &["a"]));
    service.approve(approved.id, "a").expect("approve");
    service.reject(rejected.id).expect("reject");

    assert_eq!(
        service.reject(approved.id),
        Err(SubmissionError::InvalidTransition {
            id: approved.id,
            status: SubmissionStatus::Approved,
            action: "reject",
        })
    );
    assert!(matches!(
        service.approve(rejected.id, "a"),
        Err(SubmissionError::InvalidTransition {
            status: SubmissionStatus::Rejected,
            ..
        })
    ));
    assert!(matches!(
        service.approve(approved.id, "a"),
        Err(SubmissionError::InvalidTransition { .. })
    ));

    assert_eq!(
        service.get(approved.id).expect("present").status,
        SubmissionStatus::Approved
    );
    assert_eq!(
        service.get(rejected.id).expect("present").status,
        SubmissionStatus::Rejected
    );
}

#[test]
fn reject_changes_only_status() {
    let (service, _) = build_service();
    let created = service.create(payload("Zahle", &["a"]));
    let rejected = service.reject(created.id).expect("reject");

    assert_eq!(rejected.status, SubmissionStatus::Rejected);
    assert_eq!(rejected.cover_image, None);
    assert_eq!(rejected.property, created.property);
    assert_eq!(rejected.uploaded_images, created.uploaded_images);
}

#[test]
fn missing_ids_report_not_found() {
    let (service, _) = build_service();
    let missing = SubmissionId(42);
    assert_eq!(
        service.approve(missing, "a"),
        Err(SubmissionError::NotFound(missing))
    );
    assert_eq!(service.reject(missing), Err(SubmissionError::NotFound(missing)));
    assert_eq!(service.get(missing), Err(SubmissionError::NotFound(missing)));
}

#[test]
fn remove_is_idempotent_across_states() {
    let (service, store) = build_service();
    let pending = service.create(payload("Aley", &["a"]));
    let approved = service.create(payload("Broummana", &["a"]));
    service.approve(approved.id, "a").expect("approve");

    assert!(service.remove(approved.id));
    let after_first = store.snapshot();
    assert!(!service.remove(approved.id));
    assert_eq!(store.snapshot(), after_first);
    assert!(!service.remove(SubmissionId(7)));

    assert_eq!(service.list(None), vec![pending]);
}

#[test]
fn list_filters_by_status_in_insertion_order() {
    let (service, _) = build_service();
    let first = service.create(payload("One", &["a"]));
    let second = service.create(payload("Two", &["a"]));
    let third = service.create(payload("Three", &["a"]));
    service.reject(second.id).expect("reject");

    let all_ids: Vec<_> = service.list(None).iter().map(|s| s.id).collect();
    assert_eq!(all_ids, vec![first.id, second.id, third.id]);

    let pending_ids: Vec<_> = service
        .list(Some(SubmissionStatus::Pending))
        .iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(pending_ids, vec![first.id, third.id]);

    let counts = service.counts();
    assert_eq!((counts.pending, counts.approved, counts.rejected), (2, 0, 1));
}

#[test]
fn every_successful_mutation_writes_the_full_set() {
    let store = Arc::new(RecordingStore::default());
    let service = SubmissionService::open(store.clone(), []);

    let first = service.create(payload("One", &["a"]));
    let second = service.create(payload("Two", &["a"]));
    service.approve(first.id, "a").expect("approve");
    service.reject(second.id).expect("reject");
    service.remove(second.id);
    assert_eq!(store.write_count(), 5);

    let _ = service.reject(first.id);
    let _ = service.approve(SubmissionId(1), "a");
    service.remove(SubmissionId(1));
    assert_eq!(store.write_count(), 5);

    let writes = store.writes.lock().expect("lock");
    assert_eq!(writes[1].len(), 2);
    assert_eq!(writes[4].len(), 1);
}

#[test]
fn failed_saves_keep_in_memory_transition() {
    let store = Arc::new(UnavailableStore::default());
    let service = SubmissionService::open(store.clone(), []);
    assert_eq!(service.persistence_failures(), 1);

    let created = service.create(payload("Tripoli", &["a"]));
    let approved = service.approve(created.id, "a").expect("approval still applies");

    assert_eq!(approved.status, SubmissionStatus::Approved);
    assert_eq!(
        service.get(created.id).expect("present").status,
        SubmissionStatus::Approved
    );
    assert_eq!(store.save_attempts.load(Ordering::Relaxed), 2);
    assert_eq!(service.persistence_failures(), 3);
}

#[test]
fn reopening_resumes_from_stored_submissions() {
    let store = Arc::new(MemoryStore::default());
    let first_session = SubmissionService::open(store.clone(), []);
    let created = first_session.create(payload("Jbeil", &["a", "b"]));
    first_session.approve(created.id, "a").expect("approve");

    let second_session = SubmissionService::open(store.clone(), []);
    assert_eq!(
        second_session.list(None),
        store.load_submissions().expect("load")
    );
    let next = second_session.create(payload("Batroun", &["a"]));
    assert!(next.id > created.id);
}
