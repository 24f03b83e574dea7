use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::aggregator::{locate_listing, visible_catalog, ListingSource};
use super::domain::{Listing, ListingId};
use super::filter::{filter_catalog, FilterQuery};
use crate::submissions::{SubmissionService, SubmissionStore};

/// Browse and moderation facade over the baseline catalog and the submission ledger.
pub struct CatalogService<S> {
    baseline: RwLock<Vec<Listing>>,
    submissions: SubmissionService<S>,
}

impl<S> CatalogService<S>
where
    S: SubmissionStore + 'static,
{
    /// Baseline ids are reserved so no submission is ever assigned one.
    pub fn new(baseline: Vec<Listing>, store: Arc<S>) -> Self {
        let reserved: Vec<ListingId> = baseline.iter().map(|listing| listing.id).collect();
        let submissions = SubmissionService::open(store, reserved);
        Self {
            baseline: RwLock::new(baseline),
            submissions,
        }
    }

    pub fn submissions(&self) -> &SubmissionService<S> {
        &self.submissions
    }

    pub fn baseline(&self) -> Vec<Listing> {
        self.read_baseline().clone()
    }

    /// Every published listing: baseline first, then approved submissions.
    pub fn visible(&self) -> Vec<Listing> {
        let baseline = self.read_baseline();
        visible_catalog(&baseline, &self.submissions.list(None))
    }

    pub fn search(&self, query: &FilterQuery) -> Vec<Listing> {
        filter_catalog(&self.visible(), query)
    }

    pub fn listing(&self, id: ListingId) -> Option<Listing> {
        self.visible().into_iter().find(|listing| listing.id == id)
    }

    /// Take a listing off the catalog. Baseline removals live only in memory; submission
    /// removals go through the ledger and are persisted. Unknown ids are a no-op.
    pub fn remove_published(&self, id: ListingId) -> Option<ListingSource> {
        let mut baseline = self.write_baseline();
        let source = locate_listing(id, &baseline, &self.submissions.list(None));
        match source {
            Some(ListingSource::Baseline) => {
                baseline.retain(|listing| listing.id != id);
                tracing::info!(%id, "baseline listing removed");
            }
            Some(ListingSource::Submission) => {
                self.submissions.remove(id.into());
            }
            None => tracing::debug!(%id, "remove ignored unknown listing"),
        }
        source
    }

    fn read_baseline(&self) -> RwLockReadGuard<'_, Vec<Listing>> {
        self.baseline
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_baseline(&self) -> RwLockWriteGuard<'_, Vec<Listing>> {
        self.baseline
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::baseline::BaselineCatalog;
    use crate::catalog::filter::CategoryFilter;
    use crate::catalog::domain::PropertyType;
    use crate::submissions::tests::common::payload;
    use crate::submissions::{MemoryStore, SubmissionStatus};

    fn service() -> (CatalogService<MemoryStore>, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::default());
        (
            CatalogService::new(BaselineCatalog::sample(), store.clone()),
            store,
        )
    }

    #[test]
    fn approved_submission_joins_the_catalog() {
        let (catalog, _) = service();
        let baseline_len = catalog.baseline().len();
        let created = catalog.submissions().create(payload("Tripoli Center", &["a", "b"]));
        assert_eq!(catalog.visible().len(), baseline_len);

        catalog
            .submissions()
            .approve(created.id, "b")
            .expect("approve");
        let visible = catalog.visible();
        assert_eq!(visible.len(), baseline_len + 1);
        assert_eq!(visible.last().map(|listing| listing.id), Some(created.id.listing_id()));
        assert!(catalog.listing(created.id.listing_id()).is_some());
    }

    #[test]
    fn search_narrows_visible_catalog() {
        let (catalog, _) = service();
        let query = FilterQuery::default().category(CategoryFilter::Only(PropertyType::Land));
        let results = catalog.search(&query);
        assert!(!results.is_empty());
        assert!(results
            .iter()
            .all(|listing| listing.property_type() == PropertyType::Land));
    }

    #[test]
    fn remove_published_dispatches_by_identity_space() {
        let (catalog, store) = service();
        let created = catalog.submissions().create(payload("Tripoli", &["a"]));
        catalog.submissions().approve(created.id, "a").expect("approve");

        assert_eq!(
            catalog.remove_published(ListingId(1)),
            Some(ListingSource::Baseline)
        );
        assert!(catalog.baseline().iter().all(|listing| listing.id != ListingId(1)));
        assert_eq!(
            catalog.remove_published(created.id.listing_id()),
            Some(ListingSource::Submission)
        );
        assert!(store.snapshot().is_empty());

        assert_eq!(catalog.remove_published(ListingId(1)), None);
        assert_eq!(catalog.remove_published(created.id.listing_id()), None);
    }

    #[test]
    fn removed_baseline_ids_are_never_reissued() {
        let (catalog, _) = service();
        catalog.remove_published(ListingId(1));
        let created = catalog.submissions().create(payload("Sidon", &["a"]));
        assert_ne!(created.id.listing_id(), ListingId(1));
        assert_eq!(created.status, SubmissionStatus::Pending);
    }
}
