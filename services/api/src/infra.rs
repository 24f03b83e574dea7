use crate::cli::StorageArgs;
use listing_catalog::catalog::{BaselineCatalog, CatalogService, Listing};
use listing_catalog::config::StorageConfig;
use listing_catalog::error::AppError;
use listing_catalog::submissions::{JsonFileStore, SubmissionStatus, SubmissionStore};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) ledger: Arc<dyn LedgerHealth>,
}

/// Persistence health reported by the readiness probe.
pub(crate) trait LedgerHealth: Send + Sync {
    fn persistence_failures(&self) -> u64;
}

impl<S> LedgerHealth for CatalogService<S>
where
    S: SubmissionStore + 'static,
{
    fn persistence_failures(&self) -> u64 {
        self.submissions().persistence_failures()
    }
}

pub(crate) fn apply_storage_overrides(storage: &mut StorageConfig, args: StorageArgs) {
    if let Some(path) = args.submissions {
        storage.submissions_path = path;
    }
    if let Some(path) = args.baseline {
        storage.baseline_csv = Some(path);
    }
}

pub(crate) fn parse_status(value: &str) -> Result<SubmissionStatus, String> {
    SubmissionStatus::parse(value)
        .ok_or_else(|| format!("unknown submission status '{value}' (pending, approved, rejected)"))
}

/// Configured baseline CSV, or the built-in sample catalog when none is set.
pub(crate) fn load_baseline(storage: &StorageConfig) -> Result<Vec<Listing>, AppError> {
    match &storage.baseline_csv {
        Some(path) => Ok(BaselineCatalog::from_path(path)?),
        None => Ok(BaselineCatalog::sample()),
    }
}

pub(crate) fn open_catalog(
    storage: &StorageConfig,
) -> Result<CatalogService<JsonFileStore>, AppError> {
    let baseline = load_baseline(storage)?;
    let store = Arc::new(JsonFileStore::new(storage.submissions_path.clone()));
    Ok(CatalogService::new(baseline, store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn storage() -> StorageConfig {
        StorageConfig {
            submissions_path: PathBuf::from("data/submissions.json"),
            baseline_csv: None,
        }
    }

    #[test]
    fn overrides_replace_only_given_paths() {
        let mut config = storage();
        apply_storage_overrides(
            &mut config,
            StorageArgs {
                submissions: None,
                baseline: Some(PathBuf::from("baseline.csv")),
            },
        );
        assert_eq!(config.submissions_path, PathBuf::from("data/submissions.json"));
        assert_eq!(config.baseline_csv, Some(PathBuf::from("baseline.csv")));
    }

    #[test]
    fn parses_status_flags() {
        assert_eq!(parse_status("approved"), Ok(SubmissionStatus::Approved));
        assert!(parse_status("archived").is_err());
    }

    #[test]
    fn missing_baseline_csv_falls_back_to_sample() {
        let listings = load_baseline(&storage()).expect("sample loads");
        assert_eq!(listings, BaselineCatalog::sample());
    }

    #[test]
    fn unreadable_baseline_csv_is_an_error() {
        let mut config = storage();
        config.baseline_csv = Some(PathBuf::from("./missing-baseline.csv"));
        assert!(matches!(load_baseline(&config), Err(AppError::Baseline(_))));
    }
}
