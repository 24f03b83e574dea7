use crate::cli::ServeArgs;
use crate::infra::{apply_storage_overrides, open_catalog, AppState};
use crate::routes::with_catalog_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use listing_catalog::config::AppConfig;
use listing_catalog::error::AppError;
use listing_catalog::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    apply_storage_overrides(&mut config.storage, args.storage);

    telemetry::init(&config.telemetry)?;

    if !config.moderator.is_configured() {
        warn!("moderator credentials not configured; moderation routes will deny every request");
    }

    let catalog = Arc::new(open_catalog(&config.storage)?);

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        ledger: catalog.clone(),
    };

    let app = with_catalog_routes(catalog, config.moderator.clone())
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        submissions = %config.storage.submissions_path.display(),
        "listing catalog ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
