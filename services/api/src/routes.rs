use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use listing_catalog::catalog::CatalogService;
use listing_catalog::config::ModeratorConfig;
use listing_catalog::router::catalog_router;
use listing_catalog::submissions::SubmissionStore;
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_catalog_routes<S>(
    catalog: Arc<CatalogService<S>>,
    moderator: ModeratorConfig,
) -> axum::Router
where
    S: SubmissionStore + 'static,
{
    catalog_router(catalog, moderator)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let persistence_failures = state.ledger.persistence_failures();
    let payload = if ready {
        json!({ "status": "ready", "persistence_failures": persistence_failures })
    } else {
        json!({ "status": "initializing", "persistence_failures": persistence_failures })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::LedgerHealth;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use listing_catalog::catalog::BaselineCatalog;
    use listing_catalog::submissions::MemoryStore;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    struct FailingLedger(u64);

    impl LedgerHealth for FailingLedger {
        fn persistence_failures(&self) -> u64 {
            self.0
        }
    }

    fn state(ready: bool, ledger: Arc<dyn LedgerHealth>) -> AppState {
        let recorder = PrometheusBuilder::new().build_recorder();
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(recorder.handle()),
            ledger,
        }
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn readiness_reports_persistence_failures() {
        let response = readiness_endpoint(Extension(state(true, Arc::new(FailingLedger(2)))))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ready");
        assert_eq!(body["persistence_failures"], 2);
    }

    #[tokio::test]
    async fn readiness_is_unavailable_until_bound() {
        let response = readiness_endpoint(Extension(state(false, Arc::new(FailingLedger(0)))))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(response).await["status"], "initializing");
    }

    #[tokio::test]
    async fn catalog_and_probe_routes_share_one_router() {
        let catalog = Arc::new(CatalogService::new(
            BaselineCatalog::sample(),
            Arc::new(MemoryStore::default()),
        ));
        let app = with_catalog_routes(catalog.clone(), ModeratorConfig::default())
            .layer(Extension(state(true, catalog)));

        let health = app
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
            .await
            .expect("health responds");
        assert_eq!(health.status(), StatusCode::OK);

        let listings = app
            .oneshot(
                Request::get("/api/v1/listings?category=land")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("listings respond");
        assert_eq!(listings.status(), StatusCode::OK);
        let cards = body_json(listings).await;
        let cards = cards.as_array().expect("card array");
        assert!(!cards.is_empty());
        assert!(cards.iter().all(|card| card["type"] == "land"));
    }
}
