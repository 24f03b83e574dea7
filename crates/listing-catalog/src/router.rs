//! HTTP surface for browsing, intake, and moderation.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::catalog::{CatalogService, FilterForm, FilterQuery, ListingCard, ListingId, Locale};
use crate::config::ModeratorConfig;
use crate::error::AppError;
use crate::submissions::{SubmissionId, SubmissionPayload, SubmissionStatus, SubmissionStore};

pub const MODERATOR_USERNAME_HEADER: &str = "x-moderator-username";
pub const MODERATOR_PASSWORD_HEADER: &str = "x-moderator-password";

/// Shared state for the catalog routes.
pub struct CatalogState<S> {
    pub catalog: Arc<CatalogService<S>>,
    pub moderator: Arc<ModeratorConfig>,
}

impl<S> Clone for CatalogState<S> {
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
            moderator: Arc::clone(&self.moderator),
        }
    }
}

/// Router builder exposing the browse, intake, and moderation endpoints.
pub fn catalog_router<S>(catalog: Arc<CatalogService<S>>, moderator: ModeratorConfig) -> Router
where
    S: SubmissionStore + 'static,
{
    let state = CatalogState {
        catalog,
        moderator: Arc::new(moderator),
    };

    Router::new()
        .route("/api/v1/listings", get(list_listings::<S>))
        .route("/api/v1/listings/:listing_id", get(listing_detail::<S>))
        .route("/api/v1/submissions", post(create_submission::<S>))
        .route(
            "/api/v1/moderation/submissions",
            get(list_submissions::<S>),
        )
        .route(
            "/api/v1/moderation/submissions/:submission_id",
            get(submission_detail::<S>).delete(remove_submission::<S>),
        )
        .route(
            "/api/v1/moderation/submissions/:submission_id/approve",
            post(approve_submission::<S>),
        )
        .route(
            "/api/v1/moderation/submissions/:submission_id/reject",
            post(reject_submission::<S>),
        )
        .route("/api/v1/moderation/listings", get(published_listings::<S>))
        .route(
            "/api/v1/moderation/listings/:listing_id",
            delete(remove_listing::<S>),
        )
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListingsParams {
    #[serde(flatten)]
    pub(crate) filters: FilterForm,
    #[serde(default)]
    pub(crate) lang: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct StatusParams {
    #[serde(default)]
    pub(crate) status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApproveRequest {
    #[serde(default)]
    pub(crate) cover_image: Option<String>,
}

pub(crate) async fn list_listings<S>(
    State(state): State<CatalogState<S>>,
    Query(params): Query<ListingsParams>,
) -> Response
where
    S: SubmissionStore + 'static,
{
    let locale = params
        .lang
        .as_deref()
        .and_then(Locale::parse)
        .unwrap_or_default();
    let query = FilterQuery::from(&params.filters);
    let cards: Vec<ListingCard> = state
        .catalog
        .search(&query)
        .iter()
        .map(|listing| listing.card(locale))
        .collect();

    (StatusCode::OK, Json(cards)).into_response()
}

pub(crate) async fn listing_detail<S>(
    State(state): State<CatalogState<S>>,
    Path(listing_id): Path<i64>,
) -> Response
where
    S: SubmissionStore + 'static,
{
    match state.catalog.listing(ListingId(listing_id)) {
        Some(listing) => (StatusCode::OK, Json(listing)).into_response(),
        None => error_response(
            StatusCode::NOT_FOUND,
            format!("listing {listing_id} not found"),
        ),
    }
}

pub(crate) async fn create_submission<S>(
    State(state): State<CatalogState<S>>,
    Json(payload): Json<SubmissionPayload>,
) -> Response
where
    S: SubmissionStore + 'static,
{
    let submission = state.catalog.submissions().create(payload);
    (StatusCode::ACCEPTED, Json(submission)).into_response()
}

pub(crate) async fn list_submissions<S>(
    State(state): State<CatalogState<S>>,
    headers: HeaderMap,
    Query(params): Query<StatusParams>,
) -> Response
where
    S: SubmissionStore + 'static,
{
    if let Some(denied) = authorize(&state.moderator, &headers) {
        return denied;
    }

    let status = match params.status.as_deref().map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(raw) => match SubmissionStatus::parse(raw) {
            Some(status) => Some(status),
            None => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("unknown submission status '{raw}'"),
                )
            }
        },
    };

    let submissions = state.catalog.submissions();
    let payload = json!({
        "counts": submissions.counts(),
        "submissions": submissions.list(status),
    });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn submission_detail<S>(
    State(state): State<CatalogState<S>>,
    headers: HeaderMap,
    Path(submission_id): Path<i64>,
) -> Response
where
    S: SubmissionStore + 'static,
{
    if let Some(denied) = authorize(&state.moderator, &headers) {
        return denied;
    }

    match state.catalog.submissions().get(SubmissionId(submission_id)) {
        Ok(submission) => (StatusCode::OK, Json(submission)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn approve_submission<S>(
    State(state): State<CatalogState<S>>,
    headers: HeaderMap,
    Path(submission_id): Path<i64>,
    body: Bytes,
) -> Response
where
    S: SubmissionStore + 'static,
{
    if let Some(denied) = authorize(&state.moderator, &headers) {
        return denied;
    }

    // An absent body is an approval without a cover choice.
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        ApproveRequest::default()
    } else {
        match serde_json::from_slice::<ApproveRequest>(&body) {
            Ok(request) => request,
            Err(error) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("invalid approval body: {error}"),
                )
            }
        }
    };

    let cover_image = request.cover_image.unwrap_or_default();
    match state
        .catalog
        .submissions()
        .approve(SubmissionId(submission_id), &cover_image)
    {
        Ok(submission) => (StatusCode::OK, Json(submission)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn reject_submission<S>(
    State(state): State<CatalogState<S>>,
    headers: HeaderMap,
    Path(submission_id): Path<i64>,
) -> Response
where
    S: SubmissionStore + 'static,
{
    if let Some(denied) = authorize(&state.moderator, &headers) {
        return denied;
    }

    match state.catalog.submissions().reject(SubmissionId(submission_id)) {
        Ok(submission) => (StatusCode::OK, Json(submission)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn remove_submission<S>(
    State(state): State<CatalogState<S>>,
    headers: HeaderMap,
    Path(submission_id): Path<i64>,
) -> Response
where
    S: SubmissionStore + 'static,
{
    if let Some(denied) = authorize(&state.moderator, &headers) {
        return denied;
    }

    let removed = state
        .catalog
        .submissions()
        .remove(SubmissionId(submission_id));
    (StatusCode::OK, Json(json!({ "removed": removed }))).into_response()
}

pub(crate) async fn published_listings<S>(
    State(state): State<CatalogState<S>>,
    headers: HeaderMap,
) -> Response
where
    S: SubmissionStore + 'static,
{
    if let Some(denied) = authorize(&state.moderator, &headers) {
        return denied;
    }

    (StatusCode::OK, Json(state.catalog.visible())).into_response()
}

pub(crate) async fn remove_listing<S>(
    State(state): State<CatalogState<S>>,
    headers: HeaderMap,
    Path(listing_id): Path<i64>,
) -> Response
where
    S: SubmissionStore + 'static,
{
    if let Some(denied) = authorize(&state.moderator, &headers) {
        return denied;
    }

    let source = state.catalog.remove_published(ListingId(listing_id));
    (
        StatusCode::OK,
        Json(json!({ "removed": source.is_some(), "source": source })),
    )
        .into_response()
}

fn authorize(moderator: &ModeratorConfig, headers: &HeaderMap) -> Option<Response> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };

    if moderator.admits(
        &header(MODERATOR_USERNAME_HEADER),
        &header(MODERATOR_PASSWORD_HEADER),
    ) {
        None
    } else {
        tracing::warn!("moderation request rejected by credential gate");
        Some(error_response(
            StatusCode::UNAUTHORIZED,
            "invalid moderator credentials".to_string(),
        ))
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
