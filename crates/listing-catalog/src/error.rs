use crate::catalog::BaselineImportError;
use crate::config::ConfigError;
use crate::submissions::{StoreError, SubmissionError};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Baseline(BaselineImportError),
    Submission(SubmissionError),
    Persistence(StoreError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Baseline(err) => write!(f, "catalog error: {}", err),
            AppError::Submission(err) => write!(f, "moderation error: {}", err),
            AppError::Persistence(err) => write!(f, "storage error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Baseline(err) => Some(err),
            AppError::Submission(err) => Some(err),
            AppError::Persistence(err) => Some(err),
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Submission(SubmissionError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Submission(SubmissionError::InvalidTransition { .. }) => {
                StatusCode::CONFLICT
            }
            AppError::Submission(SubmissionError::InvalidCoverImage { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Baseline(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<BaselineImportError> for AppError {
    fn from(value: BaselineImportError) -> Self {
        Self::Baseline(value)
    }
}

impl From<SubmissionError> for AppError {
    fn from(value: SubmissionError) -> Self {
        Self::Submission(value)
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        Self::Persistence(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submissions::{SubmissionId, SubmissionStatus};

    #[test]
    fn lifecycle_errors_map_to_client_statuses() {
        let id = SubmissionId(5);
        assert_eq!(
            AppError::from(SubmissionError::NotFound(id)).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(SubmissionError::InvalidTransition {
                id,
                status: SubmissionStatus::Rejected,
                action: "approve",
            })
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(SubmissionError::InvalidCoverImage { id }).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn infrastructure_errors_are_server_errors() {
        let error = AppError::from(StoreError::Unavailable("disk offline".to_string()));
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(error.to_string().contains("disk offline"));
    }
}
