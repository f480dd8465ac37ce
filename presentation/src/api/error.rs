//! API error type and its HTTP mapping

use super::response::ApiResponse;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use boardroom_application::{EscalationError, GovernanceError};
use thiserror::Error;
use tracing::error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("API request failed: {}", self);
        }
        (status, Json(ApiResponse::error(self.to_string()))).into_response()
    }
}

impl From<GovernanceError> for ApiError {
    fn from(err: GovernanceError) -> Self {
        match err {
            GovernanceError::NotFound(_) => ApiError::NotFound(err.to_string()),
            GovernanceError::AlreadyResolved(_) | GovernanceError::Contention(_) => {
                ApiError::Conflict(err.to_string())
            }
            GovernanceError::Escalation { .. } | GovernanceError::Store(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl From<EscalationError> for ApiError {
    fn from(err: EscalationError) -> Self {
        match err {
            EscalationError::NotFound(_) => ApiError::NotFound(err.to_string()),
            EscalationError::AlreadyResolved(_) => ApiError::Conflict(err.to_string()),
            EscalationError::EmptyReason => ApiError::BadRequest(err.to_string()),
            EscalationError::Persist(_) | EscalationError::Store(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
