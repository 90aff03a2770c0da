use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use app_core::auth::AuthError;
use app_core::store::StoreError;
use app_core::submit::SubmitError;

/// Every failure a route can produce, mapped to a status code and a
/// human-readable message. No error propagates uncaught past a handler.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    Store(StoreError),
    Internal(eyre::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Store(err) => match err {
                StoreError::PermissionDenied => StatusCode::FORBIDDEN,
                StoreError::Unauthenticated => StatusCode::UNAUTHORIZED,
                StoreError::QuotaExceeded => StatusCode::TOO_MANY_REQUESTS,
                StoreError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
                StoreError::Network(_) => StatusCode::BAD_GATEWAY,
                StoreError::Other { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::BadRequest(message) => message.clone(),
            ApiError::Unauthorized(message) => message.clone(),
            ApiError::Store(err) => err.user_message(),
            ApiError::Internal(err) => format!("Server error: {}", err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.message(), %status, "request failed");
        }
        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}

impl From<SubmitError> for ApiError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Draft(err) => ApiError::BadRequest(err.to_string()),
            SubmitError::Image(err) => ApiError::BadRequest(err.to_string()),
            SubmitError::NotSignedIn => {
                ApiError::Unauthorized("you must be signed in to save an entry".to_owned())
            }
            SubmitError::Store(err) => ApiError::Store(err),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Internal(err.into())
    }
}

impl From<eyre::Error> for ApiError {
    fn from(err: eyre::Error) -> Self {
        ApiError::Internal(err)
    }
}
