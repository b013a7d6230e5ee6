//! HTTP error responses.
//!
//! Every failure leaves the server as a JSON body `{"code", "message"}` with
//! the status code of its [`ErrorCode`].

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use fincache::DataError;

/// Category of an API error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) enum ErrorCode {
    NotFound,
    InvalidArgument,
    AlreadyExists,
    UpstreamError,
    RateLimited,
    StoreUnavailable,
    InternalError,
}

impl ErrorCode {
    pub(crate) const fn status_code(self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InvalidArgument => StatusCode::BAD_REQUEST,
            Self::AlreadyExists => StatusCode::CONFLICT,
            Self::UpstreamError | Self::RateLimited => StatusCode::BAD_GATEWAY,
            Self::StoreUnavailable | Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error returned by request handlers.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ApiError {
    pub(crate) code: ErrorCode,
    pub(crate) message: String,
}

impl ApiError {
    pub(crate) fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub(crate) const fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }
}

impl From<DataError> for ApiError {
    fn from(err: DataError) -> Self {
        let code = match &err {
            DataError::NotFound(_) => ErrorCode::NotFound,
            DataError::InvalidArgument(_) => ErrorCode::InvalidArgument,
            DataError::AlreadyExists(_) => ErrorCode::AlreadyExists,
            DataError::Upstream(_) => ErrorCode::UpstreamError,
            DataError::RateLimited { .. } => ErrorCode::RateLimited,
            DataError::StoreUnavailable(_) => ErrorCode::StoreUnavailable,
            DataError::Parse(_) | DataError::Config(_) => ErrorCode::InternalError,
        };

        let status = code.status_code();
        if err.is_upstream() {
            tracing::warn!(status = status.as_u16(), error = %err, "Upstream request failed");
        } else if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %err, "Request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %err, "Request rejected");
        }

        Self::new(code, err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(ErrorCode::InvalidArgument, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(self)).into_response()
    }
}
