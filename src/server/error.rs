//! HTTP error mapping.
//!
//! Every failure is answered with a fixed status and a `{"error": "..."}` body.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::AppError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::AlreadyExists(_) => Self::bad_request("User already exists"),
            AppError::InvalidCredentials => Self::bad_request("Invalid credentials"),
            AppError::InvalidToken => {
                Self::new(StatusCode::UNAUTHORIZED, "Invalid or expired token")
            }
            AppError::Unauthorized => Self::new(StatusCode::FORBIDDEN, "Unauthorized"),
            AppError::JobNotFound(_) => Self::new(StatusCode::NOT_FOUND, "Job not found"),
            AppError::AccountNotFound(_) => Self::new(StatusCode::NOT_FOUND, "Account not found"),
            AppError::InsufficientBalance { .. } => Self::bad_request("Insufficient balance"),
            AppError::InvalidAmount(msg) | AppError::InvalidInput(msg) => Self::bad_request(msg),
            AppError::Database(e) => {
                tracing::error!("internal error: {:#}", e);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}
