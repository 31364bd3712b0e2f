use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use livetools_core::errors::Error as CoreError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// A service call failed; `context` names the operation for the client.
    #[error("{context}: {source}")]
    Service {
        context: &'static str,
        #[source]
        source: CoreError,
    },
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

impl ApiError {
    /// `map_err` adapter tagging a core error with the failed operation.
    pub fn service(context: &'static str) -> impl FnOnce(CoreError) -> ApiError {
        move |source| ApiError::Service { context, source }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    message: String,
    timestamp: String,
}

fn core_status(e: &CoreError) -> StatusCode {
    if e.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            ApiError::Service { context, source } => {
                (core_status(source), context.to_string(), source.to_string())
            }
            ApiError::Core(e) => {
                let status = core_status(e);
                (status, status_label(status), e.to_string())
            }
            ApiError::BadRequest(reason) => (
                StatusCode::BAD_REQUEST,
                status_label(StatusCode::BAD_REQUEST),
                reason.clone(),
            ),
            ApiError::Internal(reason) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                status_label(StatusCode::INTERNAL_SERVER_ERROR),
                reason.clone(),
            ),
            ApiError::Anyhow(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                status_label(StatusCode::INTERNAL_SERVER_ERROR),
                e.to_string(),
            ),
        };
        if status.is_server_error() {
            tracing::error!("{}: {}", error, message);
        } else {
            tracing::debug!("{}: {}", error, message);
        }
        let body = Json(ErrorBody {
            error,
            message,
            timestamp: Utc::now().to_rfc3339(),
        });
        (status, body).into_response()
    }
}

fn status_label(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or("Error").to_string()
}

pub type ApiResult<T> = Result<T, ApiError>;
