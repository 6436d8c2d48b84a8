use axum::{
    response::{IntoResponse, Response},
    Json,
};
use bookmarks_dal::bookmark::ValidationError;
use http::StatusCode;
use serde::Serialize;
use tracing::error;

pub type ApiResult<T, E = ApiError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    InvalidPayload(String),

    #[error("resource not found")]
    ResourceNotFound,

    #[error("Database error: {0}")]
    DalError(#[from] bookmarks_dal::Error),
}

impl From<garde::Report> for ApiError {
    fn from(report: garde::Report) -> Self {
        // Only the first failure goes back to the client
        let message = report
            .iter()
            .next()
            .map(|(_, e)| e.message().to_string())
            .unwrap_or_else(|| report.to_string());
        ApiError::InvalidPayload(message)
    }
}

#[derive(Serialize)]
struct ErrorMessage<'a> {
    message: &'a str,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: ErrorMessage<'a>,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound => StatusCode::NOT_FOUND,
            ApiError::DalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ApiError::DalError(e) = &self {
            error!("Request failed: {e}");
            return (status, "Internal server error").into_response();
        }
        let message = self.to_string();
        let body = ErrorBody {
            error: ErrorMessage { message: &message },
        };
        (status, Json(body)).into_response()
    }
}
