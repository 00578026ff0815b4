use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

/// Everything the transcript handler can fail with. Each variant maps to a
/// fixed status code and a fixed client-facing message; upstream detail
/// (response bodies, transport errors) goes to the logs, not the client.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("YouTube URL is required")]
    MissingUrl,

    #[error("Invalid YouTube URL")]
    InvalidUrl,

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Server Configuration Error: API Key missing.")]
    MissingApiKey,

    #[error("Upstream request failed: {status} {status_text}")]
    Upstream { status: u16, status_text: String },

    #[error("Upstream request timed out")]
    UpstreamTimeout,

    #[error("Upstream request failed")]
    Request(#[source] reqwest::Error),

    #[error("API returned unexpected data format. Check function logs.")]
    UnexpectedFormat,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingUrl | ApiError::InvalidUrl => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            ApiError::MissingApiKey
            | ApiError::Upstream { .. }
            | ApiError::Request(_)
            | ApiError::UnexpectedFormat => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
