use std::sync::Arc;

use axum::{
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    extract::State,
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use bytes::Bytes;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::error::ApiError;
use crate::models::{TranscriptRequest, TranscriptResponse, TranscriptSegment};
use crate::transcript::{extract_video_id, fetch_transcript};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub http: reqwest::Client,
}

pub fn create_routes(state: AppState) -> Router {
    let cors = cors_layer(&state.config.allowed_origin);
    Router::new()
        .route("/", get(index))
        .route("/transcript", any(transcript))
        .layer(cors)
        .with_state(state)
}

// Cross-origin policy carried by every response, preflights included.
fn cors_layer(allowed_origin: &str) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::OPTIONS,
        Method::PATCH,
        Method::DELETE,
        Method::POST,
        Method::PUT,
    ];
    let headers = [
        HeaderName::from_static("x-csrf-token"),
        HeaderName::from_static("x-requested-with"),
        header::ACCEPT,
        HeaderName::from_static("accept-version"),
        header::CONTENT_LENGTH,
        HeaderName::from_static("content-md5"),
        header::CONTENT_TYPE,
        header::DATE,
        HeaderName::from_static("x-api-version"),
    ];

    if allowed_origin == "*" {
        // The CORS spec forbids credentials together with a wildcard origin.
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(headers);
    }

    match allowed_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_credentials(true)
            .allow_origin(origin)
            .allow_methods(methods)
            .allow_headers(headers),
        Err(_) => {
            tracing::warn!(allowed_origin, "invalid ALLOWED_ORIGIN, falling back to wildcard");
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(methods)
                .allow_headers(headers)
        }
    }
}

async fn index() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// Single endpoint, dispatched on the method by hand so the 405 carries the
// same JSON error shape as every other failure.
async fn transcript(State(state): State<AppState>, method: Method, body: Bytes) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    if method != Method::POST {
        return ApiError::MethodNotAllowed.into_response();
    }
    match handle_transcript(&state, &body).await {
        Ok(transcript) => Json(TranscriptResponse { transcript }).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn handle_transcript(
    state: &AppState,
    body: &[u8],
) -> Result<Vec<TranscriptSegment>, ApiError> {
    let request: TranscriptRequest =
        serde_json::from_slice(body).map_err(|_| ApiError::MissingUrl)?;
    let url = request.url.as_deref().map(str::trim).unwrap_or("");
    if url.is_empty() {
        return Err(ApiError::MissingUrl);
    }

    // Checked before any outbound work.
    let api_key = state.config.rapidapi_key.as_deref().ok_or_else(|| {
        tracing::error!("RAPIDAPI_KEY is not configured");
        ApiError::MissingApiKey
    })?;

    let video_id = extract_video_id(url).ok_or(ApiError::InvalidUrl)?;
    fetch_transcript(&state.http, &state.config.provider, api_key, &video_id, url).await
}
