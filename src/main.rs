mod config;
mod error;
mod models;
mod routes;
mod transcript;

use std::sync::Arc;

use config::Config;
use routes::{create_routes, AppState};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    if config.rapidapi_key.is_none() {
        tracing::warn!("RAPIDAPI_KEY is not set; transcript requests will fail");
    }

    let http = reqwest::Client::builder()
        .timeout(config.upstream_timeout)
        .build()
        .unwrap();
    let state = AppState {
        config: Arc::new(config),
        http,
    };

    let app = create_routes(state).layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    let addr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()
        .unwrap();
    tracing::info!("Listening on {}", addr);
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .unwrap();
}
