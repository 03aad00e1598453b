//! Airline sentiment dashboard server
//!
//! Serves the rendered dashboard page and a JSON API over a dataset that is
//! loaded once and shared read-only by every handler.

pub mod api;
pub mod summary;

use airsent_common::DashboardConfig;
use airsent_query::Dataset;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub config: Arc<DashboardConfig>,
}

impl AppState {
    pub fn new(dataset: Dataset, config: DashboardConfig) -> Self {
        Self {
            dataset: Arc::new(dataset),
            config: Arc::new(config),
        }
    }
}

/// Build the dashboard router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::index))
        .route("/api/health", get(api::health_check))
        .route("/api/sentiments", get(api::sentiment_counts))
        .route("/api/publishers", get(api::publisher_counts))
        .route("/api/sample", get(api::random_sample))
        .route("/api/geo", get(api::geo))
        .route("/api/breakdown", get(api::breakdown))
        .route("/api/words", get(api::words))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
