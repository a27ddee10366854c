use std::sync::Arc;

use axum::routing::{get, patch, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::Config;
use crate::estimator::ReferenceTables;
use crate::storage::postgres::Storage;

mod handlers;

#[derive(Clone)]
pub struct AppState {
    pub storage: Storage,
    pub tables: Arc<ReferenceTables>,
}

pub fn router(state: AppState) -> Router {
    // The browser front end is served from a different origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/api/predict", post(handlers::predict))
        .route(
            "/api/predictions",
            post(handlers::create_prediction).get(handlers::list_predictions),
        )
        .route("/api/predictions/:id", get(handlers::get_prediction))
        .route("/api/predictions/:id/report", get(handlers::prediction_report))
        .route(
            "/api/comparables",
            get(handlers::list_comparables).post(handlers::create_comparable),
        )
        .route(
            "/api/trends",
            get(handlers::list_market_trends).post(handlers::create_market_trend),
        )
        .route(
            "/api/training-data",
            get(handlers::list_training_data).post(handlers::create_training_data),
        )
        .route("/api/training-data/:id/status", patch(handlers::update_training_status))
        .layer(cors)
        .with_state(state)
}

pub async fn serve(cfg: &Config, state: AppState) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.bind_addr).await?;
    info!(addr = %cfg.bind_addr, "Listening");

    axum::serve(listener, router(state)).await?;
    Ok(())
}
