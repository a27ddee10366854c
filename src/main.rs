mod api;
mod config;
mod error;
mod estimator;
mod storage;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::api::AppState;
use crate::config::Config;
use crate::estimator::ReferenceTables;
use crate::storage::postgres::Storage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = Config::from_env()?;

    let storage = Storage::new(&cfg.database_url, cfg.db_max_connections).await?;
    storage.run_migrations().await?;

    let state = AppState {
        storage,
        tables: Arc::new(ReferenceTables::builtin()),
    };

    api::serve(&cfg, state).await
}
