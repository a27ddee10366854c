use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::api::AppState;
use crate::error::ApiError;
use crate::estimator::{self, PredictionRequest, PropertyDetails};
use crate::storage::models::{
    ComparableRecord, MarketTrendRecord, NewComparable, NewMarketTrend, NewTrainingData,
    PredictionRecord, TrainingDataRecord,
};

/// Number of comparable listings returned when the caller does not ask for
/// a specific amount.
const DEFAULT_COMPARABLE_LIMIT: i64 = 5;

pub async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Stateless estimation: validates, computes, and answers without touching
/// storage.
pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictionRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut rng = ChaCha8Rng::from_entropy();
    let estimate = estimator::estimate(&request, &state.tables, &mut rng)?;

    Ok(Json(json!({ "success": true, "data": estimate })))
}

/// Creates a submission, computes its estimate, and persists both in one
/// request.
pub async fn create_prediction(
    State(state): State<AppState>,
    Json(request): Json<PredictionRequest>,
) -> Result<(StatusCode, Json<PredictionRecord>), ApiError> {
    let property = PropertyDetails::from_request(&request)?;

    let mut rng = ChaCha8Rng::from_entropy();
    let estimate = estimator::estimate_property(&property, &state.tables, &mut rng);

    let record = state.storage.create_prediction(&property).await?;
    let record = state
        .storage
        .update_prediction_estimate(record.id, &estimate)
        .await?
        .ok_or_else(|| {
            ApiError::Internal(anyhow::anyhow!("prediction row missing after insert"))
        })?;

    info!(id = %record.id, city = %record.city, "Prediction stored");
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn list_predictions(
    State(state): State<AppState>,
) -> Result<Json<Vec<PredictionRecord>>, ApiError> {
    let records = state.storage.list_predictions().await?;
    Ok(Json(records))
}

pub async fn get_prediction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PredictionRecord>, ApiError> {
    let record = state
        .storage
        .get_prediction(id)
        .await?
        .ok_or(ApiError::NotFound("prediction"))?;

    Ok(Json(record))
}

/// The results view in one payload: the prediction, comparable listings
/// (exact locality first, falling back to same-city/same-bhk), and the
/// market trends for its city and locality.
pub async fn prediction_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let prediction = state
        .storage
        .get_prediction(id)
        .await?
        .ok_or(ApiError::NotFound("prediction"))?;

    let mut comparables = state
        .storage
        .comparables_for(
            &prediction.city,
            &prediction.locality,
            prediction.bhk as u32,
            DEFAULT_COMPARABLE_LIMIT,
        )
        .await?;
    if comparables.is_empty() {
        comparables = state
            .storage
            .similar_comparables(&prediction.city, prediction.bhk as u32, DEFAULT_COMPARABLE_LIMIT)
            .await?;
    }

    let trends = state
        .storage
        .market_trends(&prediction.city, Some(&prediction.locality))
        .await?;

    Ok(Json(json!({
        "prediction": prediction,
        "comparables": comparables,
        "market_trends": trends,
    })))
}

#[derive(Debug, Deserialize)]
pub struct ComparablesQuery {
    pub city: String,
    pub locality: Option<String>,
    pub bhk: u32,
    pub limit: Option<i64>,
}

pub async fn list_comparables(
    State(state): State<AppState>,
    Query(query): Query<ComparablesQuery>,
) -> Result<Json<Vec<ComparableRecord>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_COMPARABLE_LIMIT);

    let records = match query.locality.as_deref() {
        Some(locality) => {
            state
                .storage
                .comparables_for(&query.city, locality, query.bhk, limit)
                .await?
        }
        None => state.storage.similar_comparables(&query.city, query.bhk, limit).await?,
    };

    Ok(Json(records))
}

pub async fn create_comparable(
    State(state): State<AppState>,
    Json(comparable): Json<NewComparable>,
) -> Result<(StatusCode, Json<ComparableRecord>), ApiError> {
    let record = state.storage.create_comparable(&comparable).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[derive(Debug, Deserialize)]
pub struct TrendsQuery {
    pub city: String,
    pub locality: Option<String>,
}

pub async fn list_market_trends(
    State(state): State<AppState>,
    Query(query): Query<TrendsQuery>,
) -> Result<Json<Vec<MarketTrendRecord>>, ApiError> {
    let records = state
        .storage
        .market_trends(&query.city, query.locality.as_deref())
        .await?;

    Ok(Json(records))
}

pub async fn create_market_trend(
    State(state): State<AppState>,
    Json(trend): Json<NewMarketTrend>,
) -> Result<(StatusCode, Json<MarketTrendRecord>), ApiError> {
    let record = state.storage.create_market_trend(&trend).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn list_training_data(
    State(state): State<AppState>,
) -> Result<Json<Vec<TrainingDataRecord>>, ApiError> {
    let records = state.storage.list_training_data().await?;
    Ok(Json(records))
}

pub async fn create_training_data(
    State(state): State<AppState>,
    Json(upload): Json<NewTrainingData>,
) -> Result<(StatusCode, Json<TrainingDataRecord>), ApiError> {
    let record = state.storage.create_training_data(&upload).await?;
    info!(id = %record.id, file = %record.file_name, "Training data registered");
    Ok((StatusCode::CREATED, Json(record)))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

pub async fn update_training_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<TrainingDataRecord>, ApiError> {
    let record = state
        .storage
        .update_training_status(id, &update.status)
        .await?
        .ok_or(ApiError::NotFound("training data"))?;

    Ok(Json(record))
}
