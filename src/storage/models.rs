use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A stored submission together with its estimate, once computed.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PredictionRecord {
    pub id: Uuid,
    pub city: String,
    pub locality: String,
    pub pincode: Option<String>,
    pub bhk: i32,
    pub total_area: f64,
    pub bathrooms: i32,
    pub floor_number: Option<i32>,
    pub total_floors: Option<i32>,
    pub property_age: Option<f64>,
    pub furnishing_status: String,
    pub parking: bool,
    pub facing_direction: Option<String>,
    pub has_lift: bool,
    pub has_security: bool,
    pub has_power_backup: bool,
    pub predicted_min_price: Option<i64>,
    pub predicted_avg_price: Option<i64>,
    pub predicted_max_price: Option<i64>,
    pub predicted_fair_value: Option<i64>,
    pub price_per_sqft: Option<i64>,
    pub confidence_score: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// A listing used as a point of comparison on the results view.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ComparableRecord {
    pub id: Uuid,
    pub city: String,
    pub locality: String,
    pub bhk: i32,
    pub total_area: f64,
    pub bathrooms: Option<i32>,
    pub property_age: Option<f64>,
    pub furnishing_status: Option<String>,
    pub price: i64,
    pub price_per_sqft: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewComparable {
    pub city: String,
    pub locality: String,
    pub bhk: u32,
    pub total_area: f64,
    pub bathrooms: Option<u32>,
    pub property_age: Option<f64>,
    pub furnishing_status: Option<String>,
    pub price: i64,
    pub price_per_sqft: Option<i64>,
}

/// Monthly average price for a city, optionally scoped to a locality.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MarketTrendRecord {
    pub id: Uuid,
    pub city: String,
    pub locality: Option<String>,
    pub month: String,
    pub year: i32,
    pub avg_price: i64,
    pub avg_price_per_sqft: Option<i64>,
    pub total_transactions: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMarketTrend {
    pub city: String,
    pub locality: Option<String>,
    pub month: String,
    pub year: i32,
    pub avg_price: i64,
    pub avg_price_per_sqft: Option<i64>,
    pub total_transactions: Option<i32>,
}

/// Metadata for an uploaded reference-data file. Only the metadata is
/// tracked; the service does no parsing or model training with the upload.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TrainingDataRecord {
    pub id: Uuid,
    pub file_name: String,
    pub file_size: Option<i64>,
    pub status: String,
    pub records_count: Option<i32>,
    pub upload_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTrainingData {
    pub file_name: String,
    pub file_size: Option<i64>,
    pub status: Option<String>,
    pub records_count: Option<i32>,
}
