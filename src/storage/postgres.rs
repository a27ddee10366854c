use anyhow::Result;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::estimator::{PriceEstimate, PropertyDetails};
use crate::storage::models::{
    ComparableRecord, MarketTrendRecord, NewComparable, NewMarketTrend, NewTrainingData,
    PredictionRecord, TrainingDataRecord,
};

#[derive(Clone)]
pub struct Storage {
    pool: PgPool,
}

impl Storage {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub async fn create_prediction(&self, property: &PropertyDetails) -> Result<PredictionRecord> {
        let record = sqlx::query_as::<_, PredictionRecord>(
            r#"
            INSERT INTO predictions (
                id, city, locality, pincode, bhk, total_area, bathrooms,
                floor_number, total_floors, property_age, furnishing_status,
                parking, facing_direction, has_lift, has_security, has_power_backup
            )
            VALUES (
                $1,$2,$3,$4,$5,$6,$7,
                $8,$9,$10,$11,
                $12,$13,$14,$15,$16
            )
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&property.city)
        .bind(&property.locality)
        .bind(&property.pincode)
        .bind(property.bhk as i32)
        .bind(property.total_area)
        .bind(property.bathrooms as i32)
        .bind(property.floor_number.map(|v| v as i32))
        .bind(property.total_floors.map(|v| v as i32))
        .bind(property.property_age)
        .bind(&property.furnishing_status)
        .bind(property.parking)
        .bind(&property.facing_direction)
        .bind(property.has_lift)
        .bind(property.has_security)
        .bind(property.has_power_backup)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn update_prediction_estimate(
        &self,
        id: Uuid,
        estimate: &PriceEstimate,
    ) -> Result<Option<PredictionRecord>> {
        let record = sqlx::query_as::<_, PredictionRecord>(
            r#"
            UPDATE predictions SET
                predicted_min_price = $2,
                predicted_avg_price = $3,
                predicted_max_price = $4,
                predicted_fair_value = $5,
                price_per_sqft = $6,
                confidence_score = $7
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(estimate.predicted_min_price)
        .bind(estimate.predicted_avg_price)
        .bind(estimate.predicted_max_price)
        .bind(estimate.predicted_fair_value)
        .bind(estimate.price_per_sqft)
        .bind(estimate.confidence_score)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn get_prediction(&self, id: Uuid) -> Result<Option<PredictionRecord>> {
        let record =
            sqlx::query_as::<_, PredictionRecord>("SELECT * FROM predictions WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(record)
    }

    pub async fn list_predictions(&self) -> Result<Vec<PredictionRecord>> {
        let records = sqlx::query_as::<_, PredictionRecord>(
            "SELECT * FROM predictions ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    pub async fn comparables_for(
        &self,
        city: &str,
        locality: &str,
        bhk: u32,
        limit: i64,
    ) -> Result<Vec<ComparableRecord>> {
        let records = sqlx::query_as::<_, ComparableRecord>(
            r#"
            SELECT * FROM comparables
            WHERE city = $1 AND locality = $2 AND bhk = $3
            ORDER BY created_at DESC
            LIMIT $4
            "#,
        )
        .bind(city)
        .bind(locality)
        .bind(bhk as i32)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    pub async fn similar_comparables(
        &self,
        city: &str,
        bhk: u32,
        limit: i64,
    ) -> Result<Vec<ComparableRecord>> {
        let records = sqlx::query_as::<_, ComparableRecord>(
            r#"
            SELECT * FROM comparables
            WHERE city = $1 AND bhk = $2
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(city)
        .bind(bhk as i32)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    pub async fn create_comparable(&self, comparable: &NewComparable) -> Result<ComparableRecord> {
        let record = sqlx::query_as::<_, ComparableRecord>(
            r#"
            INSERT INTO comparables (
                id, city, locality, bhk, total_area, bathrooms,
                property_age, furnishing_status, price, price_per_sqft
            )
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&comparable.city)
        .bind(&comparable.locality)
        .bind(comparable.bhk as i32)
        .bind(comparable.total_area)
        .bind(comparable.bathrooms.map(|v| v as i32))
        .bind(comparable.property_age)
        .bind(&comparable.furnishing_status)
        .bind(comparable.price)
        .bind(comparable.price_per_sqft)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn market_trends(
        &self,
        city: &str,
        locality: Option<&str>,
    ) -> Result<Vec<MarketTrendRecord>> {
        let records = match locality {
            Some(locality) => {
                sqlx::query_as::<_, MarketTrendRecord>(
                    r#"
                    SELECT * FROM market_trends
                    WHERE city = $1 AND locality = $2
                    ORDER BY year ASC, created_at ASC
                    "#,
                )
                .bind(city)
                .bind(locality)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, MarketTrendRecord>(
                    r#"
                    SELECT * FROM market_trends
                    WHERE city = $1
                    ORDER BY year ASC, created_at ASC
                    "#,
                )
                .bind(city)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(records)
    }

    pub async fn create_market_trend(&self, trend: &NewMarketTrend) -> Result<MarketTrendRecord> {
        let record = sqlx::query_as::<_, MarketTrendRecord>(
            r#"
            INSERT INTO market_trends (
                id, city, locality, month, year,
                avg_price, avg_price_per_sqft, total_transactions
            )
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&trend.city)
        .bind(&trend.locality)
        .bind(&trend.month)
        .bind(trend.year)
        .bind(trend.avg_price)
        .bind(trend.avg_price_per_sqft)
        .bind(trend.total_transactions)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn list_training_data(&self) -> Result<Vec<TrainingDataRecord>> {
        let records = sqlx::query_as::<_, TrainingDataRecord>(
            "SELECT * FROM training_data ORDER BY upload_date DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    pub async fn create_training_data(
        &self,
        upload: &NewTrainingData,
    ) -> Result<TrainingDataRecord> {
        let record = sqlx::query_as::<_, TrainingDataRecord>(
            r#"
            INSERT INTO training_data (id, file_name, file_size, status, records_count)
            VALUES ($1,$2,$3,$4,$5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&upload.file_name)
        .bind(upload.file_size)
        .bind(upload.status.as_deref().unwrap_or("uploaded"))
        .bind(upload.records_count)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn update_training_status(
        &self,
        id: Uuid,
        status: &str,
    ) -> Result<Option<TrainingDataRecord>> {
        let record = sqlx::query_as::<_, TrainingDataRecord>(
            r#"
            UPDATE training_data SET status = $2
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }
}
