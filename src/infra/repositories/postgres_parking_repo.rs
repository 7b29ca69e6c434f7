use crate::domain::{
    models::parking::{ParkingTransaction, RevenueDay},
    models::vehicle::VehicleKind,
    ports::ParkingRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

pub struct PostgresParkingRepo {
    pool: PgPool,
}

impl PostgresParkingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParkingRepository for PostgresParkingRepo {
    async fn check_in(
        &self,
        area_id: i64,
        vehicle_id: i64,
        plate: &str,
        kind: VehicleKind,
        operator_id: i64,
        entered_at: DateTime<Utc>,
    ) -> Result<ParkingTransaction, AppError> {
        sqlx::query_as::<_, ParkingTransaction>(
            "INSERT INTO parking_transactions (area_id, vehicle_id, plate, vehicle_kind, entered_at, operator_id) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *"
        )
            .bind(area_id)
            .bind(vehicle_id)
            .bind(plate)
            .bind(kind.as_str())
            .bind(entered_at)
            .bind(operator_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, area_id: i64, id: i64) -> Result<Option<ParkingTransaction>, AppError> {
        sqlx::query_as::<_, ParkingTransaction>(
            "SELECT * FROM parking_transactions WHERE id = $1 AND area_id = $2"
        )
            .bind(id)
            .bind(area_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_open_by_plate(&self, plate: &str) -> Result<Option<ParkingTransaction>, AppError> {
        sqlx::query_as::<_, ParkingTransaction>(
            "SELECT * FROM parking_transactions WHERE plate = $1 AND exited_at IS NULL"
        )
            .bind(plate)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_open(&self, area_id: i64) -> Result<i64, AppError> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM parking_transactions WHERE area_id = $1 AND exited_at IS NULL"
        )
            .bind(area_id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn close(
        &self,
        id: i64,
        exited_at: DateTime<Utc>,
        fee: i64,
    ) -> Result<ParkingTransaction, AppError> {
        sqlx::query_as::<_, ParkingTransaction>(
            "UPDATE parking_transactions SET exited_at = $1, fee = $2 WHERE id = $3 RETURNING *"
        )
            .bind(exited_at)
            .bind(fee)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_area(&self, area_id: i64, open_only: bool) -> Result<Vec<ParkingTransaction>, AppError> {
        let sql = if open_only {
            "SELECT * FROM parking_transactions WHERE area_id = $1 AND exited_at IS NULL ORDER BY entered_at DESC"
        } else {
            "SELECT * FROM parking_transactions WHERE area_id = $1 ORDER BY entered_at DESC"
        };
        sqlx::query_as::<_, ParkingTransaction>(sql)
            .bind(area_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn revenue_by_day(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<RevenueDay>, AppError> {
        sqlx::query_as::<_, RevenueDay>(
            "SELECT (exited_at AT TIME ZONE 'UTC')::date AS day, \
                    COUNT(*) AS transactions, \
                    COALESCE(SUM(fee), 0)::BIGINT AS revenue \
             FROM parking_transactions \
             WHERE exited_at IS NOT NULL \
               AND (exited_at AT TIME ZONE 'UTC')::date BETWEEN $1 AND $2 \
             GROUP BY day ORDER BY day"
        )
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
