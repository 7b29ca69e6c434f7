use crate::domain::{models::parking::ParkingArea, ports::AreaRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

pub struct PostgresAreaRepo {
    pool: PgPool,
}

impl PostgresAreaRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AreaRepository for PostgresAreaRepo {
    async fn create(
        &self,
        name: &str,
        capacity: i32,
        car_rate: i64,
        motorcycle_rate: i64,
    ) -> Result<ParkingArea, AppError> {
        sqlx::query_as::<_, ParkingArea>(
            "INSERT INTO areas (name, capacity, car_rate, motorcycle_rate, created_at) VALUES ($1, $2, $3, $4, $5) RETURNING *"
        )
            .bind(name)
            .bind(capacity)
            .bind(car_rate)
            .bind(motorcycle_rate)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ParkingArea>, AppError> {
        sqlx::query_as::<_, ParkingArea>(
            "SELECT * FROM areas WHERE id = $1 AND deleted_at IS NULL"
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<ParkingArea>, AppError> {
        sqlx::query_as::<_, ParkingArea>(
            "SELECT * FROM areas WHERE deleted_at IS NULL ORDER BY id"
        )
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, area: &ParkingArea) -> Result<ParkingArea, AppError> {
        sqlx::query_as::<_, ParkingArea>(
            "UPDATE areas SET name = $1, capacity = $2, car_rate = $3, motorcycle_rate = $4 WHERE id = $5 AND deleted_at IS NULL RETURNING *"
        )
            .bind(&area.name)
            .bind(area.capacity)
            .bind(area.car_rate)
            .bind(area.motorcycle_rate)
            .bind(area.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn soft_delete(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("UPDATE areas SET deleted_at = $1 WHERE id = $2 AND deleted_at IS NULL")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }
}
