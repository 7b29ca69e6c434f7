use crate::domain::{models::vehicle::{Vehicle, VehicleKind}, ports::VehicleRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

pub struct SqliteVehicleRepo {
    pool: SqlitePool,
}

impl SqliteVehicleRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VehicleRepository for SqliteVehicleRepo {
    async fn create(
        &self,
        plate: &str,
        kind: VehicleKind,
        owner_name: Option<String>,
    ) -> Result<Vehicle, AppError> {
        sqlx::query_as::<_, Vehicle>(
            "INSERT INTO vehicles (plate, kind, owner_name, created_at) VALUES (?, ?, ?, ?) RETURNING *"
        )
            .bind(plate)
            .bind(kind.as_str())
            .bind(owner_name)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_plate(&self, plate: &str) -> Result<Option<Vehicle>, AppError> {
        sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE plate = ?")
            .bind(plate)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Vehicle>, AppError> {
        sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles ORDER BY plate")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
