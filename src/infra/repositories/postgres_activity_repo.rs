use crate::domain::{models::activity::ActivityEntry, ports::ActivityLogRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

pub struct PostgresActivityRepo {
    pool: PgPool,
}

impl PostgresActivityRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityLogRepository for PostgresActivityRepo {
    async fn append(&self, user_id: i64, action: &str, subject: &str) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO activity_logs (user_id, action, subject, created_at) VALUES ($1, $2, $3, $4)"
        )
            .bind(user_id)
            .bind(action)
            .bind(subject)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn list(&self, limit: i64) -> Result<Vec<ActivityEntry>, AppError> {
        sqlx::query_as::<_, ActivityEntry>(
            "SELECT * FROM activity_logs ORDER BY created_at DESC, id DESC LIMIT $1"
        )
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
