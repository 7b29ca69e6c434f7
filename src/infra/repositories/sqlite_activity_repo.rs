use crate::domain::{models::activity::ActivityEntry, ports::ActivityLogRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

pub struct SqliteActivityRepo {
    pool: SqlitePool,
}

impl SqliteActivityRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityLogRepository for SqliteActivityRepo {
    async fn append(&self, user_id: i64, action: &str, subject: &str) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO activity_logs (user_id, action, subject, created_at) VALUES (?, ?, ?, ?)"
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
            "SELECT * FROM activity_logs ORDER BY created_at DESC, id DESC LIMIT ?"
        )
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
