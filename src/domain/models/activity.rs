use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Tenant-local audit record. Written explicitly by handlers at the point
/// of mutation; `user_id` points at the shared users table.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ActivityEntry {
    pub id: i64,
    pub user_id: i64,
    pub action: String,
    pub subject: String,
    pub created_at: DateTime<Utc>,
}
