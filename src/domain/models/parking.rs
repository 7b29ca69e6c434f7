use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

use crate::domain::models::vehicle::VehicleKind;

/// A parking area inside one institution. Tenant-scoped: rows live in the
/// tenant's own database.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ParkingArea {
    pub id: i64,
    pub name: String,
    pub capacity: i32,
    /// Rate per started hour, minor currency units.
    pub car_rate: i64,
    pub motorcycle_rate: i64,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl ParkingArea {
    pub fn rate_for(&self, kind: VehicleKind) -> i64 {
        match kind {
            VehicleKind::Car => self.car_rate,
            VehicleKind::Motorcycle => self.motorcycle_rate,
        }
    }
}

/// One row of the revenue dashboard: collected fees per calendar day.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct RevenueDay {
    pub day: NaiveDate,
    pub transactions: i64,
    pub revenue: i64,
}

/// One vehicle's stay in an area. Open while `exited_at` is NULL.
/// `vehicle_id` and `operator_id` point at shared-database rows.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ParkingTransaction {
    pub id: i64,
    pub area_id: i64,
    pub vehicle_id: i64,
    pub plate: String,
    #[sqlx(try_from = "String")]
    pub vehicle_kind: VehicleKind,
    pub entered_at: DateTime<Utc>,
    pub exited_at: Option<DateTime<Utc>>,
    pub fee: Option<i64>,
    pub operator_id: i64,
}
