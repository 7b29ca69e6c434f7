use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleKind {
    Car,
    Motorcycle,
}

impl VehicleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleKind::Car => "car",
            VehicleKind::Motorcycle => "motorcycle",
        }
    }
}

impl TryFrom<String> for VehicleKind {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "car" => Ok(VehicleKind::Car),
            "motorcycle" => Ok(VehicleKind::Motorcycle),
            other => Err(AppError::InternalWithMsg(format!("Unknown vehicle kind '{}'", other))),
        }
    }
}

/// Globally registered vehicle. Lives in the shared database regardless of
/// which tenant is bound to the request.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Vehicle {
    pub id: i64,
    pub plate: String,
    #[sqlx(try_from = "String")]
    pub kind: VehicleKind,
    pub owner_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub fn normalize_plate(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ").to_ascii_uppercase()
}
