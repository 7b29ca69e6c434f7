use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Superadmin,
    Admin,
    Operator,
}

/// Everything a request handler may need to be allowed to do. Checked once
/// at handler entry via [`User::require`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    ManageTenants,
    ManageMembers,
    ManageAreas,
    ManageVehicles,
    RecordParking,
    ViewReports,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Superadmin => "superadmin",
            UserRole::Admin => "admin",
            UserRole::Operator => "operator",
        }
    }

    pub fn allows(self, permission: Permission) -> bool {
        use Permission::*;
        match self {
            // Superadmins administer the registry from the main domain only.
            UserRole::Superadmin => matches!(permission, ManageTenants),
            UserRole::Admin => !matches!(permission, ManageTenants),
            UserRole::Operator => matches!(permission, ManageVehicles | RecordParking),
        }
    }
}

impl TryFrom<String> for UserRole {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "superadmin" => Ok(UserRole::Superadmin),
            "admin" => Ok(UserRole::Admin),
            "operator" => Ok(UserRole::Operator),
            other => Err(AppError::InternalWithMsg(format!("Unknown role '{}'", other))),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct User {
    pub id: i64,
    /// None for superadmins, who belong to no tenant.
    pub tenant_id: Option<i64>,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn require(&self, permission: Permission) -> Result<(), AppError> {
        if self.role.allows(permission) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "Role '{}' may not perform this action",
                self.role.as_str()
            )))
        }
    }
}
