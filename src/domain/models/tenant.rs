use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::error::AppError;

/// Slugs that would collide with service hostnames.
const RESERVED_SLUGS: &[&str] = &["www", "api", "admin", "app", "mail"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenantStatus {
    Pending,
    Approved,
    Rejected,
}

impl TenantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TenantStatus::Pending => "pending",
            TenantStatus::Approved => "approved",
            TenantStatus::Rejected => "rejected",
        }
    }
}

impl TryFrom<String> for TenantStatus {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "pending" => Ok(TenantStatus::Pending),
            "approved" => Ok(TenantStatus::Approved),
            "rejected" => Ok(TenantStatus::Rejected),
            other => Err(AppError::InternalWithMsg(format!("Unknown tenant status '{}'", other))),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Tenant {
    pub id: i64,
    pub name: String,
    pub institution_name: String,
    pub institution_address: Option<String>,
    pub slug: String,
    pub domain: String,
    pub database_name: String,
    pub db_host: Option<String>,
    pub db_port: Option<i32>,
    pub db_username: Option<String>,
    #[serde(skip_serializing)]
    pub db_password: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: TenantStatus,
    pub is_active: bool,
    pub owner_user_id: i64,
    pub requested_by: i64,
    pub approved_by: Option<i64>,
    pub rejected_by: Option<i64>,
    pub requested_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub provisioned_at: Option<DateTime<Utc>>,
}

impl Tenant {
    /// A tenant is reachable for request routing only while approved and active.
    pub fn is_routable(&self) -> bool {
        self.status == TenantStatus::Approved && self.is_active
    }
}

/// Registration data for a tenant that does not exist yet. `domain` and
/// `database_name` are derived once here and never recomputed.
#[derive(Debug, Clone)]
pub struct NewTenant {
    pub name: String,
    pub institution_name: String,
    pub institution_address: Option<String>,
    pub slug: String,
    pub domain: String,
    pub database_name: String,
    pub requested_at: DateTime<Utc>,
}

impl NewTenant {
    pub fn new(
        name: String,
        institution_name: String,
        institution_address: Option<String>,
        slug: String,
        domain_suffix: &str,
        db_name_prefix: &str,
    ) -> Result<Self, AppError> {
        validate_slug(&slug)?;
        Ok(Self {
            domain: derive_domain(&slug, domain_suffix),
            database_name: derive_database_name(&slug, db_name_prefix),
            name,
            institution_name,
            institution_address,
            slug,
            requested_at: Utc::now(),
        })
    }
}

pub fn derive_domain(slug: &str, suffix: &str) -> String {
    format!("{}{}", slug, suffix)
}

/// Hyphens are legal in slugs but awkward in database identifiers.
pub fn derive_database_name(slug: &str, prefix: &str) -> String {
    format!("{}{}", prefix, slug.replace('-', "_"))
}

pub fn validate_slug(slug: &str) -> Result<(), AppError> {
    if slug.is_empty() || slug.len() > 63 {
        return Err(AppError::Validation("Slug must be 1-63 characters".into()));
    }
    if !slug.starts_with(|c: char| c.is_ascii_lowercase() || c.is_ascii_digit()) {
        return Err(AppError::Validation("Slug must start with a letter or digit".into()));
    }
    if !slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
        return Err(AppError::Validation(
            "Slug may only contain lowercase letters, digits and hyphens".into(),
        ));
    }
    if RESERVED_SLUGS.contains(&slug) {
        return Err(AppError::Validation(format!("Slug '{}' is reserved", slug)));
    }
    Ok(())
}
