use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::models::parking::RevenueDay;
use crate::domain::models::tenant::{Tenant, TenantStatus};

#[derive(Serialize)]
pub struct SignupResponse {
    pub tenant_id: i64,
    pub slug: String,
    pub domain: String,
    pub status: TenantStatus,
}

#[derive(Serialize)]
pub struct ApprovalResponse {
    pub tenant: Tenant,
    /// False when store creation or schema migration failed; the tenant
    /// stays approved and the repair worker retries.
    pub provisioned: bool,
}

#[derive(Serialize)]
pub struct DeprovisionResponse {
    pub dropped: bool,
}

#[derive(Serialize)]
pub struct RevenueResponse {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub days: Vec<RevenueDay>,
    pub total_transactions: i64,
    pub total_revenue: i64,
}
