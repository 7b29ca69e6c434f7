use crate::domain::models::{
    activity::ActivityEntry,
    auth::RefreshTokenRecord,
    parking::{ParkingArea, ParkingTransaction, RevenueDay},
    tenant::{NewTenant, Tenant, TenantStatus},
    user::{User, UserRole},
    vehicle::{Vehicle, VehicleKind},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

#[async_trait]
pub trait TenantRepository: Send + Sync {
    /// Creates the owning user and the tenant row in one transaction:
    /// either both exist afterwards or neither does.
    async fn create_with_owner(
        &self,
        tenant: &NewTenant,
        owner_username: &str,
        owner_password_hash: &str,
    ) -> Result<(Tenant, User), AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Tenant>, AppError>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tenant>, AppError>;
    /// Exact slug match restricted to `approved AND is_active`, the single
    /// indexed lookup request routing performs.
    async fn find_routable_by_slug(&self, slug: &str) -> Result<Option<Tenant>, AppError>;
    async fn list(&self, status: Option<TenantStatus>) -> Result<Vec<Tenant>, AppError>;
    async fn approve(&self, id: i64, approver_id: i64) -> Result<Tenant, AppError>;
    async fn reject(&self, id: i64, rejecter_id: i64) -> Result<Tenant, AppError>;
    async fn set_active(&self, id: i64, active: bool) -> Result<Tenant, AppError>;
    async fn mark_provisioned(&self, id: i64) -> Result<(), AppError>;
    async fn update_db_credentials(
        &self,
        id: i64,
        username: Option<String>,
        encrypted_password: Option<String>,
    ) -> Result<Tenant, AppError>;
    /// Approved tenants whose store was never initialized; the repair
    /// worker retries these.
    async fn list_unprovisioned(&self) -> Result<Vec<Tenant>, AppError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(
        &self,
        tenant_id: Option<i64>,
        username: &str,
        password_hash: &str,
        role: UserRole,
    ) -> Result<User, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;
    async fn list_by_tenant(&self, tenant_id: i64) -> Result<Vec<User>, AppError>;
    async fn delete(&self, tenant_id: i64, id: i64) -> Result<(), AppError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;
    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError>;
    async fn delete_refresh_token(&self, token_hash: &str) -> Result<(), AppError>;
    async fn delete_refresh_family(&self, family_id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn create(
        &self,
        plate: &str,
        kind: VehicleKind,
        owner_name: Option<String>,
    ) -> Result<Vehicle, AppError>;
    async fn find_by_plate(&self, plate: &str) -> Result<Option<Vehicle>, AppError>;
    async fn list(&self) -> Result<Vec<Vehicle>, AppError>;
}

/// Tenant-scoped: implementations are constructed per request over the
/// bound tenant's connection handle.
#[async_trait]
pub trait AreaRepository: Send + Sync {
    async fn create(
        &self,
        name: &str,
        capacity: i32,
        car_rate: i64,
        motorcycle_rate: i64,
    ) -> Result<ParkingArea, AppError>;
    /// Soft-deleted areas resolve as absent.
    async fn find_by_id(&self, id: i64) -> Result<Option<ParkingArea>, AppError>;
    async fn list(&self) -> Result<Vec<ParkingArea>, AppError>;
    async fn update(&self, area: &ParkingArea) -> Result<ParkingArea, AppError>;
    async fn soft_delete(&self, id: i64) -> Result<(), AppError>;
}

#[async_trait]
pub trait ParkingRepository: Send + Sync {
    #[allow(clippy::too_many_arguments)]
    async fn check_in(
        &self,
        area_id: i64,
        vehicle_id: i64,
        plate: &str,
        kind: VehicleKind,
        operator_id: i64,
        entered_at: DateTime<Utc>,
    ) -> Result<ParkingTransaction, AppError>;
    async fn find_by_id(&self, area_id: i64, id: i64) -> Result<Option<ParkingTransaction>, AppError>;
    async fn find_open_by_plate(&self, plate: &str) -> Result<Option<ParkingTransaction>, AppError>;
    async fn count_open(&self, area_id: i64) -> Result<i64, AppError>;
    async fn close(
        &self,
        id: i64,
        exited_at: DateTime<Utc>,
        fee: i64,
    ) -> Result<ParkingTransaction, AppError>;
    async fn list_by_area(&self, area_id: i64, open_only: bool) -> Result<Vec<ParkingTransaction>, AppError>;
    async fn revenue_by_day(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<RevenueDay>, AppError>;
}

#[async_trait]
pub trait ActivityLogRepository: Send + Sync {
    async fn append(&self, user_id: i64, action: &str, subject: &str) -> Result<(), AppError>;
    async fn list(&self, limit: i64) -> Result<Vec<ActivityEntry>, AppError>;
}

/// One-time creation and schema initialization of a tenant's isolated
/// store. Failures are logged and reported as `false`, never raised.
#[async_trait]
pub trait TenantProvisioner: Send + Sync {
    async fn provision(&self, tenant: &Tenant) -> bool;
    /// Destructive: drops the tenant's store outright.
    async fn deprovision(&self, tenant: &Tenant) -> bool;
}
