use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::dtos::{
    requests::{ListTenantsQuery, UpdateDbCredentialsRequest},
    responses::{ApprovalResponse, DeprovisionResponse},
};
use crate::api::extractors::{auth::AuthUser, tenant::MainDomain};
use crate::domain::models::tenant::{Tenant, TenantStatus};
use crate::domain::models::user::Permission;
use crate::error::AppError;
use crate::state::AppState;

async fn load_tenant(state: &AppState, id: i64) -> Result<Tenant, AppError> {
    state
        .tenant_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Tenant {} not found", id)))
}

pub async fn list_tenants(
    State(state): State<Arc<AppState>>,
    MainDomain: MainDomain,
    user: AuthUser,
    Query(query): Query<ListTenantsQuery>,
) -> Result<impl IntoResponse, AppError> {
    user.0.require(Permission::ManageTenants)?;

    let status = match query.status {
        Some(raw) => Some(
            TenantStatus::try_from(raw.clone())
                .map_err(|_| AppError::Validation(format!("Unknown status '{}'", raw)))?,
        ),
        None => None,
    };

    let tenants = state.tenant_repo.list(status).await?;
    Ok(Json(tenants))
}

/// Approval is the provisioning trigger: the tenant becomes routable and
/// its isolated store is created and migrated. A provisioning failure is
/// reported in the response but does not revert the approval; the repair
/// worker retries until the store exists.
pub async fn approve_tenant(
    State(state): State<Arc<AppState>>,
    MainDomain: MainDomain,
    user: AuthUser,
    Path(tenant_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    user.0.require(Permission::ManageTenants)?;

    let tenant = load_tenant(&state, tenant_id).await?;
    if tenant.status != TenantStatus::Pending {
        return Err(AppError::Conflict(format!(
            "Tenant is already {}",
            tenant.status.as_str()
        )));
    }

    let mut tenant = state.tenant_repo.approve(tenant_id, user.0.id).await?;
    info!(slug = %tenant.slug, approver = user.0.id, "Tenant approved");

    let provisioned = state.provisioner.provision(&tenant).await;
    if provisioned {
        state.tenant_repo.mark_provisioned(tenant_id).await?;
        tenant = load_tenant(&state, tenant_id).await?;
    }

    Ok(Json(ApprovalResponse { tenant, provisioned }))
}

pub async fn reject_tenant(
    State(state): State<Arc<AppState>>,
    MainDomain: MainDomain,
    user: AuthUser,
    Path(tenant_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    user.0.require(Permission::ManageTenants)?;

    let tenant = load_tenant(&state, tenant_id).await?;
    if tenant.status != TenantStatus::Pending {
        return Err(AppError::Conflict(format!(
            "Tenant is already {}",
            tenant.status.as_str()
        )));
    }

    let tenant = state.tenant_repo.reject(tenant_id, user.0.id).await?;
    info!(slug = %tenant.slug, rejecter = user.0.id, "Tenant rejected");
    Ok(Json(tenant))
}

async fn toggle_active(
    state: Arc<AppState>,
    user: AuthUser,
    tenant_id: i64,
    active: bool,
) -> Result<Json<Tenant>, AppError> {
    user.0.require(Permission::ManageTenants)?;

    let tenant = load_tenant(&state, tenant_id).await?;
    if tenant.status != TenantStatus::Approved {
        return Err(AppError::Conflict("Only approved tenants can be toggled".into()));
    }

    let tenant = state.tenant_repo.set_active(tenant_id, active).await?;
    info!(slug = %tenant.slug, active, "Tenant activation toggled");
    Ok(Json(tenant))
}

pub async fn activate_tenant(
    State(state): State<Arc<AppState>>,
    MainDomain: MainDomain,
    user: AuthUser,
    Path(tenant_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    toggle_active(state, user, tenant_id, true).await
}

pub async fn deactivate_tenant(
    State(state): State<Arc<AppState>>,
    MainDomain: MainDomain,
    user: AuthUser,
    Path(tenant_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    toggle_active(state, user, tenant_id, false).await
}

pub async fn update_db_credentials(
    State(state): State<Arc<AppState>>,
    MainDomain: MainDomain,
    user: AuthUser,
    Path(tenant_id): Path<i64>,
    Json(payload): Json<UpdateDbCredentialsRequest>,
) -> Result<impl IntoResponse, AppError> {
    user.0.require(Permission::ManageTenants)?;

    let tenant = load_tenant(&state, tenant_id).await?;

    let encrypted_password = match payload.db_password {
        Some(password) if !password.is_empty() => Some(state.secrets.encrypt(&password)?),
        _ => None,
    };

    let updated = state
        .tenant_repo
        .update_db_credentials(tenant_id, payload.db_username, encrypted_password)
        .await?;

    // Cached connections still hold the old credentials.
    state.pools.evict(&tenant.database_name).await;

    info!(slug = %updated.slug, "Tenant database credentials updated");
    Ok(Json(updated))
}

/// Destructive: drops the tenant's isolated store. The registry row is
/// left untouched.
pub async fn deprovision_tenant(
    State(state): State<Arc<AppState>>,
    MainDomain: MainDomain,
    user: AuthUser,
    Path(tenant_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    user.0.require(Permission::ManageTenants)?;

    let tenant = load_tenant(&state, tenant_id).await?;

    warn!(slug = %tenant.slug, operator = user.0.id, "Deprovision requested");

    state.pools.evict(&tenant.database_name).await;
    let dropped = state.provisioner.deprovision(&tenant).await;

    Ok(Json(DeprovisionResponse { dropped }))
}
