use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;
use argon2::{password_hash::SaltString, Argon2, PasswordHasher};
use tracing::info;

use crate::api::dtos::{requests::SignupRequest, responses::SignupResponse};
use crate::api::extractors::tenant::MainDomain;
use crate::domain::models::tenant::NewTenant;
use crate::error::AppError;
use crate::state::AppState;

/// Public institution signup on the main domain. Creates the owning admin
/// account and the pending tenant row in one transaction; an administrator
/// approves (and thereby provisions) the tenant later.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    MainDomain: MainDomain,
    Json(payload): Json<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let username = payload.username.trim().to_string();
    if username.len() < 3 {
        return Err(AppError::Validation("Username must be at least 3 characters".into()));
    }
    if payload.password.len() < 8 {
        return Err(AppError::Validation("Password must be at least 8 characters".into()));
    }

    let new_tenant = NewTenant::new(
        payload.name,
        payload.institution_name,
        payload.institution_address,
        payload.slug.trim().to_ascii_lowercase(),
        &state.config.domain_suffix,
        &state.config.db_name_prefix,
    )?;

    let salt = SaltString::generate(&mut rand::thread_rng());
    let password_hash = Argon2::default()
        .hash_password(payload.password.as_bytes(), &salt)
        .map_err(|_| AppError::Internal)?
        .to_string();

    let (tenant, _owner) = state
        .tenant_repo
        .create_with_owner(&new_tenant, &username, &password_hash)
        .await?;

    info!(slug = %tenant.slug, "Tenant signup received, awaiting approval");

    Ok(Json(SignupResponse {
        tenant_id: tenant.id,
        slug: tenant.slug,
        domain: tenant.domain,
        status: tenant.status,
    }))
}
