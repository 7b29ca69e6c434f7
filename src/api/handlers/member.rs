use axum::{extract::{State, Path}, response::IntoResponse, Json, http::StatusCode};
use std::sync::Arc;
use argon2::{password_hash::SaltString, Argon2, PasswordHasher};
use tracing::info;

use crate::api::dtos::requests::CreateMemberRequest;
use crate::api::extractors::{auth::AuthUser, tenant::CurrentTenant};
use crate::domain::models::user::{Permission, UserRole};
use crate::error::AppError;
use crate::state::AppState;

pub async fn create_member(
    State(state): State<Arc<AppState>>,
    CurrentTenant(bound): CurrentTenant,
    user: AuthUser,
    Json(payload): Json<CreateMemberRequest>,
) -> Result<impl IntoResponse, AppError> {
    user.0.require(Permission::ManageMembers)?;

    let role = match payload.role.as_deref() {
        None | Some("operator") => UserRole::Operator,
        Some("admin") => UserRole::Admin,
        Some(other) => {
            return Err(AppError::Validation(format!("Role '{}' cannot be assigned", other)));
        }
    };

    if payload.password.len() < 8 {
        return Err(AppError::Validation("Password must be at least 8 characters".into()));
    }

    let salt = SaltString::generate(&mut rand::thread_rng());
    let password_hash = Argon2::default()
        .hash_password(payload.password.as_bytes(), &salt)
        .map_err(|_| AppError::Internal)?
        .to_string();

    let member = state
        .user_repo
        .create(Some(bound.tenant.id), payload.username.trim(), &password_hash, role)
        .await?;

    info!(member = member.id, "Staff account created");
    Ok(Json(member))
}

pub async fn list_members(
    State(state): State<Arc<AppState>>,
    CurrentTenant(bound): CurrentTenant,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    user.0.require(Permission::ManageMembers)?;

    let members = state.user_repo.list_by_tenant(bound.tenant.id).await?;
    Ok(Json(members))
}

pub async fn delete_member(
    State(state): State<Arc<AppState>>,
    CurrentTenant(bound): CurrentTenant,
    user: AuthUser,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    user.0.require(Permission::ManageMembers)?;

    if user_id == user.0.id {
        return Err(AppError::Validation("You cannot delete your own account".into()));
    }
    if user_id == bound.tenant.owner_user_id {
        return Err(AppError::Validation("The owner account cannot be deleted".into()));
    }

    state.user_repo.delete(bound.tenant.id, user_id).await?;
    info!(member = user_id, "Staff account deleted");
    Ok(StatusCode::OK)
}
