use axum::{extract::{State, Query}, response::IntoResponse, Json};
use std::sync::Arc;

use crate::api::dtos::requests::ActivityQuery;
use crate::api::extractors::{auth::AuthUser, tenant::CurrentTenant};
use crate::domain::models::user::Permission;
use crate::error::AppError;
use crate::infra::repositories;
use crate::state::AppState;

pub async fn list_activity(
    State(_state): State<Arc<AppState>>,
    CurrentTenant(bound): CurrentTenant,
    user: AuthUser,
    Query(query): Query<ActivityQuery>,
) -> Result<impl IntoResponse, AppError> {
    user.0.require(Permission::ViewReports)?;

    let limit = query.limit.unwrap_or(50).clamp(1, 500);
    let entries = repositories::activity_repo(&bound.db).list(limit).await?;
    Ok(Json(entries))
}
