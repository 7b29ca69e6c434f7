use axum::{extract::{State, Query}, response::IntoResponse, Json};
use chrono::{Duration, Utc};
use std::sync::Arc;

use crate::api::dtos::{requests::RevenueQuery, responses::RevenueResponse};
use crate::api::extractors::{auth::AuthUser, tenant::CurrentTenant};
use crate::domain::models::user::Permission;
use crate::error::AppError;
use crate::infra::repositories;
use crate::state::AppState;

pub async fn revenue(
    State(_state): State<Arc<AppState>>,
    CurrentTenant(bound): CurrentTenant,
    user: AuthUser,
    Query(query): Query<RevenueQuery>,
) -> Result<impl IntoResponse, AppError> {
    user.0.require(Permission::ViewReports)?;

    let to = query.to.unwrap_or_else(|| Utc::now().date_naive());
    let from = query.from.unwrap_or(to - Duration::days(29));
    if from > to {
        return Err(AppError::Validation("'from' must not be after 'to'".into()));
    }

    let days = repositories::parking_repo(&bound.db)
        .revenue_by_day(from, to)
        .await?;

    let total_transactions = days.iter().map(|d| d.transactions).sum();
    let total_revenue = days.iter().map(|d| d.revenue).sum();

    Ok(Json(RevenueResponse {
        from,
        to,
        days,
        total_transactions,
        total_revenue,
    }))
}
