use axum::{extract::{State, Path}, response::IntoResponse, Json, http::StatusCode};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{CreateAreaRequest, UpdateAreaRequest};
use crate::api::extractors::{auth::AuthUser, tenant::CurrentTenant};
use crate::domain::models::user::Permission;
use crate::error::AppError;
use crate::infra::repositories;
use crate::state::AppState;

fn validate_rates(capacity: i32, car_rate: i64, motorcycle_rate: i64) -> Result<(), AppError> {
    if capacity <= 0 {
        return Err(AppError::Validation("Capacity must be positive".into()));
    }
    if car_rate < 0 || motorcycle_rate < 0 {
        return Err(AppError::Validation("Rates must not be negative".into()));
    }
    Ok(())
}

pub async fn create_area(
    State(_state): State<Arc<AppState>>,
    CurrentTenant(bound): CurrentTenant,
    user: AuthUser,
    Json(payload): Json<CreateAreaRequest>,
) -> Result<impl IntoResponse, AppError> {
    user.0.require(Permission::ManageAreas)?;
    validate_rates(payload.capacity, payload.car_rate, payload.motorcycle_rate)?;

    let areas = repositories::area_repo(&bound.db);
    let area = areas
        .create(payload.name.trim(), payload.capacity, payload.car_rate, payload.motorcycle_rate)
        .await?;

    repositories::activity_repo(&bound.db)
        .append(user.0.id, "area.created", &format!("area:{}", area.id))
        .await?;

    info!(area = area.id, "Parking area created");
    Ok(Json(area))
}

pub async fn list_areas(
    State(_state): State<Arc<AppState>>,
    CurrentTenant(bound): CurrentTenant,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    user.0.require(Permission::ManageAreas)?;

    let areas = repositories::area_repo(&bound.db).list().await?;
    Ok(Json(areas))
}

pub async fn get_area(
    State(_state): State<Arc<AppState>>,
    CurrentTenant(bound): CurrentTenant,
    user: AuthUser,
    Path(area_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    user.0.require(Permission::ManageAreas)?;

    let area = repositories::area_repo(&bound.db)
        .find_by_id(area_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Area {} not found", area_id)))?;
    Ok(Json(area))
}

pub async fn update_area(
    State(_state): State<Arc<AppState>>,
    CurrentTenant(bound): CurrentTenant,
    user: AuthUser,
    Path(area_id): Path<i64>,
    Json(payload): Json<UpdateAreaRequest>,
) -> Result<impl IntoResponse, AppError> {
    user.0.require(Permission::ManageAreas)?;

    let areas = repositories::area_repo(&bound.db);
    let mut area = areas
        .find_by_id(area_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Area {} not found", area_id)))?;

    if let Some(name) = payload.name {
        area.name = name;
    }
    if let Some(capacity) = payload.capacity {
        area.capacity = capacity;
    }
    if let Some(car_rate) = payload.car_rate {
        area.car_rate = car_rate;
    }
    if let Some(motorcycle_rate) = payload.motorcycle_rate {
        area.motorcycle_rate = motorcycle_rate;
    }
    validate_rates(area.capacity, area.car_rate, area.motorcycle_rate)?;

    let updated = areas.update(&area).await?;

    repositories::activity_repo(&bound.db)
        .append(user.0.id, "area.updated", &format!("area:{}", updated.id))
        .await?;

    Ok(Json(updated))
}

pub async fn delete_area(
    State(_state): State<Arc<AppState>>,
    CurrentTenant(bound): CurrentTenant,
    user: AuthUser,
    Path(area_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    user.0.require(Permission::ManageAreas)?;

    let areas = repositories::area_repo(&bound.db);
    areas
        .find_by_id(area_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Area {} not found", area_id)))?;

    let open = repositories::parking_repo(&bound.db).count_open(area_id).await?;
    if open > 0 {
        return Err(AppError::Conflict(format!(
            "Area still has {} parked vehicle(s)",
            open
        )));
    }

    areas.soft_delete(area_id).await?;

    repositories::activity_repo(&bound.db)
        .append(user.0.id, "area.deleted", &format!("area:{}", area_id))
        .await?;

    info!(area = area_id, "Parking area deleted");
    Ok(StatusCode::OK)
}
