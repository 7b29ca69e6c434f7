use axum::{extract::{State, Path}, response::IntoResponse, Json};
use std::sync::Arc;

use crate::api::dtos::requests::RegisterVehicleRequest;
use crate::api::extractors::{auth::AuthUser, tenant::CurrentTenant};
use crate::domain::models::user::Permission;
use crate::domain::models::vehicle::normalize_plate;
use crate::error::AppError;
use crate::state::AppState;

/// The vehicle registry is a shared entity: it lives in the main database
/// even though registration happens from tenant domains.
pub async fn register_vehicle(
    State(state): State<Arc<AppState>>,
    CurrentTenant(_bound): CurrentTenant,
    user: AuthUser,
    Json(payload): Json<RegisterVehicleRequest>,
) -> Result<impl IntoResponse, AppError> {
    user.0.require(Permission::ManageVehicles)?;

    let plate = normalize_plate(&payload.plate);
    if plate.is_empty() {
        return Err(AppError::Validation("Plate must not be empty".into()));
    }

    let vehicle = state
        .vehicle_repo
        .create(&plate, payload.kind, payload.owner_name)
        .await?;

    Ok(Json(vehicle))
}

pub async fn get_vehicle(
    State(state): State<Arc<AppState>>,
    CurrentTenant(_bound): CurrentTenant,
    user: AuthUser,
    Path(plate): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    user.0.require(Permission::ManageVehicles)?;

    let plate = normalize_plate(&plate);
    let vehicle = state
        .vehicle_repo
        .find_by_plate(&plate)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Vehicle '{}' not registered", plate)))?;

    Ok(Json(vehicle))
}
