use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{CheckInRequest, TransactionsQuery};
use crate::api::extractors::{auth::AuthUser, tenant::CurrentTenant};
use crate::domain::models::user::Permission;
use crate::domain::models::vehicle::{normalize_plate, Vehicle};
use crate::domain::services::fees::parking_fee;
use crate::error::AppError;
use crate::infra::repositories;
use crate::state::AppState;

/// Looks the plate up in the shared registry, registering it on first
/// sight. The registry row decides the vehicle kind used for billing.
async fn resolve_vehicle(
    state: &AppState,
    payload: &CheckInRequest,
    plate: &str,
) -> Result<Vehicle, AppError> {
    match state.vehicle_repo.find_by_plate(plate).await? {
        Some(vehicle) => Ok(vehicle),
        None => {
            state
                .vehicle_repo
                .create(plate, payload.kind, payload.owner_name.clone())
                .await
        }
    }
}

pub async fn check_in(
    State(state): State<Arc<AppState>>,
    CurrentTenant(bound): CurrentTenant,
    user: AuthUser,
    Path(area_id): Path<i64>,
    Json(payload): Json<CheckInRequest>,
) -> Result<impl IntoResponse, AppError> {
    user.0.require(Permission::RecordParking)?;

    let plate = normalize_plate(&payload.plate);
    if plate.is_empty() {
        return Err(AppError::Validation("Plate must not be empty".into()));
    }

    let area = repositories::area_repo(&bound.db)
        .find_by_id(area_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Area {} not found", area_id)))?;

    let vehicle = resolve_vehicle(&state, &payload, &plate).await?;

    let parking = repositories::parking_repo(&bound.db);

    if parking.find_open_by_plate(&plate).await?.is_some() {
        return Err(AppError::Conflict(format!("Vehicle '{}' is already parked", plate)));
    }

    let occupied = parking.count_open(area_id).await?;
    if occupied >= area.capacity as i64 {
        return Err(AppError::Conflict(format!("Area '{}' is full", area.name)));
    }

    let transaction = parking
        .check_in(area_id, vehicle.id, &plate, vehicle.kind, user.0.id, Utc::now())
        .await?;

    repositories::activity_repo(&bound.db)
        .append(user.0.id, "parking.check_in", &format!("transaction:{}", transaction.id))
        .await?;

    info!(transaction = transaction.id, plate = %plate, "Vehicle checked in");
    Ok(Json(transaction))
}

pub async fn check_out(
    State(_state): State<Arc<AppState>>,
    CurrentTenant(bound): CurrentTenant,
    user: AuthUser,
    Path((area_id, transaction_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    user.0.require(Permission::RecordParking)?;

    let area = repositories::area_repo(&bound.db)
        .find_by_id(area_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Area {} not found", area_id)))?;

    let parking = repositories::parking_repo(&bound.db);
    let transaction = parking
        .find_by_id(area_id, transaction_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Transaction {} not found", transaction_id)))?;

    if transaction.exited_at.is_some() {
        return Err(AppError::Conflict("Vehicle has already checked out".into()));
    }

    let exited_at = Utc::now();
    let fee = parking_fee(
        transaction.entered_at,
        exited_at,
        area.rate_for(transaction.vehicle_kind),
    );

    let closed = parking.close(transaction_id, exited_at, fee).await?;

    repositories::activity_repo(&bound.db)
        .append(user.0.id, "parking.check_out", &format!("transaction:{}", closed.id))
        .await?;

    info!(transaction = closed.id, fee, "Vehicle checked out");
    Ok(Json(closed))
}

pub async fn list_transactions(
    State(_state): State<Arc<AppState>>,
    CurrentTenant(bound): CurrentTenant,
    user: AuthUser,
    Path(area_id): Path<i64>,
    Query(query): Query<TransactionsQuery>,
) -> Result<impl IntoResponse, AppError> {
    user.0.require(Permission::RecordParking)?;

    repositories::area_repo(&bound.db)
        .find_by_id(area_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Area {} not found", area_id)))?;

    let transactions = repositories::parking_repo(&bound.db)
        .list_by_area(area_id, query.open.unwrap_or(false))
        .await?;
    Ok(Json(transactions))
}

pub async fn get_transaction(
    State(_state): State<Arc<AppState>>,
    CurrentTenant(bound): CurrentTenant,
    user: AuthUser,
    Path((area_id, transaction_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    user.0.require(Permission::RecordParking)?;

    repositories::area_repo(&bound.db)
        .find_by_id(area_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Area {} not found", area_id)))?;

    let transaction = repositories::parking_repo(&bound.db)
        .find_by_id(area_id, transaction_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Transaction {} not found", transaction_id)))?;
    Ok(Json(transaction))
}
