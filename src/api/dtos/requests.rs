use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::models::vehicle::VehicleKind;

#[derive(Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub institution_name: String,
    pub institution_address: Option<String>,
    pub slug: String,
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct CreateMemberRequest {
    pub username: String,
    pub password: String,
    pub role: Option<String>,
}

#[derive(Deserialize)]
pub struct RegisterVehicleRequest {
    pub plate: String,
    pub kind: VehicleKind,
    pub owner_name: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateAreaRequest {
    pub name: String,
    pub capacity: i32,
    pub car_rate: i64,
    pub motorcycle_rate: i64,
}

#[derive(Deserialize)]
pub struct UpdateAreaRequest {
    pub name: Option<String>,
    pub capacity: Option<i32>,
    pub car_rate: Option<i64>,
    pub motorcycle_rate: Option<i64>,
}

#[derive(Deserialize)]
pub struct CheckInRequest {
    pub plate: String,
    pub kind: VehicleKind,
    pub owner_name: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateDbCredentialsRequest {
    pub db_username: Option<String>,
    pub db_password: Option<String>,
}

#[derive(Deserialize)]
pub struct ListTenantsQuery {
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct TransactionsQuery {
    pub open: Option<bool>,
}

#[derive(Deserialize)]
pub struct RevenueQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Deserialize)]
pub struct ActivityQuery {
    pub limit: Option<i64>,
}
