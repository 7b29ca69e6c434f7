pub mod auth_service;
pub mod fees;
