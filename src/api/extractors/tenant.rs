use axum::{extract::FromRequestParts, http::request::Parts};

use crate::api::tenancy::{BoundTenant, RequestTenancy};
use crate::error::AppError;

/// Extractor for endpoints that only make sense on a tenant domain.
/// Carries the tenant row and its bound connection handle; repositories
/// for tenant-scoped entities are built from the handle.
pub struct CurrentTenant(pub BoundTenant);

impl<S> FromRequestParts<S> for CurrentTenant
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<RequestTenancy>() {
            Some(RequestTenancy::Tenant(bound)) => Ok(CurrentTenant(bound.clone())),
            Some(RequestTenancy::MainDomain) => Err(AppError::NotFound(
                "This endpoint is only available on a tenant domain".into(),
            )),
            None => Err(AppError::InternalWithMsg(
                "Tenant resolution middleware not mounted".into(),
            )),
        }
    }
}

/// Guard for endpoints reserved for the shared main domain (signup and
/// registry administration).
pub struct MainDomain;

impl<S> FromRequestParts<S> for MainDomain
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<RequestTenancy>() {
            Some(RequestTenancy::MainDomain) => Ok(MainDomain),
            Some(RequestTenancy::Tenant(_)) => Err(AppError::NotFound(
                "This endpoint is not available on a tenant domain".into(),
            )),
            None => Err(AppError::InternalWithMsg(
                "Tenant resolution middleware not mounted".into(),
            )),
        }
    }
}
