use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::Span;

use crate::domain::models::tenant::Tenant;
use crate::error::AppError;
use crate::infra::db::pool::DbPool;
use crate::state::AppState;

/// Which storage this request is bound to. Inserted into the request's
/// extensions exactly once by [`resolve_tenancy`] and dropped with the
/// request, so a binding can never leak into another request.
#[derive(Clone)]
pub enum RequestTenancy {
    /// Allow-listed shared hostname: signup and registry administration.
    MainDomain,
    Tenant(BoundTenant),
}

#[derive(Clone)]
pub struct BoundTenant {
    pub tenant: Tenant,
    pub db: DbPool,
}

/// Maps the request's Host header to a tenancy before any handler runs.
///
/// Outcomes: an allow-listed host proceeds without a binding; a host whose
/// first label is the slug of an approved and active tenant proceeds with
/// that tenant's connection bound; anything else is rejected with 404.
/// The registry is consulted on every request: deactivating a tenant
/// takes effect immediately, there is no resolution cache.
pub async fn resolve_tenancy(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let host = req
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    // The allow-list is compared against the full host string, port included.
    if state.config.main_domains.iter().any(|d| d == &host) {
        req.extensions_mut().insert(RequestTenancy::MainDomain);
        return Ok(next.run(req).await);
    }

    let slug = candidate_slug(&host);
    let tenant = state
        .tenant_repo
        .find_routable_by_slug(slug)
        .await?
        .ok_or_else(|| AppError::TenantNotFound(host.clone()))?;

    Span::current().record("tenant", tenant.slug.as_str());

    let profile = state.pools.profile_for(&tenant, &state.secrets)?;
    let db = state.pools.get_or_connect(&profile).await?;

    req.extensions_mut()
        .insert(RequestTenancy::Tenant(BoundTenant { tenant, db }));
    Ok(next.run(req).await)
}

/// First `.`-separated label of the host, with any `:port` stripped.
fn candidate_slug(host: &str) -> &str {
    let bare = host.split(':').next().unwrap_or("");
    bare.split('.').next().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_is_the_first_label() {
        assert_eq!(candidate_slug("kampus1.parkify.test"), "kampus1");
        assert_eq!(candidate_slug("kampus1.parkify.test:8080"), "kampus1");
        assert_eq!(candidate_slug("kampus1"), "kampus1");
        assert_eq!(candidate_slug(""), "");
    }

    #[test]
    fn deep_subdomains_only_use_the_leading_label() {
        assert_eq!(candidate_slug("a.b.parkify.test"), "a");
    }
}
