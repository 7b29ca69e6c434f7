use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put, delete},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{
    activity, admin_tenant, area, auth, dashboard, health, member, parking, signup, vehicle,
};
use crate::api::tenancy::resolve_tenancy;
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Everything under /api/v1 passes through host-based tenant
    // resolution; /health stays reachable from any host.
    let api = Router::new()
        // Auth (either domain; login is tenancy-checked)
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/auth/logout", post(auth::logout))

        // Main domain: public signup
        .route("/api/v1/signup", post(signup::signup))

        // Main domain: registry administration
        .route("/api/v1/admin/tenants", get(admin_tenant::list_tenants))
        .route("/api/v1/admin/tenants/{tenant_id}/approve", post(admin_tenant::approve_tenant))
        .route("/api/v1/admin/tenants/{tenant_id}/reject", post(admin_tenant::reject_tenant))
        .route("/api/v1/admin/tenants/{tenant_id}/activate", post(admin_tenant::activate_tenant))
        .route("/api/v1/admin/tenants/{tenant_id}/deactivate", post(admin_tenant::deactivate_tenant))
        .route("/api/v1/admin/tenants/{tenant_id}/database-credentials", put(admin_tenant::update_db_credentials))
        .route("/api/v1/admin/tenants/{tenant_id}/database", delete(admin_tenant::deprovision_tenant))

        // Tenant domain: staff accounts
        .route("/api/v1/members", post(member::create_member).get(member::list_members))
        .route("/api/v1/members/{user_id}", delete(member::delete_member))

        // Tenant domain: shared vehicle registry
        .route("/api/v1/vehicles", post(vehicle::register_vehicle))
        .route("/api/v1/vehicles/{plate}", get(vehicle::get_vehicle))

        // Tenant domain: areas and parking flow
        .route("/api/v1/areas", post(area::create_area).get(area::list_areas))
        .route("/api/v1/areas/{area_id}", get(area::get_area).put(area::update_area).delete(area::delete_area))
        .route("/api/v1/areas/{area_id}/check-in", post(parking::check_in))
        .route("/api/v1/areas/{area_id}/transactions", get(parking::list_transactions))
        .route("/api/v1/areas/{area_id}/transactions/{transaction_id}", get(parking::get_transaction))
        .route("/api/v1/areas/{area_id}/transactions/{transaction_id}/check-out", post(parking::check_out))

        // Tenant domain: reporting
        .route("/api/v1/dashboard/revenue", get(dashboard::revenue))
        .route("/api/v1/activity", get(activity::list_activity))

        .layer(axum::middleware::from_fn_with_state(state.clone(), resolve_tenancy));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(api)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        tenant = tracing::field::Empty,
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
