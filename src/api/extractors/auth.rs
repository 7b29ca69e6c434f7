use axum::{
    extract::{FromRequestParts, FromRef},
    http::request::Parts,
};
use crate::api::tenancy::RequestTenancy;
use crate::error::AppError;
use crate::state::AppState;
use crate::domain::models::auth::Claims;
use crate::domain::models::user::User;
use std::sync::Arc;
use tower_cookies::Cookies;
use jsonwebtoken::{decode, DecodingKey, Validation, Algorithm};
use tracing::Span;

pub struct AuthUser(pub User);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let cookies = parts.extensions.get::<Cookies>()
            .ok_or(AppError::Internal)?;

        let access_token = cookies.get("access_token")
            .ok_or(AppError::Unauthorized)?
            .value()
            .to_string();

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let decoding_key = DecodingKey::from_ed_pem(app_state.config.jwt_public_key.as_bytes())
            .map_err(|_| AppError::Internal)?;

        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_audience(&["parkify-frontend"]);

        let token_data = decode::<Claims>(&access_token, &decoding_key, &validation)
            .map_err(|_| AppError::Unauthorized)?;

        let method = &parts.method;
        if method != "GET" && method != "HEAD" && method != "OPTIONS" {
            let csrf_header_val = parts.headers.get("X-CSRF-Token")
                .ok_or(AppError::Forbidden("Missing CSRF token".into()))?
                .to_str()
                .map_err(|_| AppError::Forbidden("Invalid CSRF token".into()))?;

            if csrf_header_val != token_data.claims.csrf_token {
                return Err(AppError::Forbidden("Invalid CSRF token".into()));
            }
        }

        // A token is only valid under the tenancy it was issued for: a
        // tenant user's token is useless on other tenants' domains and on
        // the main domain, and vice versa.
        match parts.extensions.get::<RequestTenancy>() {
            Some(RequestTenancy::Tenant(bound)) => {
                if token_data.claims.tenant_id != Some(bound.tenant.id) {
                    return Err(AppError::Unauthorized);
                }
            }
            Some(RequestTenancy::MainDomain) => {
                if token_data.claims.tenant_id.is_some() {
                    return Err(AppError::Unauthorized);
                }
            }
            None => {
                return Err(AppError::InternalWithMsg(
                    "Tenant resolution middleware not mounted".into(),
                ));
            }
        }

        let user = User {
            id: token_data.claims.sub,
            tenant_id: token_data.claims.tenant_id,
            username: "from_jwt".to_string(),
            role: token_data.claims.role,
            password_hash: "".to_string(),
            created_at: chrono::Utc::now(),
        };

        Span::current().record("user_id", user.id);

        Ok(AuthUser(user))
    }
}
