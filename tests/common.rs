use parkify_backend::{
    api::router::create_router,
    config::{Config, TenantDbSettings},
    domain::models::user::UserRole,
    domain::ports::UserRepository,
    domain::services::auth_service::AuthService,
    infra::crypto::SecretBox,
    infra::db::pool::{DbPool, TenantPoolManager},
    infra::db::provision::SqliteProvisioner,
    infra::repositories::{
        sqlite_auth_repo::SqliteAuthRepo,
        sqlite_tenant_repo::SqliteTenantRepo,
        sqlite_user_repo::SqliteUserRepo,
        sqlite_vehicle_repo::SqliteVehicleRepo,
    },
    state::AppState,
};
use argon2::{password_hash::SaltString, Argon2, PasswordHasher};
use axum::{
    body::Body,
    http::{header, Request},
    response::Response,
    Router,
};
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

pub const MAIN_HOST: &str = "parkify.test";
pub const SUPERADMIN_USERNAME: &str = "superadmin";
pub const SUPERADMIN_PASSWORD: &str = "super-secret-pw";

#[allow(dead_code)]
pub fn tenant_host(slug: &str) -> String {
    format!("{}.parkify.test", slug)
}

pub async fn parse_body(response: Response) -> Value {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    if bytes.is_empty() {
        panic!("Response body is empty. Status: {}", status);
    }
    match serde_json::from_slice(&bytes) {
        Ok(v) => v,
        Err(e) => panic!(
            "Failed to parse JSON: {:?}. Status: {}. Body: {:?}",
            e,
            status,
            String::from_utf8_lossy(&bytes)
        ),
    }
}

pub struct AuthHeaders {
    pub access_token: String,
    pub csrf_token: String,
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub tenant_data_dir: String,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        let run_id = Uuid::new_v4();
        let db_filename = format!("test_{}.db", run_id);
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);
        let tenant_data_dir = format!("test_tenants_{}", run_id);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let priv_key_pem = include_str!("../tests/keys/test_private.pem");
        let pub_key_pem = include_str!("../tests/keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            domain_suffix: ".parkify.test".to_string(),
            main_domains: vec![MAIN_HOST.to_string(), "localhost:3000".to_string()],
            db_name_prefix: "parkify_".to_string(),
            tenant_db: TenantDbSettings {
                host: "localhost".to_string(),
                port: 5432,
                username: "parkify".to_string(),
                password: "".to_string(),
                data_dir: tenant_data_dir.clone(),
            },
            secret_key: [7u8; 32],
            jwt_secret_key: priv_key_pem.to_string(),
            jwt_public_key: pub_key_pem.to_string(),
            auth_issuer: "test-issuer".to_string(),
            superadmin_username: SUPERADMIN_USERNAME.to_string(),
            superadmin_password: SUPERADMIN_PASSWORD.to_string(),
            provision_retry_secs: 3600,
        };

        let secrets = SecretBox::new(config.secret_key);
        let auth_repo = Arc::new(SqliteAuthRepo::new(pool.clone()));
        let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config.clone()));
        let user_repo = Arc::new(SqliteUserRepo::new(pool.clone()));

        let salt = SaltString::generate(&mut rand::thread_rng());
        let password_hash = Argon2::default()
            .hash_password(SUPERADMIN_PASSWORD.as_bytes(), &salt)
            .unwrap()
            .to_string();
        user_repo
            .create(None, SUPERADMIN_USERNAME, &password_hash, UserRole::Superadmin)
            .await
            .expect("Failed to seed superadmin");

        let state = Arc::new(AppState {
            config: config.clone(),
            secrets: secrets.clone(),
            tenant_repo: Arc::new(SqliteTenantRepo::new(pool.clone())),
            user_repo,
            auth_repo,
            vehicle_repo: Arc::new(SqliteVehicleRepo::new(pool.clone())),
            auth_service,
            pools: Arc::new(TenantPoolManager::new(
                DbPool::Sqlite(pool.clone()),
                config.tenant_db.clone(),
            )),
            provisioner: Arc::new(SqliteProvisioner::new(config.tenant_db.clone(), secrets)),
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            tenant_data_dir,
            state,
        }
    }

    /// Sends one request against the router with the given Host header.
    pub async fn send(
        &self,
        method: &str,
        host: &str,
        uri: &str,
        auth: Option<&AuthHeaders>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::HOST, host);

        if let Some(auth) = auth {
            builder = builder
                .header(header::COOKIE, format!("access_token={}", auth.access_token))
                .header("X-CSRF-Token", &auth.csrf_token);
        }

        let body = match body {
            Some(v) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(v.to_string())
            }
            None => Body::empty(),
        };

        self.router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }

    pub async fn login(&self, host: &str, username: &str, password: &str) -> AuthHeaders {
        let payload = serde_json::json!({
            "username": username,
            "password": password
        });

        let response = self
            .send("POST", host, "/api/v1/auth/login", None, Some(payload))
            .await;

        if !response.status().is_success() {
            panic!("Login failed in test helper: status {}", response.status());
        }

        let cookies: Vec<String> = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|h| h.to_str().unwrap().to_string())
            .collect();

        let access_token_cookie = cookies
            .iter()
            .find(|c| c.contains("access_token="))
            .expect("No access_token cookie returned");

        let start = access_token_cookie.find("access_token=").unwrap() + 13;
        let end = access_token_cookie[start..]
            .find(';')
            .unwrap_or(access_token_cookie.len() - start);
        let access_token = access_token_cookie[start..start + end].to_string();

        let body_json = parse_body(response).await;
        let csrf_token = body_json["csrf_token"]
            .as_str()
            .expect("No csrf_token in body")
            .to_string();

        AuthHeaders {
            access_token,
            csrf_token,
        }
    }

    pub async fn superadmin(&self) -> AuthHeaders {
        self.login(MAIN_HOST, SUPERADMIN_USERNAME, SUPERADMIN_PASSWORD).await
    }

    /// Registers an institution on the main domain and returns the signup
    /// response body.
    pub async fn signup_tenant(&self, slug: &str, username: &str, password: &str) -> Value {
        let payload = serde_json::json!({
            "name": format!("Parkir {}", slug),
            "institution_name": format!("Universitas {}", slug),
            "institution_address": "Jl. Merdeka 1",
            "slug": slug,
            "username": username,
            "password": password
        });

        let response = self
            .send("POST", MAIN_HOST, "/api/v1/signup", None, Some(payload))
            .await;
        if !response.status().is_success() {
            panic!("Signup failed in test helper: status {}", response.status());
        }
        parse_body(response).await
    }

    pub async fn approve_tenant(&self, tenant_id: i64) -> Value {
        let admin = self.superadmin().await;
        let response = self
            .send(
                "POST",
                MAIN_HOST,
                &format!("/api/v1/admin/tenants/{}/approve", tenant_id),
                Some(&admin),
                None,
            )
            .await;
        if !response.status().is_success() {
            panic!("Approve failed in test helper: status {}", response.status());
        }
        parse_body(response).await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
        let _ = std::fs::remove_dir_all(&self.tenant_data_dir);
    }
}
