use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use argon2::{password_hash::SaltString, Argon2, PasswordHasher};
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::models::user::UserRole;
use crate::domain::ports::UserRepository;
use crate::infra::crypto::SecretBox;
use crate::infra::db::pool::{DbPool, TenantPoolManager};
use crate::infra::db::provision::{PostgresProvisioner, SqliteProvisioner};
use crate::infra::repositories::{
    postgres_tenant_repo::PostgresTenantRepo, postgres_user_repo::PostgresUserRepo,
    postgres_auth_repo::PostgresAuthRepo, postgres_vehicle_repo::PostgresVehicleRepo,
    sqlite_tenant_repo::SqliteTenantRepo, sqlite_user_repo::SqliteUserRepo,
    sqlite_auth_repo::SqliteAuthRepo, sqlite_vehicle_repo::SqliteVehicleRepo,
};
use crate::domain::services::auth_service::AuthService;
use crate::state::AppState;

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;
    let secrets = SecretBox::new(config.secret_key);

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        let auth_repo = Arc::new(PostgresAuthRepo::new(pool.clone()));
        let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config.clone()));
        let user_repo = Arc::new(PostgresUserRepo::new(pool.clone()));
        seed_superadmin(user_repo.clone(), config).await;

        AppState {
            config: config.clone(),
            secrets: secrets.clone(),
            tenant_repo: Arc::new(PostgresTenantRepo::new(pool.clone())),
            user_repo,
            auth_repo,
            vehicle_repo: Arc::new(PostgresVehicleRepo::new(pool.clone())),
            auth_service,
            pools: Arc::new(TenantPoolManager::new(
                DbPool::Postgres(pool.clone()),
                config.tenant_db.clone(),
            )),
            provisioner: Arc::new(PostgresProvisioner::new(
                pool,
                config.tenant_db.clone(),
                secrets,
            )),
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        let auth_repo = Arc::new(SqliteAuthRepo::new(pool.clone()));
        let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config.clone()));
        let user_repo = Arc::new(SqliteUserRepo::new(pool.clone()));
        seed_superadmin(user_repo.clone(), config).await;

        AppState {
            config: config.clone(),
            secrets: secrets.clone(),
            tenant_repo: Arc::new(SqliteTenantRepo::new(pool.clone())),
            user_repo,
            auth_repo,
            vehicle_repo: Arc::new(SqliteVehicleRepo::new(pool.clone())),
            auth_service,
            pools: Arc::new(TenantPoolManager::new(
                DbPool::Sqlite(pool),
                config.tenant_db.clone(),
            )),
            provisioner: Arc::new(SqliteProvisioner::new(config.tenant_db.clone(), secrets)),
        }
    }
}

/// Idempotent: the superadmin account is created on first boot only.
async fn seed_superadmin(user_repo: Arc<dyn UserRepository>, config: &Config) {
    let existing = user_repo
        .find_by_username(&config.superadmin_username)
        .await
        .expect("Failed to look up superadmin account");

    if existing.is_none() {
        let salt = SaltString::generate(&mut rand::thread_rng());
        let password_hash = Argon2::default()
            .hash_password(config.superadmin_password.as_bytes(), &salt)
            .expect("Failed to hash superadmin password")
            .to_string();

        user_repo
            .create(None, &config.superadmin_username, &password_hash, UserRole::Superadmin)
            .await
            .expect("Failed to seed superadmin account");
        info!("Seeded superadmin account '{}'", config.superadmin_username);
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
