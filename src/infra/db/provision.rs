use async_trait::async_trait;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::PgPool;
use tracing::{error, info, warn};

use crate::config::TenantDbSettings;
use crate::domain::models::tenant::Tenant;
use crate::domain::ports::TenantProvisioner;
use crate::error::AppError;
use crate::infra::crypto::SecretBox;
use crate::infra::db::pool::DbPool;
use crate::infra::db::profile::{ConnectionProfile, DbDriver};

/// Tenant schema, versioned separately from the shared database schema.
static TENANT_PG_MIGRATOR: Migrator = sqlx::migrate!("./migrations/tenant/postgres");
static TENANT_SQLITE_MIGRATOR: Migrator = sqlx::migrate!("./migrations/tenant/sqlite");

/// Creates tenant databases on the server the admin pool points at, then
/// initializes the tenant schema over a short-lived connection resolved
/// from the tenant's own profile. Nothing shared is rebound at any point,
/// so concurrent provisioning runs cannot disturb each other or any
/// in-flight request.
pub struct PostgresProvisioner {
    admin: PgPool,
    settings: TenantDbSettings,
    secrets: SecretBox,
}

impl PostgresProvisioner {
    pub fn new(admin: PgPool, settings: TenantDbSettings, secrets: SecretBox) -> Self {
        Self { admin, settings, secrets }
    }

    async fn try_provision(&self, tenant: &Tenant) -> Result<(), AppError> {
        // Step 1: create the isolated store if it does not exist yet.
        let exists: Option<i32> =
            sqlx::query_scalar("SELECT 1 FROM pg_database WHERE datname = $1")
                .bind(&tenant.database_name)
                .fetch_optional(&self.admin)
                .await?;

        if exists.is_none() {
            sqlx::query(&format!(
                "CREATE DATABASE \"{}\" ENCODING 'UTF8'",
                tenant.database_name
            ))
            .execute(&self.admin)
            .await?;
        }

        // Step 2: run the tenant migration set against the new store.
        let profile = ConnectionProfile::for_tenant(
            tenant,
            DbDriver::Postgres,
            &self.settings,
            &self.secrets,
        )?;
        let pool = DbPool::connect(&profile).await?;
        let result = match &pool {
            DbPool::Postgres(pg) => TENANT_PG_MIGRATOR
                .run(pg)
                .await
                .map_err(|e| AppError::InternalWithMsg(format!("Tenant migration failed: {}", e))),
            DbPool::Sqlite(_) => Err(AppError::InternalWithMsg(
                "Postgres provisioner resolved a non-Postgres profile".into(),
            )),
        };
        pool.close().await;
        result
    }
}

#[async_trait]
impl TenantProvisioner for PostgresProvisioner {
    async fn provision(&self, tenant: &Tenant) -> bool {
        match self.try_provision(tenant).await {
            Ok(()) => {
                info!(slug = %tenant.slug, database = %tenant.database_name, "Tenant database provisioned");
                true
            }
            Err(e) => {
                error!(slug = %tenant.slug, error = %e, "Tenant provisioning failed");
                false
            }
        }
    }

    async fn deprovision(&self, tenant: &Tenant) -> bool {
        let dropped = sqlx::query(&format!(
            "DROP DATABASE IF EXISTS \"{}\" WITH (FORCE)",
            tenant.database_name
        ))
        .execute(&self.admin)
        .await;

        match dropped {
            Ok(_) => {
                warn!(slug = %tenant.slug, database = %tenant.database_name, "Tenant database dropped");
                true
            }
            Err(e) => {
                error!(slug = %tenant.slug, error = %e, "Tenant deprovisioning failed");
                false
            }
        }
    }
}

/// SQLite variant: each tenant store is a file under the data directory.
/// Opening with create-if-missing is the "create database" step.
pub struct SqliteProvisioner {
    settings: TenantDbSettings,
    secrets: SecretBox,
}

impl SqliteProvisioner {
    pub fn new(settings: TenantDbSettings, secrets: SecretBox) -> Self {
        Self { settings, secrets }
    }

    fn tenant_path(&self, tenant: &Tenant) -> Result<std::path::PathBuf, AppError> {
        let profile = ConnectionProfile::for_tenant(
            tenant,
            DbDriver::Sqlite,
            &self.settings,
            &self.secrets,
        )?;
        match profile {
            ConnectionProfile::Sqlite { path, .. } => Ok(path),
            ConnectionProfile::Postgres { .. } => Err(AppError::InternalWithMsg(
                "SQLite provisioner resolved a non-SQLite profile".into(),
            )),
        }
    }

    async fn try_provision(&self, tenant: &Tenant) -> Result<(), AppError> {
        std::fs::create_dir_all(&self.settings.data_dir)
            .map_err(|e| AppError::InternalWithMsg(format!("Cannot create data dir: {}", e)))?;

        let path = self.tenant_path(tenant)?;
        let opts = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await?;

        let result = TENANT_SQLITE_MIGRATOR
            .run(&pool)
            .await
            .map_err(|e| AppError::InternalWithMsg(format!("Tenant migration failed: {}", e)));
        pool.close().await;
        result
    }
}

#[async_trait]
impl TenantProvisioner for SqliteProvisioner {
    async fn provision(&self, tenant: &Tenant) -> bool {
        match self.try_provision(tenant).await {
            Ok(()) => {
                info!(slug = %tenant.slug, database = %tenant.database_name, "Tenant database provisioned");
                true
            }
            Err(e) => {
                error!(slug = %tenant.slug, error = %e, "Tenant provisioning failed");
                false
            }
        }
    }

    async fn deprovision(&self, tenant: &Tenant) -> bool {
        let path = match self.tenant_path(tenant) {
            Ok(path) => path,
            Err(e) => {
                error!(slug = %tenant.slug, error = %e, "Tenant deprovisioning failed");
                return false;
            }
        };

        match std::fs::remove_file(&path) {
            Ok(()) => {
                warn!(slug = %tenant.slug, database = %tenant.database_name, "Tenant database deleted");
                true
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(slug = %tenant.slug, database = %tenant.database_name, "Tenant database already absent");
                true
            }
            Err(e) => {
                error!(slug = %tenant.slug, error = %e, "Tenant deprovisioning failed");
                false
            }
        }
    }
}
