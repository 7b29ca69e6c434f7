use std::collections::HashMap;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{PgPool, SqlitePool};
use tokio::sync::RwLock;
use tracing::info;

use crate::config::TenantDbSettings;
use crate::domain::models::tenant::Tenant;
use crate::error::AppError;
use crate::infra::crypto::SecretBox;
use crate::infra::db::profile::{ConnectionProfile, DbDriver};

/// Backend-agnostic pool handle. Cloning is cheap (sqlx pools are Arcs).
#[derive(Clone)]
pub enum DbPool {
    Postgres(PgPool),
    Sqlite(SqlitePool),
}

impl DbPool {
    pub async fn connect(profile: &ConnectionProfile) -> Result<Self, AppError> {
        match profile {
            ConnectionProfile::Postgres { host, port, database, username, password } => {
                let opts = PgConnectOptions::new()
                    .host(host)
                    .port(*port)
                    .database(database)
                    .username(username)
                    .password(password);

                let pool = PgPoolOptions::new()
                    .max_connections(5)
                    .connect_with(opts)
                    .await?;
                Ok(DbPool::Postgres(pool))
            }
            ConnectionProfile::Sqlite { path, .. } => {
                // No create_if_missing: an unprovisioned tenant store must
                // surface as an error, not silently appear empty.
                let opts = SqliteConnectOptions::new()
                    .filename(path)
                    .journal_mode(SqliteJournalMode::Wal)
                    .busy_timeout(Duration::from_secs(5));

                let pool = SqlitePoolOptions::new()
                    .max_connections(5)
                    .connect_with(opts)
                    .await?;
                Ok(DbPool::Sqlite(pool))
            }
        }
    }

    pub fn driver(&self) -> DbDriver {
        match self {
            DbPool::Postgres(_) => DbDriver::Postgres,
            DbPool::Sqlite(_) => DbDriver::Sqlite,
        }
    }

    pub async fn close(&self) {
        match self {
            DbPool::Postgres(pool) => pool.close().await,
            DbPool::Sqlite(pool) => pool.close().await,
        }
    }
}

/// Owns the shared pool and a cache of per-tenant pools keyed by database
/// name. This is a resource cache only: which tenant a request is bound to
/// lives in the request's own extensions, never here.
pub struct TenantPoolManager {
    shared: DbPool,
    settings: TenantDbSettings,
    pools: RwLock<HashMap<String, DbPool>>,
}

impl TenantPoolManager {
    pub fn new(shared: DbPool, settings: TenantDbSettings) -> Self {
        Self {
            shared,
            settings,
            pools: RwLock::new(HashMap::new()),
        }
    }

    pub fn shared(&self) -> &DbPool {
        &self.shared
    }

    pub fn profile_for(&self, tenant: &Tenant, secrets: &SecretBox) -> Result<ConnectionProfile, AppError> {
        ConnectionProfile::for_tenant(tenant, self.shared.driver(), &self.settings, secrets)
    }

    pub async fn get_or_connect(&self, profile: &ConnectionProfile) -> Result<DbPool, AppError> {
        let database = profile.database();

        if let Some(pool) = self.pools.read().await.get(database) {
            return Ok(pool.clone());
        }

        let pool = DbPool::connect(profile).await?;

        let mut pools = self.pools.write().await;
        // Another request may have connected while we were.
        if let Some(existing) = pools.get(database) {
            let existing = existing.clone();
            drop(pools);
            pool.close().await;
            return Ok(existing);
        }
        info!(database = %database, "Opened tenant connection pool");
        pools.insert(database.to_string(), pool.clone());
        Ok(pool)
    }

    /// Closes and forgets the cached pool for a database, if any. Called
    /// before deprovisioning so no handle outlives the store.
    pub async fn evict(&self, database: &str) {
        let removed = self.pools.write().await.remove(database);
        if let Some(pool) = removed {
            pool.close().await;
        }
    }
}
