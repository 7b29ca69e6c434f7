use std::sync::Arc;

use crate::domain::ports::{ActivityLogRepository, AreaRepository, ParkingRepository};
use crate::infra::db::pool::DbPool;

pub mod sqlite_tenant_repo;
pub mod sqlite_user_repo;
pub mod sqlite_auth_repo;
pub mod sqlite_vehicle_repo;
pub mod sqlite_area_repo;
pub mod sqlite_parking_repo;
pub mod sqlite_activity_repo;

pub mod postgres_tenant_repo;
pub mod postgres_user_repo;
pub mod postgres_auth_repo;
pub mod postgres_vehicle_repo;
pub mod postgres_area_repo;
pub mod postgres_parking_repo;
pub mod postgres_activity_repo;

// Tenant-scoped repositories are built per request over the connection
// handle the resolution middleware bound. Which backend they talk to is
// decided by the handle, never by ambient state.

pub fn area_repo(db: &DbPool) -> Arc<dyn AreaRepository> {
    match db {
        DbPool::Postgres(pool) => Arc::new(postgres_area_repo::PostgresAreaRepo::new(pool.clone())),
        DbPool::Sqlite(pool) => Arc::new(sqlite_area_repo::SqliteAreaRepo::new(pool.clone())),
    }
}

pub fn parking_repo(db: &DbPool) -> Arc<dyn ParkingRepository> {
    match db {
        DbPool::Postgres(pool) => Arc::new(postgres_parking_repo::PostgresParkingRepo::new(pool.clone())),
        DbPool::Sqlite(pool) => Arc::new(sqlite_parking_repo::SqliteParkingRepo::new(pool.clone())),
    }
}

pub fn activity_repo(db: &DbPool) -> Arc<dyn ActivityLogRepository> {
    match db {
        DbPool::Postgres(pool) => Arc::new(postgres_activity_repo::PostgresActivityRepo::new(pool.clone())),
        DbPool::Sqlite(pool) => Arc::new(sqlite_activity_repo::SqliteActivityRepo::new(pool.clone())),
    }
}
