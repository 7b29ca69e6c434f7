use crate::domain::{
    models::tenant::{NewTenant, Tenant, TenantStatus},
    models::user::User,
    ports::TenantRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

pub struct PostgresTenantRepo {
    pool: PgPool,
}

impl PostgresTenantRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TenantRepository for PostgresTenantRepo {
    async fn create_with_owner(
        &self,
        tenant: &NewTenant,
        owner_username: &str,
        owner_password_hash: &str,
    ) -> Result<(Tenant, User), AppError> {
        let mut tx = self.pool.begin().await?;

        let owner = sqlx::query_as::<_, User>(
            "INSERT INTO users (tenant_id, username, password_hash, role, created_at) VALUES (NULL, $1, $2, 'admin', $3) RETURNING *"
        )
            .bind(owner_username)
            .bind(owner_password_hash)
            .bind(tenant.requested_at)
            .fetch_one(&mut *tx)
            .await?;

        let created = sqlx::query_as::<_, Tenant>(
            "INSERT INTO tenants (name, institution_name, institution_address, slug, domain, database_name, status, is_active, owner_user_id, requested_by, requested_at) \
             VALUES ($1, $2, $3, $4, $5, $6, 'pending', FALSE, $7, $7, $8) RETURNING *"
        )
            .bind(&tenant.name)
            .bind(&tenant.institution_name)
            .bind(&tenant.institution_address)
            .bind(&tenant.slug)
            .bind(&tenant.domain)
            .bind(&tenant.database_name)
            .bind(owner.id)
            .bind(tenant.requested_at)
            .fetch_one(&mut *tx)
            .await?;

        let owner = sqlx::query_as::<_, User>(
            "UPDATE users SET tenant_id = $1 WHERE id = $2 RETURNING *"
        )
            .bind(created.id)
            .bind(owner.id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok((created, owner))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Tenant>, AppError> {
        sqlx::query_as::<_, Tenant>("SELECT * FROM tenants WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tenant>, AppError> {
        sqlx::query_as::<_, Tenant>("SELECT * FROM tenants WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_routable_by_slug(&self, slug: &str) -> Result<Option<Tenant>, AppError> {
        sqlx::query_as::<_, Tenant>(
            "SELECT * FROM tenants WHERE slug = $1 AND status = 'approved' AND is_active = TRUE"
        )
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self, status: Option<TenantStatus>) -> Result<Vec<Tenant>, AppError> {
        match status {
            Some(status) => {
                sqlx::query_as::<_, Tenant>(
                    "SELECT * FROM tenants WHERE status = $1 ORDER BY requested_at DESC"
                )
                    .bind(status.as_str())
                    .fetch_all(&self.pool)
                    .await
                    .map_err(AppError::Database)
            }
            None => {
                sqlx::query_as::<_, Tenant>("SELECT * FROM tenants ORDER BY requested_at DESC")
                    .fetch_all(&self.pool)
                    .await
                    .map_err(AppError::Database)
            }
        }
    }

    async fn approve(&self, id: i64, approver_id: i64) -> Result<Tenant, AppError> {
        sqlx::query_as::<_, Tenant>(
            "UPDATE tenants SET status = 'approved', is_active = TRUE, approved_by = $1, approved_at = $2 WHERE id = $3 RETURNING *"
        )
            .bind(approver_id)
            .bind(Utc::now())
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn reject(&self, id: i64, rejecter_id: i64) -> Result<Tenant, AppError> {
        sqlx::query_as::<_, Tenant>(
            "UPDATE tenants SET status = 'rejected', is_active = FALSE, rejected_by = $1, rejected_at = $2 WHERE id = $3 RETURNING *"
        )
            .bind(rejecter_id)
            .bind(Utc::now())
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn set_active(&self, id: i64, active: bool) -> Result<Tenant, AppError> {
        sqlx::query_as::<_, Tenant>(
            "UPDATE tenants SET is_active = $1 WHERE id = $2 RETURNING *"
        )
            .bind(active)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn mark_provisioned(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("UPDATE tenants SET provisioned_at = $1 WHERE id = $2")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(())
    }

    async fn update_db_credentials(
        &self,
        id: i64,
        username: Option<String>,
        encrypted_password: Option<String>,
    ) -> Result<Tenant, AppError> {
        sqlx::query_as::<_, Tenant>(
            "UPDATE tenants SET db_username = $1, db_password = $2 WHERE id = $3 RETURNING *"
        )
            .bind(username)
            .bind(encrypted_password)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_unprovisioned(&self) -> Result<Vec<Tenant>, AppError> {
        sqlx::query_as::<_, Tenant>(
            "SELECT * FROM tenants WHERE status = 'approved' AND provisioned_at IS NULL ORDER BY approved_at"
        )
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
