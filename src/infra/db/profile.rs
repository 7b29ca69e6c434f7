use std::path::PathBuf;

use crate::config::TenantDbSettings;
use crate::domain::models::tenant::Tenant;
use crate::error::AppError;
use crate::infra::crypto::SecretBox;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbDriver {
    Postgres,
    Sqlite,
}

/// Everything needed to reach one tenant's isolated store. Computed on
/// demand from the registry row; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionProfile {
    Postgres {
        host: String,
        port: u16,
        database: String,
        username: String,
        password: String,
    },
    Sqlite {
        path: PathBuf,
        database: String,
    },
}

impl ConnectionProfile {
    /// Pure resolution of a tenant row into a connection profile. Tenant
    /// rows may override host/port/username; the password is decrypted
    /// from the registry and falls back to the system default credential
    /// when unset or empty (deployments where all tenant databases share
    /// one server login and differ only by database name).
    pub fn for_tenant(
        tenant: &Tenant,
        driver: DbDriver,
        settings: &TenantDbSettings,
        secrets: &SecretBox,
    ) -> Result<Self, AppError> {
        match driver {
            DbDriver::Postgres => {
                let password = match tenant.db_password.as_deref() {
                    Some(encrypted) if !encrypted.is_empty() => secrets.decrypt(encrypted)?,
                    _ => settings.password.clone(),
                };
                Ok(ConnectionProfile::Postgres {
                    host: tenant.db_host.clone().unwrap_or_else(|| settings.host.clone()),
                    port: tenant.db_port.map(|p| p as u16).unwrap_or(settings.port),
                    database: tenant.database_name.clone(),
                    username: tenant
                        .db_username
                        .clone()
                        .unwrap_or_else(|| settings.username.clone()),
                    password,
                })
            }
            DbDriver::Sqlite => Ok(ConnectionProfile::Sqlite {
                path: PathBuf::from(&settings.data_dir)
                    .join(format!("{}.db", tenant.database_name)),
                database: tenant.database_name.clone(),
            }),
        }
    }

    pub fn database(&self) -> &str {
        match self {
            ConnectionProfile::Postgres { database, .. } => database,
            ConnectionProfile::Sqlite { database, .. } => database,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::tenant::TenantStatus;
    use chrono::Utc;

    fn settings() -> TenantDbSettings {
        TenantDbSettings {
            host: "db.internal".into(),
            port: 5432,
            username: "parkify".into(),
            password: "default-secret".into(),
            data_dir: "/var/lib/parkify".into(),
        }
    }

    fn tenant() -> Tenant {
        Tenant {
            id: 7,
            name: "Kampus Satu".into(),
            institution_name: "Universitas Satu".into(),
            institution_address: None,
            slug: "kampus1".into(),
            domain: "kampus1.parkify.test".into(),
            database_name: "parkify_kampus1".into(),
            db_host: None,
            db_port: None,
            db_username: None,
            db_password: None,
            status: TenantStatus::Approved,
            is_active: true,
            owner_user_id: 1,
            requested_by: 1,
            approved_by: Some(2),
            rejected_by: None,
            requested_at: Utc::now(),
            approved_at: Some(Utc::now()),
            rejected_at: None,
            provisioned_at: None,
        }
    }

    #[test]
    fn falls_back_to_default_credential() {
        let secrets = SecretBox::new([1u8; 32]);
        let profile =
            ConnectionProfile::for_tenant(&tenant(), DbDriver::Postgres, &settings(), &secrets)
                .unwrap();
        match profile {
            ConnectionProfile::Postgres { host, port, database, username, password } => {
                assert_eq!(host, "db.internal");
                assert_eq!(port, 5432);
                assert_eq!(database, "parkify_kampus1");
                assert_eq!(username, "parkify");
                assert_eq!(password, "default-secret");
            }
            other => panic!("unexpected profile: {:?}", other),
        }
    }

    #[test]
    fn tenant_overrides_win() {
        let secrets = SecretBox::new([1u8; 32]);
        let mut t = tenant();
        t.db_host = Some("tenant-db.internal".into());
        t.db_port = Some(5433);
        t.db_username = Some("kampus1_login".into());
        t.db_password = Some(secrets.encrypt("kampus1-secret").unwrap());

        let profile =
            ConnectionProfile::for_tenant(&t, DbDriver::Postgres, &settings(), &secrets).unwrap();
        match profile {
            ConnectionProfile::Postgres { host, port, username, password, .. } => {
                assert_eq!(host, "tenant-db.internal");
                assert_eq!(port, 5433);
                assert_eq!(username, "kampus1_login");
                assert_eq!(password, "kampus1-secret");
            }
            other => panic!("unexpected profile: {:?}", other),
        }
    }

    #[test]
    fn sqlite_profile_is_a_file_under_the_data_dir() {
        let secrets = SecretBox::new([1u8; 32]);
        let profile =
            ConnectionProfile::for_tenant(&tenant(), DbDriver::Sqlite, &settings(), &secrets)
                .unwrap();
        match profile {
            ConnectionProfile::Sqlite { path, database } => {
                assert_eq!(database, "parkify_kampus1");
                assert_eq!(path, PathBuf::from("/var/lib/parkify/parkify_kampus1.db"));
            }
            other => panic!("unexpected profile: {:?}", other),
        }
    }
}
