use std::env;

/// Defaults for reaching tenant databases. Individual tenants may override
/// host/port/username/password in their registry row.
#[derive(Clone)]
pub struct TenantDbSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Directory holding per-tenant database files when running on SQLite.
    pub data_dir: String,
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Appended to a tenant slug to form its routing domain, e.g. ".parkify.test".
    pub domain_suffix: String,
    /// Hosts (including any :port) served without a tenant binding.
    pub main_domains: Vec<String>,
    /// Prepended to the slug to form the tenant database name.
    pub db_name_prefix: String,
    pub tenant_db: TenantDbSettings,
    /// AES-256 key for tenant DB credentials at rest (64 hex chars).
    pub secret_key: [u8; 32],
    pub jwt_secret_key: String, // Private key (PEM)
    pub jwt_public_key: String, // Public key (PEM)
    pub auth_issuer: String,
    pub superadmin_username: String,
    pub superadmin_password: String,
    pub provision_retry_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        let secret_hex = env::var("SECRET_KEY").expect("SECRET_KEY must be set (64 hex chars)");
        let secret_bytes = hex::decode(&secret_hex).expect("SECRET_KEY must be valid hex");
        let secret_key: [u8; 32] = secret_bytes
            .try_into()
            .expect("SECRET_KEY must decode to exactly 32 bytes");

        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            domain_suffix: env::var("DOMAIN_SUFFIX").unwrap_or_else(|_| ".parkify.test".to_string()),
            main_domains: env::var("MAIN_DOMAINS")
                .unwrap_or_else(|_| "parkify.test,localhost:3000".to_string())
                .split(',')
                .map(|d| d.trim().to_ascii_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
            db_name_prefix: env::var("DB_NAME_PREFIX").unwrap_or_else(|_| "parkify_".to_string()),
            tenant_db: TenantDbSettings {
                host: env::var("TENANT_DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
                port: env::var("TENANT_DB_PORT").unwrap_or_else(|_| "5432".to_string()).parse().expect("TENANT_DB_PORT must be a number"),
                username: env::var("TENANT_DB_USERNAME").unwrap_or_else(|_| "parkify".to_string()),
                password: env::var("TENANT_DB_PASSWORD").unwrap_or_default(),
                data_dir: env::var("TENANT_DATA_DIR").unwrap_or_else(|_| "./data".to_string()),
            },
            secret_key,
            jwt_secret_key: env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set (Ed25519 Private Key)"),
            jwt_public_key: env::var("JWT_PUBLIC_KEY").expect("JWT_PUBLIC_KEY must be set (Ed25519 Public Key)"),
            auth_issuer: env::var("AUTH_ISSUER").unwrap_or_else(|_| "https://api.parkify.local".to_string()),
            superadmin_username: env::var("SUPERADMIN_USERNAME").unwrap_or_else(|_| "superadmin".to_string()),
            superadmin_password: env::var("SUPERADMIN_PASSWORD").expect("SUPERADMIN_PASSWORD must be set"),
            provision_retry_secs: env::var("PROVISION_RETRY_SECS").unwrap_or_else(|_| "60".to_string()).parse().expect("PROVISION_RETRY_SECS must be a number"),
        }
    }
}
