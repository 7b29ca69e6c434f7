use std::sync::Arc;
use crate::config::Config;
use crate::domain::ports::{
    AuthRepository, TenantProvisioner, TenantRepository, UserRepository, VehicleRepository,
};
use crate::domain::services::auth_service::AuthService;
use crate::infra::crypto::SecretBox;
use crate::infra::db::pool::TenantPoolManager;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub secrets: SecretBox,
    pub tenant_repo: Arc<dyn TenantRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub auth_repo: Arc<dyn AuthRepository>,
    pub vehicle_repo: Arc<dyn VehicleRepository>,
    pub auth_service: Arc<AuthService>,
    pub pools: Arc<TenantPoolManager>,
    pub provisioner: Arc<dyn TenantProvisioner>,
}
