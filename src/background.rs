use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, info_span, Instrument};
use crate::state::AppState;

/// Provisioning repair loop: tenants that are approved but whose store was
/// never initialized (the approval-time attempt failed) are retried until
/// the store exists. Uses the same profile resolution and provisioner as
/// the approval path.
pub async fn start_provision_repair_worker(state: Arc<AppState>) {
    info!("Starting provisioning repair worker...");

    let interval = Duration::from_secs(state.config.provision_retry_secs);

    loop {
        match state.tenant_repo.list_unprovisioned().await {
            Ok(tenants) => {
                for tenant in tenants {
                    let span = info_span!(
                        "provision_repair",
                        tenant = %tenant.slug,
                        database = %tenant.database_name
                    );

                    let state = state.clone();

                    async move {
                        info!("Retrying tenant provisioning");
                        if state.provisioner.provision(&tenant).await {
                            if let Err(e) = state.tenant_repo.mark_provisioned(tenant.id).await {
                                error!("Failed to mark tenant as provisioned: {:?}", e);
                            }
                        }
                    }
                    .instrument(span)
                    .await;
                }
            }
            Err(e) => error!("Failed to fetch unprovisioned tenants: {:?}", e),
        }
        sleep(interval).await;
    }
}
