use wif_core::{WifConfig, names};
use wif_gcp::{BoxFuture, GcpApi, Pool, ResourceState};

use crate::error::WifError;
use crate::step::ReconcileStep;
use crate::steps::target;

/// Ensure the workload identity pool exists. An existing pool is left as-is;
/// a soft-deleted one is restored.
pub struct CreateWorkloadIdentityPool;

impl ReconcileStep for CreateWorkloadIdentityPool {
    fn name(&self) -> &'static str {
        "create_workload_identity_pool"
    }

    fn description(&self) -> &'static str {
        "update workload identity pool"
    }

    fn apply<'a>(
        &'a self,
        wif: &'a WifConfig,
        gcp: &'a dyn GcpApi,
    ) -> BoxFuture<'a, Result<(), WifError>> {
        Box::pin(async move {
            let target = target(wif)?;
            let name = target.pool_name.as_str();

            match gcp
                .get_pool(name)
                .await
                .map_err(WifError::gcp("workloadIdentityPools.get"))?
            {
                None => {
                    let pool = Pool {
                        display_name: target.pool_id.clone(),
                        description: names::POOL_DESCRIPTION.to_string(),
                        ..Default::default()
                    };
                    gcp.create_pool(&target.location(), &target.pool_id, &pool)
                        .await
                        .map_err(WifError::gcp("workloadIdentityPools.create"))?;
                    tracing::info!(pool = %name, "workload identity pool created");
                }
                Some(existing) if existing.state == ResourceState::Deleted => {
                    gcp.undelete_pool(name)
                        .await
                        .map_err(WifError::gcp("workloadIdentityPools.undelete"))?;
                    tracing::info!(pool = %name, "workload identity pool undeleted");
                }
                Some(_) => {
                    tracing::info!(pool = %name, "workload identity pool already exists");
                }
            }
            Ok(())
        })
    }
}
