use std::collections::BTreeMap;

use wif_core::{ReconciliationTarget, WifConfig, names};
use wif_gcp::types::Oidc;
use wif_gcp::{BoxFuture, GcpApi, Provider, ResourceState};

use crate::error::WifError;
use crate::step::ReconcileStep;
use crate::steps::target;

/// Ensure the OIDC provider exists under the pool. Requires the pool.
pub struct CreateWorkloadIdentityProvider;

impl CreateWorkloadIdentityProvider {
    fn desired(target: &ReconciliationTarget) -> Provider {
        let attribute_mapping = names::SUBJECT_ATTRIBUTE_MAPPING
            .split_once('=')
            .map(|(k, v)| BTreeMap::from([(k.to_string(), v.to_string())]))
            .unwrap_or_default();

        Provider {
            display_name: target.provider_id.clone(),
            description: names::PROVIDER_DESCRIPTION.to_string(),
            attribute_mapping,
            oidc: Oidc {
                issuer_uri: target.issuer_url.clone(),
                allowed_audiences: target.allowed_audiences.clone(),
                jwks_json: target.jwks.clone(),
            },
            ..Default::default()
        }
    }
}

impl ReconcileStep for CreateWorkloadIdentityProvider {
    fn name(&self) -> &'static str {
        "create_workload_identity_provider"
    }

    fn description(&self) -> &'static str {
        "update workload identity provider"
    }

    fn apply<'a>(
        &'a self,
        wif: &'a WifConfig,
        gcp: &'a dyn GcpApi,
    ) -> BoxFuture<'a, Result<(), WifError>> {
        Box::pin(async move {
            let target = target(wif)?;
            let name = target.provider_name.as_str();

            match gcp
                .get_provider(name)
                .await
                .map_err(WifError::gcp("workloadIdentityPools.providers.get"))?
            {
                None => {
                    gcp.create_provider(&target.pool_name, &target.provider_id, &Self::desired(&target))
                        .await
                        .map_err(WifError::gcp("workloadIdentityPools.providers.create"))?;
                    tracing::info!(provider = %name, "workload identity provider created");
                }
                Some(existing) if existing.state == ResourceState::Deleted => {
                    gcp.undelete_provider(name)
                        .await
                        .map_err(WifError::gcp("workloadIdentityPools.providers.undelete"))?;
                    tracing::info!(provider = %name, "workload identity provider undeleted");
                }
                Some(_) => {
                    tracing::info!(provider = %name, "workload identity provider already exists");
                }
            }
            Ok(())
        })
    }
}
