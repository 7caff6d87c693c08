//! The four reconciliation steps, in the order they must run.
//!
//! Each later step depends on the earlier ones: the provider lives under
//! the pool, and service-account federation bindings name the pool.

pub mod service_accounts;
pub mod support_access;
pub mod workload_identity_pool;
pub mod workload_identity_provider;

use wif_core::target::RoleTarget;
use wif_core::{ReconciliationTarget, WifConfig, names};
use wif_gcp::{GcpApi, Role};

use crate::error::WifError;
use crate::step::ReconcileStep;

pub use self::service_accounts::CreateServiceAccounts;
pub use self::support_access::GrantSupportAccess;
pub use self::workload_identity_pool::CreateWorkloadIdentityPool;
pub use self::workload_identity_provider::CreateWorkloadIdentityProvider;

/// The fixed reconciliation pipeline.
pub fn pipeline() -> Vec<Box<dyn ReconcileStep>> {
    vec![
        Box::new(GrantSupportAccess),
        Box::new(CreateWorkloadIdentityPool),
        Box::new(CreateWorkloadIdentityProvider),
        Box::new(CreateServiceAccounts),
    ]
}

pub(crate) fn target(wif: &WifConfig) -> Result<ReconciliationTarget, WifError> {
    ReconciliationTarget::from_config(wif).map_err(WifError::InvalidProjectNumber)
}

/// Make sure a custom role exists, is not soft-deleted, and carries exactly
/// the declared permissions.
pub(crate) async fn ensure_custom_role(
    gcp: &dyn GcpApi,
    project_id: &str,
    role: &RoleTarget,
) -> Result<(), WifError> {
    let name = role.name.as_str();

    let Some(mut existing) = gcp
        .get_role(name)
        .await
        .map_err(WifError::gcp("roles.get"))?
    else {
        let new_role = Role {
            title: role.role_id.clone(),
            description: names::ROLE_DESCRIPTION.to_string(),
            included_permissions: role.permissions.clone(),
            stage: Some("GA".into()),
            ..Default::default()
        };
        gcp.create_role(project_id, &role.role_id, &new_role)
            .await
            .map_err(WifError::gcp("roles.create"))?;
        tracing::info!(role = %name, "custom role created");
        return Ok(());
    };

    if existing.deleted {
        existing = gcp
            .undelete_role(name)
            .await
            .map_err(WifError::gcp("roles.undelete"))?;
        tracing::info!(role = %name, "custom role undeleted");
    }

    let mut current = existing.included_permissions;
    current.sort();
    current.dedup();
    if current != role.permissions {
        gcp.update_role_permissions(name, &role.permissions)
            .await
            .map_err(WifError::gcp("roles.patch"))?;
        tracing::info!(role = %name, permissions = role.permissions.len(), "custom role permissions updated");
    }
    Ok(())
}
