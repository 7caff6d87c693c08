use wif_core::WifConfig;
use wif_core::target::ServiceAccountTarget;
use wif_gcp::{BoxFuture, GcpApi, ServiceAccount};

use crate::error::WifError;
use crate::step::ReconcileStep;
use crate::steps::{ensure_custom_role, target};

/// Ensure every declared service account exists, holds its roles on the
/// project, and can be reached through its access method. Requires the
/// pool and provider.
pub struct CreateServiceAccounts;

impl CreateServiceAccounts {
    async fn ensure_account(
        gcp: &dyn GcpApi,
        project_id: &str,
        sa: &ServiceAccountTarget,
    ) -> Result<(), WifError> {
        let existing = gcp
            .get_service_account(&sa.name)
            .await
            .map_err(WifError::gcp("serviceAccounts.get"))?;
        if existing.is_some() {
            tracing::debug!(service_account = %sa.email, "service account already exists");
            return Ok(());
        }

        let account = ServiceAccount {
            display_name: sa.account_id.clone(),
            description: sa.description.clone(),
            ..Default::default()
        };
        gcp.create_service_account(project_id, &sa.account_id, &account)
            .await
            .map_err(WifError::gcp("serviceAccounts.create"))?;
        tracing::info!(service_account = %sa.email, "service account created");
        Ok(())
    }

    async fn ensure_access(gcp: &dyn GcpApi, sa: &ServiceAccountTarget) -> Result<(), WifError> {
        let Some(access) = &sa.access else {
            return Ok(());
        };

        let mut policy = gcp
            .get_service_account_iam_policy(&sa.name)
            .await
            .map_err(WifError::gcp("serviceAccounts.getIamPolicy"))?;
        let mut changed = false;
        for member in &access.members {
            changed |= policy.add_binding(access.role, member);
        }
        if changed {
            gcp.set_service_account_iam_policy(&sa.name, &policy)
                .await
                .map_err(WifError::gcp("serviceAccounts.setIamPolicy"))?;
            tracing::info!(service_account = %sa.email, role = access.role, "access binding updated");
        }
        Ok(())
    }
}

impl ReconcileStep for CreateServiceAccounts {
    fn name(&self) -> &'static str {
        "create_service_accounts"
    }

    fn description(&self) -> &'static str {
        "update IAM service accounts"
    }

    fn apply<'a>(
        &'a self,
        wif: &'a WifConfig,
        gcp: &'a dyn GcpApi,
    ) -> BoxFuture<'a, Result<(), WifError>> {
        Box::pin(async move {
            let target = target(wif)?;
            let project_id = target.project_id.as_str();

            // Accounts and custom roles must exist before anything binds them.
            for sa in &target.service_accounts {
                Self::ensure_account(gcp, project_id, sa).await?;
            }
            for role in target.custom_roles().iter().filter(|r| {
                target
                    .service_accounts
                    .iter()
                    .any(|sa| sa.roles.iter().any(|s| s.role_id == r.role_id))
            }) {
                ensure_custom_role(gcp, project_id, role).await?;
            }

            let mut policy = gcp
                .get_project_iam_policy(project_id)
                .await
                .map_err(WifError::gcp("projects.getIamPolicy"))?;
            let mut changed = false;
            for sa in &target.service_accounts {
                for role in &sa.roles {
                    changed |= policy.add_binding(&role.name, &sa.member);
                }
            }
            if changed {
                gcp.set_project_iam_policy(project_id, &policy)
                    .await
                    .map_err(WifError::gcp("projects.setIamPolicy"))?;
                tracing::info!(project = %project_id, "service account role bindings updated");
            }

            for sa in &target.service_accounts {
                Self::ensure_access(gcp, sa).await?;
            }
            Ok(())
        })
    }
}
