use wif_core::WifConfig;
use wif_gcp::{BoxFuture, GcpApi};

use crate::error::WifError;
use crate::step::ReconcileStep;
use crate::steps::{ensure_custom_role, target};

/// Bind the support principal to its roles on the project.
pub struct GrantSupportAccess;

impl ReconcileStep for GrantSupportAccess {
    fn name(&self) -> &'static str {
        "grant_support_access"
    }

    fn description(&self) -> &'static str {
        "grant support access to project"
    }

    fn apply<'a>(
        &'a self,
        wif: &'a WifConfig,
        gcp: &'a dyn GcpApi,
    ) -> BoxFuture<'a, Result<(), WifError>> {
        Box::pin(async move {
            let target = target(wif)?;
            let project_id = target.project_id.as_str();
            let Some(support) = &target.support else {
                tracing::info!(project = %project_id, "no support access declared");
                return Ok(());
            };

            for role in target
                .custom_roles()
                .iter()
                .filter(|r| support.roles.iter().any(|s| s.role_id == r.role_id))
            {
                ensure_custom_role(gcp, project_id, role).await?;
            }

            let mut policy = gcp
                .get_project_iam_policy(project_id)
                .await
                .map_err(WifError::gcp("projects.getIamPolicy"))?;

            let mut changed = false;
            for role in &support.roles {
                changed |= policy.add_binding(&role.name, &support.member);
            }

            if changed {
                gcp.set_project_iam_policy(project_id, &policy)
                    .await
                    .map_err(WifError::gcp("projects.setIamPolicy"))?;
                tracing::info!(project = %project_id, member = %support.member, "support access granted");
            } else {
                tracing::info!(project = %project_id, member = %support.member, "support access already granted");
            }
            Ok(())
        })
    }
}
