//! The cloud-side resources implied by a wif-config.
//!
//! Never stored. Both the reconciliation steps and the script emitter derive
//! it from the same record, so the two paths always address the same
//! resources with the same bindings.

use std::collections::BTreeMap;

use crate::error::CoreError;
use crate::models::wif_config::{AccessMethod, WifConfig, WifRole, WifServiceAccount};
use crate::names;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationTarget {
    pub project_id: String,
    pub project_number: i64,
    pub pool_id: String,
    /// Fully qualified pool name.
    pub pool_name: String,
    pub provider_id: String,
    /// Fully qualified provider name.
    pub provider_name: String,
    pub issuer_url: String,
    pub allowed_audiences: Vec<String>,
    pub jwks: String,
    /// `None` when the record declares no support principal or roles.
    pub support: Option<SupportTarget>,
    pub service_accounts: Vec<ServiceAccountTarget>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleTarget {
    pub role_id: String,
    /// `roles/...` or `projects/{id}/roles/...`.
    pub name: String,
    pub predefined: bool,
    /// Sorted, deduplicated.
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportTarget {
    pub member: String,
    pub roles: Vec<RoleTarget>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceAccountTarget {
    pub account_id: String,
    pub email: String,
    /// `projects/{id}/serviceAccounts/{email}`.
    pub name: String,
    /// `serviceAccount:{email}`.
    pub member: String,
    pub description: String,
    pub roles: Vec<RoleTarget>,
    pub access: Option<AccessBinding>,
}

/// Who may act as a service account, and through which role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessBinding {
    pub role: &'static str,
    pub members: Vec<String>,
}

impl ReconciliationTarget {
    pub fn from_config(wif: &WifConfig) -> Result<Self, CoreError> {
        Ok(Self::for_project_number(wif, wif.gcp.project_number_i64()?))
    }

    /// Derive the target using an already parsed project number.
    pub fn for_project_number(wif: &WifConfig, project_number: i64) -> Self {
        let gcp = &wif.gcp;
        let pool = &gcp.workload_identity_pool;
        let idp = &pool.identity_provider;

        let support = (!gcp.support.principal.is_empty() && !gcp.support.roles.is_empty())
            .then(|| SupportTarget {
                member: names::support_member(&gcp.support.principal),
                roles: role_targets(&gcp.project_id, &gcp.support.roles),
            });

        let service_accounts = gcp
            .service_accounts
            .iter()
            .map(|sa| service_account_target(wif, project_number, sa))
            .collect();

        Self {
            project_id: gcp.project_id.clone(),
            project_number,
            pool_id: pool.pool_id.clone(),
            pool_name: names::pool(project_number, &pool.pool_id),
            provider_id: idp.identity_provider_id.clone(),
            provider_name: names::provider(project_number, &pool.pool_id, &idp.identity_provider_id),
            issuer_url: idp.issuer_url.clone(),
            allowed_audiences: idp.allowed_audiences.clone(),
            jwks: idp.jwks.clone(),
            support,
            service_accounts,
        }
    }

    pub fn location(&self) -> String {
        names::location(self.project_number)
    }

    /// Every custom role the record declares, merged by id and sorted.
    pub fn custom_roles(&self) -> Vec<RoleTarget> {
        let mut merged: BTreeMap<&str, RoleTarget> = BTreeMap::new();
        let all = self
            .support
            .iter()
            .flat_map(|s| s.roles.iter())
            .chain(self.service_accounts.iter().flat_map(|sa| sa.roles.iter()));

        for role in all.filter(|r| !r.predefined) {
            merged
                .entry(role.role_id.as_str())
                .and_modify(|existing| {
                    existing.permissions.extend(role.permissions.iter().cloned());
                    existing.permissions.sort();
                    existing.permissions.dedup();
                })
                .or_insert_with(|| role.clone());
        }
        merged.into_values().collect()
    }
}

fn role_targets(project_id: &str, roles: &[WifRole]) -> Vec<RoleTarget> {
    roles
        .iter()
        .map(|role| {
            let mut permissions = role.permissions.clone();
            permissions.sort();
            permissions.dedup();
            RoleTarget {
                role_id: role.role_id.clone(),
                name: names::role(project_id, &role.role_id, role.predefined),
                predefined: role.predefined,
                permissions,
            }
        })
        .collect()
}

fn service_account_target(
    wif: &WifConfig,
    project_number: i64,
    sa: &WifServiceAccount,
) -> ServiceAccountTarget {
    let gcp = &wif.gcp;
    let email = names::service_account_email(&sa.service_account_id, &gcp.project_id);

    let access = match (sa.access_method, &sa.credential_request) {
        (AccessMethod::Wif, Some(request)) if !request.service_accounts.is_empty() => {
            Some(AccessBinding {
                role: names::WORKLOAD_IDENTITY_USER_ROLE,
                members: request
                    .service_accounts
                    .iter()
                    .map(|k8s_sa| {
                        names::federated_principal(
                            project_number,
                            &gcp.workload_identity_pool.pool_id,
                            &request.secret_ref.namespace,
                            k8s_sa,
                        )
                    })
                    .collect(),
            })
        }
        (AccessMethod::Impersonate, _) if !gcp.impersonator_email.is_empty() => {
            Some(AccessBinding {
                role: names::TOKEN_CREATOR_ROLE,
                members: vec![names::service_account_member(&gcp.impersonator_email)],
            })
        }
        _ => None,
    };

    ServiceAccountTarget {
        account_id: sa.service_account_id.clone(),
        name: names::service_account(&gcp.project_id, &email),
        member: names::service_account_member(&email),
        description: format!("Created by the OCM CLI for wif-config {}", wif.display_name),
        email,
        roles: role_targets(&gcp.project_id, &sa.roles),
        access,
    }
}
