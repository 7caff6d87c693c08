//! In-memory fakes of the control plane and GCP, recording every call.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use wif_core::models::wif_config::{
    AccessMethod, WifCredentialRequest, WifGcp, WifIdentityProvider, WifPool, WifRole,
    WifSecretRef, WifServiceAccount, WifSupport,
};
use wif_core::{WifConfig, WifConfigUpdate};
use wif_gcp::{BoxFuture, GcpApi, GcpError, IamPolicy, Pool, Provider, Role, ServiceAccount};
use wif_ocm::{ControlPlane, OcmError};

pub const PROJECT_ID: &str = "acme-prod";
pub const PROJECT_NUMBER: &str = "123456789012";

pub fn sample_wif(templates: &[&str]) -> WifConfig {
    WifConfig {
        id: "wif-1".into(),
        display_name: "acme-wif".into(),
        organization: None,
        gcp: WifGcp {
            project_id: PROJECT_ID.into(),
            project_number: PROJECT_NUMBER.into(),
            role_prefix: "acme".into(),
            impersonator_email: "impersonator@osd.example.com".into(),
            workload_identity_pool: WifPool {
                pool_id: "acme-pool".into(),
                identity_provider: WifIdentityProvider {
                    identity_provider_id: "acme-oidc".into(),
                    issuer_url: "https://issuer.example.com/acme".into(),
                    allowed_audiences: vec!["openshift".into()],
                    jwks: r#"{"keys":[{"kid":"k1"}]}"#.into(),
                },
            },
            service_accounts: vec![
                WifServiceAccount {
                    service_account_id: "osd-deployer".into(),
                    access_method: AccessMethod::Impersonate,
                    osd_role: "deployer".into(),
                    roles: vec![WifRole {
                        role_id: "acme_deployer".into(),
                        predefined: false,
                        permissions: vec![
                            "compute.instances.create".into(),
                            "compute.instances.delete".into(),
                        ],
                    }],
                    credential_request: None,
                },
                WifServiceAccount {
                    service_account_id: "cloud-credential".into(),
                    access_method: AccessMethod::Wif,
                    osd_role: "operator".into(),
                    roles: vec![WifRole {
                        role_id: "iam.securityAdmin".into(),
                        predefined: true,
                        permissions: vec![],
                    }],
                    credential_request: Some(WifCredentialRequest {
                        secret_ref: WifSecretRef {
                            name: "cloud-credentials".into(),
                            namespace: "openshift-cloud-credential-operator".into(),
                        },
                        service_accounts: vec!["cloud-credential-operator".into()],
                    }),
                },
            ],
            support: WifSupport {
                principal: "sre-team@example.com".into(),
                roles: vec![WifRole {
                    role_id: "editor".into(),
                    predefined: true,
                    permissions: vec![],
                }],
            },
        },
        wif_templates: templates.iter().map(|t| t.to_string()).collect(),
    }
}

// ── control plane ───────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeControlPlane {
    pub records: Mutex<HashMap<String, WifConfig>>,
    pub calls: Mutex<Vec<String>>,
    pub updates: Mutex<Vec<WifConfigUpdate>>,
    pub fail_update: bool,
}

impl FakeControlPlane {
    pub fn with(wif: WifConfig) -> Self {
        let fake = Self::default();
        fake.records.lock().unwrap().insert(wif.id.clone(), wif);
        fake
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn record(&self, id: &str) -> WifConfig {
        self.records.lock().unwrap()[id].clone()
    }
}

impl ControlPlane for FakeControlPlane {
    fn find<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<WifConfig, OcmError>> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(format!("find:{key}"));
            let records = self.records.lock().unwrap();
            records
                .get(key)
                .or_else(|| records.values().find(|w| w.display_name == key))
                .cloned()
                .ok_or_else(|| OcmError::NotFound {
                    key: key.to_string(),
                })
        })
    }

    fn update<'a>(
        &'a self,
        id: &'a str,
        body: &'a WifConfigUpdate,
    ) -> BoxFuture<'a, Result<WifConfig, OcmError>> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(format!("update:{id}"));
            self.updates.lock().unwrap().push(body.clone());
            if self.fail_update {
                return Err(OcmError::Status {
                    status: 503,
                    body: "unavailable".into(),
                });
            }
            let mut records = self.records.lock().unwrap();
            let record = records.get_mut(id).ok_or_else(|| OcmError::NotFound {
                key: id.to_string(),
            })?;
            if let Some(templates) = body.wif_templates() {
                record.wif_templates = templates.to_vec();
            }
            Ok(record.clone())
        })
    }
}

// ── GCP ─────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeGcp {
    pub project_policy: Mutex<IamPolicy>,
    pub pools: Mutex<HashMap<String, Pool>>,
    pub providers: Mutex<HashMap<String, Provider>>,
    pub service_accounts: Mutex<HashMap<String, ServiceAccount>>,
    pub sa_policies: Mutex<HashMap<String, IamPolicy>>,
    pub roles: Mutex<HashMap<String, Role>>,
    pub calls: Mutex<Vec<String>>,
    /// Any call whose name starts with this prefix fails.
    pub fail_on: Option<&'static str>,
}

impl FakeGcp {
    pub fn failing_on(prefix: &'static str) -> Self {
        Self {
            fail_on: Some(prefix),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_matching(&self, needle: &str) -> usize {
        self.calls().iter().filter(|c| c.contains(needle)).count()
    }

    pub fn writes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| !c.starts_with("get_"))
            .collect()
    }

    fn record(&self, call: &str) -> Result<(), GcpError> {
        self.calls.lock().unwrap().push(call.to_string());
        match self.fail_on {
            Some(prefix) if call.starts_with(prefix) => Err(GcpError::Status {
                operation: call.to_string(),
                status: 500,
                body: "injected failure".into(),
            }),
            _ => Ok(()),
        }
    }
}

impl GcpApi for FakeGcp {
    fn get_project_iam_policy<'a>(
        &'a self,
        _project_id: &'a str,
    ) -> BoxFuture<'a, Result<IamPolicy, GcpError>> {
        Box::pin(async move {
            self.record("get_project_iam_policy")?;
            Ok(self.project_policy.lock().unwrap().clone())
        })
    }

    fn set_project_iam_policy<'a>(
        &'a self,
        _project_id: &'a str,
        policy: &'a IamPolicy,
    ) -> BoxFuture<'a, Result<IamPolicy, GcpError>> {
        Box::pin(async move {
            self.record("set_project_iam_policy")?;
            *self.project_policy.lock().unwrap() = policy.clone();
            Ok(policy.clone())
        })
    }

    fn get_pool<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Option<Pool>, GcpError>> {
        Box::pin(async move {
            self.record("get_pool")?;
            Ok(self.pools.lock().unwrap().get(name).cloned())
        })
    }

    fn create_pool<'a>(
        &'a self,
        parent: &'a str,
        pool_id: &'a str,
        pool: &'a Pool,
    ) -> BoxFuture<'a, Result<(), GcpError>> {
        Box::pin(async move {
            self.record("create_pool")?;
            let name = format!("{parent}/workloadIdentityPools/{pool_id}");
            let mut created = pool.clone();
            created.name = name.clone();
            created.state = wif_gcp::ResourceState::Active;
            self.pools.lock().unwrap().insert(name, created);
            Ok(())
        })
    }

    fn undelete_pool<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<(), GcpError>> {
        Box::pin(async move {
            self.record("undelete_pool")?;
            if let Some(pool) = self.pools.lock().unwrap().get_mut(name) {
                pool.state = wif_gcp::ResourceState::Active;
            }
            Ok(())
        })
    }

    fn get_provider<'a>(
        &'a self,
        name: &'a str,
    ) -> BoxFuture<'a, Result<Option<Provider>, GcpError>> {
        Box::pin(async move {
            self.record("get_provider")?;
            Ok(self.providers.lock().unwrap().get(name).cloned())
        })
    }

    fn create_provider<'a>(
        &'a self,
        pool_name: &'a str,
        provider_id: &'a str,
        provider: &'a Provider,
    ) -> BoxFuture<'a, Result<(), GcpError>> {
        Box::pin(async move {
            self.record("create_provider")?;
            let name = format!("{pool_name}/providers/{provider_id}");
            let mut created = provider.clone();
            created.name = name.clone();
            created.state = wif_gcp::ResourceState::Active;
            self.providers.lock().unwrap().insert(name, created);
            Ok(())
        })
    }

    fn undelete_provider<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<(), GcpError>> {
        Box::pin(async move {
            self.record("undelete_provider")?;
            if let Some(provider) = self.providers.lock().unwrap().get_mut(name) {
                provider.state = wif_gcp::ResourceState::Active;
            }
            Ok(())
        })
    }

    fn get_service_account<'a>(
        &'a self,
        name: &'a str,
    ) -> BoxFuture<'a, Result<Option<ServiceAccount>, GcpError>> {
        Box::pin(async move {
            self.record("get_service_account")?;
            Ok(self.service_accounts.lock().unwrap().get(name).cloned())
        })
    }

    fn create_service_account<'a>(
        &'a self,
        project_id: &'a str,
        account_id: &'a str,
        account: &'a ServiceAccount,
    ) -> BoxFuture<'a, Result<ServiceAccount, GcpError>> {
        Box::pin(async move {
            self.record("create_service_account")?;
            let email = format!("{account_id}@{project_id}.iam.gserviceaccount.com");
            let name = format!("projects/{project_id}/serviceAccounts/{email}");
            let mut created = account.clone();
            created.name = name.clone();
            created.email = email;
            self.service_accounts
                .lock()
                .unwrap()
                .insert(name, created.clone());
            Ok(created)
        })
    }

    fn get_service_account_iam_policy<'a>(
        &'a self,
        name: &'a str,
    ) -> BoxFuture<'a, Result<IamPolicy, GcpError>> {
        Box::pin(async move {
            self.record("get_service_account_iam_policy")?;
            Ok(self
                .sa_policies
                .lock()
                .unwrap()
                .get(name)
                .cloned()
                .unwrap_or_default())
        })
    }

    fn set_service_account_iam_policy<'a>(
        &'a self,
        name: &'a str,
        policy: &'a IamPolicy,
    ) -> BoxFuture<'a, Result<IamPolicy, GcpError>> {
        Box::pin(async move {
            self.record("set_service_account_iam_policy")?;
            self.sa_policies
                .lock()
                .unwrap()
                .insert(name.to_string(), policy.clone());
            Ok(policy.clone())
        })
    }

    fn get_role<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Option<Role>, GcpError>> {
        Box::pin(async move {
            self.record("get_role")?;
            Ok(self.roles.lock().unwrap().get(name).cloned())
        })
    }

    fn create_role<'a>(
        &'a self,
        project_id: &'a str,
        role_id: &'a str,
        role: &'a Role,
    ) -> BoxFuture<'a, Result<Role, GcpError>> {
        Box::pin(async move {
            self.record("create_role")?;
            let name = format!("projects/{project_id}/roles/{role_id}");
            let mut created = role.clone();
            created.name = name.clone();
            self.roles.lock().unwrap().insert(name, created.clone());
            Ok(created)
        })
    }

    fn update_role_permissions<'a>(
        &'a self,
        name: &'a str,
        permissions: &'a [String],
    ) -> BoxFuture<'a, Result<Role, GcpError>> {
        Box::pin(async move {
            self.record("update_role_permissions")?;
            let mut roles = self.roles.lock().unwrap();
            let role = roles.entry(name.to_string()).or_default();
            role.included_permissions = permissions.to_vec();
            Ok(role.clone())
        })
    }

    fn undelete_role<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Role, GcpError>> {
        Box::pin(async move {
            self.record("undelete_role")?;
            let mut roles = self.roles.lock().unwrap();
            let role = roles.entry(name.to_string()).or_default();
            role.deleted = false;
            Ok(role.clone())
        })
    }
}
