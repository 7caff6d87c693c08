use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::api::{BoxFuture, GcpApi};
use crate::error::GcpError;
use crate::types::{IamPolicy, Pool, Provider, Role, ServiceAccount};

pub const IAM_ENDPOINT: &str = "https://iam.googleapis.com/v1";
pub const RESOURCE_MANAGER_ENDPOINT: &str = "https://cloudresourcemanager.googleapis.com/v1";

const IAM_POLICY_VERSION: i32 = 3;

#[derive(Debug, Clone)]
pub struct GcpConfig {
    /// OAuth2 access token, e.g. from `gcloud auth print-access-token`.
    pub access_token: String,
    pub timeout: Duration,
    pub iam_endpoint: String,
    pub resource_manager_endpoint: String,
}

impl GcpConfig {
    pub fn new(access_token: impl Into<String>, timeout: Duration) -> Self {
        Self {
            access_token: access_token.into(),
            timeout,
            iam_endpoint: IAM_ENDPOINT.to_string(),
            resource_manager_endpoint: RESOURCE_MANAGER_ENDPOINT.to_string(),
        }
    }
}

/// REST implementation of [`GcpApi`].
pub struct GcpClient {
    http: reqwest::Client,
    token: String,
    iam: String,
    crm: String,
}

impl GcpClient {
    pub fn new(config: GcpConfig) -> Result<Self, GcpError> {
        if config.access_token.trim().is_empty() {
            return Err(GcpError::Config("GCP access token is empty".into()));
        }
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GcpError::Config(e.to_string()))?;

        Ok(Self {
            http,
            token: config.access_token,
            iam: config.iam_endpoint.trim_end_matches('/').to_string(),
            crm: config.resource_manager_endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Send a request; 404 maps to `Ok(None)`.
    async fn send<B, T>(
        &self,
        operation: &str,
        method: Method,
        url: String,
        body: Option<&B>,
    ) -> Result<Option<T>, GcpError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!(operation, %url, "GCP request");
        let mut req = self.http.request(method, &url).bearer_auth(&self.token);
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GcpError::Status {
                operation: operation.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(Some(resp.json::<T>().await?))
    }

    /// Like [`send`](Self::send) but a 404 is an error.
    async fn send_required<B, T>(
        &self,
        operation: &str,
        method: Method,
        url: String,
        body: Option<&B>,
    ) -> Result<T, GcpError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(operation, method, url, body)
            .await?
            .ok_or_else(|| GcpError::Status {
                operation: operation.to_string(),
                status: StatusCode::NOT_FOUND.as_u16(),
                body: String::new(),
            })
    }
}

impl GcpApi for GcpClient {
    fn get_project_iam_policy<'a>(
        &'a self,
        project_id: &'a str,
    ) -> BoxFuture<'a, Result<IamPolicy, GcpError>> {
        Box::pin(async move {
            let body = json!({"options": {"requestedPolicyVersion": IAM_POLICY_VERSION}});
            self.send_required(
                "projects.getIamPolicy",
                Method::POST,
                format!("{}/projects/{project_id}:getIamPolicy", self.crm),
                Some(&body),
            )
            .await
        })
    }

    fn set_project_iam_policy<'a>(
        &'a self,
        project_id: &'a str,
        policy: &'a IamPolicy,
    ) -> BoxFuture<'a, Result<IamPolicy, GcpError>> {
        Box::pin(async move {
            let mut policy = policy.clone();
            policy.version = Some(IAM_POLICY_VERSION);
            let body = json!({"policy": policy});
            self.send_required(
                "projects.setIamPolicy",
                Method::POST,
                format!("{}/projects/{project_id}:setIamPolicy", self.crm),
                Some(&body),
            )
            .await
        })
    }

    fn get_pool<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Option<Pool>, GcpError>> {
        Box::pin(async move {
            self.send::<(), _>(
                "workloadIdentityPools.get",
                Method::GET,
                format!("{}/{name}", self.iam),
                None,
            )
            .await
        })
    }

    fn create_pool<'a>(
        &'a self,
        parent: &'a str,
        pool_id: &'a str,
        pool: &'a Pool,
    ) -> BoxFuture<'a, Result<(), GcpError>> {
        Box::pin(async move {
            let _: serde_json::Value = self
                .send_required(
                    "workloadIdentityPools.create",
                    Method::POST,
                    format!(
                        "{}/{parent}/workloadIdentityPools?workloadIdentityPoolId={pool_id}",
                        self.iam
                    ),
                    Some(pool),
                )
                .await?;
            Ok(())
        })
    }

    fn undelete_pool<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<(), GcpError>> {
        Box::pin(async move {
            let _: serde_json::Value = self
                .send_required(
                    "workloadIdentityPools.undelete",
                    Method::POST,
                    format!("{}/{name}:undelete", self.iam),
                    Some(&json!({})),
                )
                .await?;
            Ok(())
        })
    }

    fn get_provider<'a>(
        &'a self,
        name: &'a str,
    ) -> BoxFuture<'a, Result<Option<Provider>, GcpError>> {
        Box::pin(async move {
            self.send::<(), _>(
                "workloadIdentityPools.providers.get",
                Method::GET,
                format!("{}/{name}", self.iam),
                None,
            )
            .await
        })
    }

    fn create_provider<'a>(
        &'a self,
        pool_name: &'a str,
        provider_id: &'a str,
        provider: &'a Provider,
    ) -> BoxFuture<'a, Result<(), GcpError>> {
        Box::pin(async move {
            let _: serde_json::Value = self
                .send_required(
                    "workloadIdentityPools.providers.create",
                    Method::POST,
                    format!(
                        "{}/{pool_name}/providers?workloadIdentityPoolProviderId={provider_id}",
                        self.iam
                    ),
                    Some(provider),
                )
                .await?;
            Ok(())
        })
    }

    fn undelete_provider<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<(), GcpError>> {
        Box::pin(async move {
            let _: serde_json::Value = self
                .send_required(
                    "workloadIdentityPools.providers.undelete",
                    Method::POST,
                    format!("{}/{name}:undelete", self.iam),
                    Some(&json!({})),
                )
                .await?;
            Ok(())
        })
    }

    fn get_service_account<'a>(
        &'a self,
        name: &'a str,
    ) -> BoxFuture<'a, Result<Option<ServiceAccount>, GcpError>> {
        Box::pin(async move {
            self.send::<(), _>(
                "serviceAccounts.get",
                Method::GET,
                format!("{}/{name}", self.iam),
                None,
            )
            .await
        })
    }

    fn create_service_account<'a>(
        &'a self,
        project_id: &'a str,
        account_id: &'a str,
        account: &'a ServiceAccount,
    ) -> BoxFuture<'a, Result<ServiceAccount, GcpError>> {
        Box::pin(async move {
            let body = json!({"accountId": account_id, "serviceAccount": account});
            self.send_required(
                "serviceAccounts.create",
                Method::POST,
                format!("{}/projects/{project_id}/serviceAccounts", self.iam),
                Some(&body),
            )
            .await
        })
    }

    fn get_service_account_iam_policy<'a>(
        &'a self,
        name: &'a str,
    ) -> BoxFuture<'a, Result<IamPolicy, GcpError>> {
        Box::pin(async move {
            self.send_required::<(), _>(
                "serviceAccounts.getIamPolicy",
                Method::POST,
                format!("{}/{name}:getIamPolicy", self.iam),
                None,
            )
            .await
        })
    }

    fn set_service_account_iam_policy<'a>(
        &'a self,
        name: &'a str,
        policy: &'a IamPolicy,
    ) -> BoxFuture<'a, Result<IamPolicy, GcpError>> {
        Box::pin(async move {
            let body = json!({"policy": policy});
            self.send_required(
                "serviceAccounts.setIamPolicy",
                Method::POST,
                format!("{}/{name}:setIamPolicy", self.iam),
                Some(&body),
            )
            .await
        })
    }

    fn get_role<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Option<Role>, GcpError>> {
        Box::pin(async move {
            self.send::<(), _>("roles.get", Method::GET, format!("{}/{name}", self.iam), None)
                .await
        })
    }

    fn create_role<'a>(
        &'a self,
        project_id: &'a str,
        role_id: &'a str,
        role: &'a Role,
    ) -> BoxFuture<'a, Result<Role, GcpError>> {
        Box::pin(async move {
            let body = json!({"roleId": role_id, "role": role});
            self.send_required(
                "roles.create",
                Method::POST,
                format!("{}/projects/{project_id}/roles", self.iam),
                Some(&body),
            )
            .await
        })
    }

    fn update_role_permissions<'a>(
        &'a self,
        name: &'a str,
        permissions: &'a [String],
    ) -> BoxFuture<'a, Result<Role, GcpError>> {
        Box::pin(async move {
            let body = json!({"includedPermissions": permissions});
            self.send_required(
                "roles.patch",
                Method::PATCH,
                format!("{}/{name}?updateMask=includedPermissions", self.iam),
                Some(&body),
            )
            .await
        })
    }

    fn undelete_role<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Role, GcpError>> {
        Box::pin(async move {
            self.send_required(
                "roles.undelete",
                Method::POST,
                format!("{}/{name}:undelete", self.iam),
                Some(&json!({})),
            )
            .await
        })
    }
}
