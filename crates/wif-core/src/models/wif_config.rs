use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A workload identity federation config as returned by the control plane.
///
/// The control plane is authoritative; any value held here is a transient
/// copy that gets replaced by the server's response after an update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WifConfig {
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<WifOrganization>,
    #[serde(default)]
    pub gcp: WifGcp,
    /// Template ids in the order they were attached. Append-only.
    #[serde(default)]
    pub wif_templates: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WifOrganization {
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WifGcp {
    pub project_id: String,
    /// Decimal string. Immutable once set.
    pub project_number: String,
    #[serde(default)]
    pub role_prefix: String,
    #[serde(default)]
    pub impersonator_email: String,
    #[serde(default)]
    pub workload_identity_pool: WifPool,
    #[serde(default)]
    pub service_accounts: Vec<WifServiceAccount>,
    #[serde(default)]
    pub support: WifSupport,
}

impl WifGcp {
    pub fn project_number_i64(&self) -> Result<i64, CoreError> {
        self.project_number
            .trim()
            .parse::<i64>()
            .map_err(|source| CoreError::InvalidProjectNumber {
                value: self.project_number.clone(),
                source,
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WifPool {
    pub pool_id: String,
    #[serde(default)]
    pub identity_provider: WifIdentityProvider,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WifIdentityProvider {
    pub identity_provider_id: String,
    pub issuer_url: String,
    #[serde(default)]
    pub allowed_audiences: Vec<String>,
    /// JSON Web Key Set, serialized as a JSON string.
    #[serde(default)]
    pub jwks: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessMethod {
    /// Cluster components impersonate the account through the impersonator.
    #[default]
    Impersonate,
    /// Kubernetes service accounts federate through the identity pool.
    Wif,
    /// Attached to compute instances.
    Vm,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WifServiceAccount {
    pub service_account_id: String,
    #[serde(default)]
    pub access_method: AccessMethod,
    #[serde(default)]
    pub osd_role: String,
    #[serde(default)]
    pub roles: Vec<WifRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_request: Option<WifCredentialRequest>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WifRole {
    pub role_id: String,
    #[serde(default)]
    pub predefined: bool,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WifCredentialRequest {
    pub secret_ref: WifSecretRef,
    /// Kubernetes service accounts allowed to federate as this account.
    #[serde(default)]
    pub service_accounts: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WifSecretRef {
    pub name: String,
    pub namespace: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WifSupport {
    #[serde(default)]
    pub principal: String,
    #[serde(default)]
    pub roles: Vec<WifRole>,
}
