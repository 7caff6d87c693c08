//! GCP resource naming conventions.
//!
//! Pure string functions, no HTTP dependency. The reconciliation steps and
//! the emitted script both derive every resource name from here, so the two
//! paths always address the same resources.

pub const WORKLOAD_IDENTITY_USER_ROLE: &str = "roles/iam.workloadIdentityUser";
pub const TOKEN_CREATOR_ROLE: &str = "roles/iam.serviceAccountTokenCreator";

pub const POOL_DESCRIPTION: &str = "Created by the OCM CLI";
pub const PROVIDER_DESCRIPTION: &str = "Created by the OCM CLI";
pub const SUBJECT_ATTRIBUTE_MAPPING: &str = "google.subject=assertion.sub";

pub const ROLE_DESCRIPTION: &str = "Created by the OCM CLI";

/// Parent of every workload identity pool in a project.
pub fn location(project_number: i64) -> String {
    format!("projects/{project_number}/locations/global")
}

pub fn pool(project_number: i64, pool_id: &str) -> String {
    format!("{}/workloadIdentityPools/{pool_id}", location(project_number))
}

pub fn provider(project_number: i64, pool_id: &str, provider_id: &str) -> String {
    format!("{}/providers/{provider_id}", pool(project_number, pool_id))
}

pub fn service_account_email(service_account_id: &str, project_id: &str) -> String {
    format!("{service_account_id}@{project_id}.iam.gserviceaccount.com")
}

pub fn service_account(project_id: &str, email: &str) -> String {
    format!("projects/{project_id}/serviceAccounts/{email}")
}

pub fn service_account_member(email: &str) -> String {
    format!("serviceAccount:{email}")
}

/// Fully qualified role name. Custom roles live under the project.
pub fn role(project_id: &str, role_id: &str, predefined: bool) -> String {
    if predefined {
        format!("roles/{role_id}")
    } else {
        format!("projects/{project_id}/roles/{role_id}")
    }
}

/// IAM member for the support principal. Bare emails are treated as groups.
pub fn support_member(principal: &str) -> String {
    if principal.contains(':') {
        principal.to_string()
    } else {
        format!("group:{principal}")
    }
}

/// Federated principal for a Kubernetes service account in the pool.
pub fn federated_principal(
    project_number: i64,
    pool_id: &str,
    namespace: &str,
    k8s_service_account: &str,
) -> String {
    format!(
        "principal://iam.googleapis.com/{}/subject/system:serviceaccount:{namespace}:{k8s_service_account}",
        pool(project_number, pool_id)
    )
}
