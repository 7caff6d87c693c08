use std::future::Future;
use std::pin::Pin;

use crate::error::GcpError;
use crate::types::{IamPolicy, Pool, Provider, Role, ServiceAccount};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// GCP primitives used by the reconciliation steps.
///
/// `get_*` calls return `Ok(None)` when the resource does not exist. Resource
/// names are fully qualified (see `wif_core::names`). Methods return boxed
/// futures for dyn compatibility.
pub trait GcpApi: Send + Sync {
    fn get_project_iam_policy<'a>(
        &'a self,
        project_id: &'a str,
    ) -> BoxFuture<'a, Result<IamPolicy, GcpError>>;

    fn set_project_iam_policy<'a>(
        &'a self,
        project_id: &'a str,
        policy: &'a IamPolicy,
    ) -> BoxFuture<'a, Result<IamPolicy, GcpError>>;

    fn get_pool<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Option<Pool>, GcpError>>;

    /// `parent` is `projects/{number}/locations/global`.
    fn create_pool<'a>(
        &'a self,
        parent: &'a str,
        pool_id: &'a str,
        pool: &'a Pool,
    ) -> BoxFuture<'a, Result<(), GcpError>>;

    fn undelete_pool<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<(), GcpError>>;

    fn get_provider<'a>(
        &'a self,
        name: &'a str,
    ) -> BoxFuture<'a, Result<Option<Provider>, GcpError>>;

    fn create_provider<'a>(
        &'a self,
        pool_name: &'a str,
        provider_id: &'a str,
        provider: &'a Provider,
    ) -> BoxFuture<'a, Result<(), GcpError>>;

    fn undelete_provider<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<(), GcpError>>;

    fn get_service_account<'a>(
        &'a self,
        name: &'a str,
    ) -> BoxFuture<'a, Result<Option<ServiceAccount>, GcpError>>;

    fn create_service_account<'a>(
        &'a self,
        project_id: &'a str,
        account_id: &'a str,
        account: &'a ServiceAccount,
    ) -> BoxFuture<'a, Result<ServiceAccount, GcpError>>;

    fn get_service_account_iam_policy<'a>(
        &'a self,
        name: &'a str,
    ) -> BoxFuture<'a, Result<IamPolicy, GcpError>>;

    fn set_service_account_iam_policy<'a>(
        &'a self,
        name: &'a str,
        policy: &'a IamPolicy,
    ) -> BoxFuture<'a, Result<IamPolicy, GcpError>>;

    fn get_role<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Option<Role>, GcpError>>;

    fn create_role<'a>(
        &'a self,
        project_id: &'a str,
        role_id: &'a str,
        role: &'a Role,
    ) -> BoxFuture<'a, Result<Role, GcpError>>;

    /// Replace the role's permission set.
    fn update_role_permissions<'a>(
        &'a self,
        name: &'a str,
        permissions: &'a [String],
    ) -> BoxFuture<'a, Result<Role, GcpError>>;

    fn undelete_role<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Role, GcpError>>;
}
