use wif_core::WifConfig;
use wif_gcp::{BoxFuture, GcpApi};

use crate::error::WifError;

/// One idempotent reconciliation step.
///
/// Steps derive everything they touch from the wif-config, read current
/// state from GCP, and only write what is missing. Re-running a step after
/// a partial or complete earlier run is always safe.
pub trait ReconcileStep: Send + Sync {
    /// e.g. "create_workload_identity_pool"
    fn name(&self) -> &'static str;

    /// Completes "failed to ...", e.g. "update workload identity pool".
    fn description(&self) -> &'static str;

    fn apply<'a>(
        &'a self,
        wif: &'a WifConfig,
        gcp: &'a dyn GcpApi,
    ) -> BoxFuture<'a, Result<(), WifError>>;
}
