use wif_core::{WifConfig, format_err_chain};
use wif_gcp::GcpApi;

use crate::error::WifError;
use crate::step::ReconcileStep;

/// Apply `steps` in order, stopping at the first failure.
///
/// Steps before the failing one stay applied; steps after it are never
/// attempted. Returns the names of the applied steps.
pub async fn reconcile(
    wif: &WifConfig,
    gcp: &dyn GcpApi,
    steps: &[Box<dyn ReconcileStep>],
) -> Result<Vec<&'static str>, WifError> {
    let mut applied = Vec::with_capacity(steps.len());

    for step in steps {
        tracing::info!(step = step.name(), wif_config = %wif.id, "applying step");
        step.apply(wif, gcp).await.map_err(|e| {
            tracing::error!(step = step.name(), error = %format_err_chain(&e), "step failed");
            WifError::Step {
                step: step.name(),
                description: step.description(),
                source: Box::new(e),
            }
        })?;
        applied.push(step.name());
    }

    tracing::info!(steps = applied.len(), "reconciliation complete");
    Ok(applied)
}
