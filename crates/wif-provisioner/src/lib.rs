//! wif-provisioner
//!
//! Update-and-reconcile pass for workload identity federation configs.
//!
//! Public API:
//! - `run()`: find → merge → persist → (script | reconcile)
//! - `update::update()`: merge a version's template into the record and persist it
//! - `script::emit()`: write a re-runnable `gcloud` script for manual mode
//! - `reconcile::reconcile()`: apply the ordered, idempotent steps in auto mode
//! - `dispatch::dispatch()`: pick exactly one of the two terminal paths

pub mod dispatch;
pub mod error;
pub mod reconcile;
pub mod script;
pub mod step;
pub mod steps;
pub mod update;

use wif_core::{Mode, UpdateOptions};
use wif_gcp::GcpApi;
use wif_ocm::ControlPlane;

pub use crate::dispatch::{Outcome, dispatch};
pub use crate::error::{ErrorKind, WifError};
pub use crate::reconcile::reconcile;
pub use crate::step::ReconcileStep;

/// One full update pass for `opts.key`.
///
/// The record is persisted before the cloud side is touched. If the pass
/// dies in between, re-running it is safe: the merge skips templates that
/// are already attached and every reconciliation step is idempotent.
pub async fn run(
    opts: &UpdateOptions,
    control_plane: &dyn ControlPlane,
    gcp: Option<&dyn GcpApi>,
) -> Result<Outcome, WifError> {
    if opts.mode == Mode::Auto && gcp.is_none() {
        return Err(WifError::MissingCloudClient);
    }

    let existing = control_plane
        .find(&opts.key)
        .await
        .map_err(|source| WifError::Lookup {
            key: opts.key.clone(),
            source,
        })?;
    tracing::info!(id = %existing.id, name = %existing.display_name, "wif-config found");

    let updated = update::update(control_plane, &existing, opts.version.as_deref()).await?;

    dispatch(opts.mode, &updated, &opts.target_dir, gcp).await
}
