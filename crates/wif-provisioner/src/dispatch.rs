use std::path::{Path, PathBuf};

use wif_core::{Mode, WifConfig};
use wif_gcp::GcpApi;

use crate::error::WifError;
use crate::reconcile::reconcile;
use crate::script;
use crate::steps;

/// What the terminal path of an update pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Manual mode: files an operator runs later.
    ScriptsWritten { paths: Vec<PathBuf> },
    /// Auto mode: the reconciliation steps that were applied, in order.
    Reconciled { steps: Vec<&'static str> },
}

/// Run exactly one terminal path for the already-persisted record.
///
/// Manual mode never touches `gcp`; auto mode never writes files.
pub async fn dispatch(
    mode: Mode,
    updated: &WifConfig,
    target_dir: &Path,
    gcp: Option<&dyn GcpApi>,
) -> Result<Outcome, WifError> {
    match mode {
        Mode::Manual => {
            tracing::info!(dir = %target_dir.display(), "writing script files");
            let paths = script::emit_for(updated, target_dir)?;
            Ok(Outcome::ScriptsWritten { paths })
        }
        Mode::Auto => {
            let gcp = gcp.ok_or(WifError::MissingCloudClient)?;
            let steps = reconcile(updated, gcp, &steps::pipeline()).await?;
            Ok(Outcome::Reconciled { steps })
        }
    }
}
