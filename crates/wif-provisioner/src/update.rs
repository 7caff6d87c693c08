use wif_core::{TemplateId, WifConfig, WifConfigUpdate};
use wif_ocm::ControlPlane;

use crate::error::WifError;

/// Compute the update body for moving `existing` to `new_version`.
///
/// No version, or a blank one, → empty body. Otherwise the resolved template is appended to
/// the existing collection unless it is already there. The body always
/// carries the full resulting collection.
pub fn build_update(
    existing: &WifConfig,
    new_version: Option<&str>,
) -> Result<WifConfigUpdate, WifError> {
    let Some(version) = new_version.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(WifConfigUpdate::empty());
    };

    let template = TemplateId::for_version(version);
    let mut templates = existing.wif_templates.clone();
    if templates.iter().any(|t| t == template.as_str()) {
        tracing::info!(template = %template, "template already attached, not appending");
    } else {
        templates.push(template.into_string());
    }

    WifConfigUpdate::try_new(templates).map_err(WifError::InvalidPayload)
}

/// Merge the new version into the record and persist it.
///
/// Issues exactly one control-plane write and returns the server's
/// post-update record, which is the base for everything that follows.
pub async fn update(
    control_plane: &dyn ControlPlane,
    existing: &WifConfig,
    new_version: Option<&str>,
) -> Result<WifConfig, WifError> {
    let body = build_update(existing, new_version)?;

    tracing::info!(
        id = %existing.id,
        version = new_version.unwrap_or("<none>"),
        templates = body.wif_templates().map_or(0, |t| t.len()),
        "updating wif-config"
    );

    control_plane
        .update(&existing.id, &body)
        .await
        .map_err(|source| WifError::Persist {
            id: existing.id.clone(),
            source,
        })
}
