//! Manual-mode output: a re-runnable `gcloud` script that performs the same
//! changes the reconciliation steps would.
//!
//! Rendering carries no timestamps and uses stable ordering, so emitting
//! twice with the same record produces byte-identical files.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tera::{Context, Tera, Value};

use wif_core::{ReconciliationTarget, WifConfig, names};

use crate::error::WifError;

pub const SCRIPT_FILE: &str = "script.sh";
pub const JWKS_FILE: &str = "jwk.json";

const SCRIPT_TEMPLATE: &str = include_str!("../templates/script.sh.tera");

#[derive(Debug, Serialize)]
struct ScriptContext {
    wif_id: String,
    display_name: String,
    project_id: String,
    project_number: i64,
    templates: Vec<String>,
    pool_id: String,
    pool_description: &'static str,
    provider_id: String,
    provider_description: &'static str,
    role_description: &'static str,
    issuer_url: String,
    allowed_audiences: String,
    attribute_mapping: &'static str,
    jwks_file: Option<&'static str>,
    custom_roles: Vec<CustomRoleContext>,
    support_bindings: Vec<BindingContext>,
    service_accounts: Vec<ServiceAccountContext>,
}

#[derive(Debug, Serialize)]
struct CustomRoleContext {
    role_id: String,
    /// Comma-joined, sorted.
    permissions: String,
}

#[derive(Debug, Serialize)]
struct BindingContext {
    member: String,
    role: String,
}

#[derive(Debug, Serialize)]
struct ServiceAccountContext {
    service_account_id: String,
    email: String,
    member: String,
    description: String,
    roles: Vec<String>,
    access_role: &'static str,
    access_members: Vec<String>,
}

/// Parse the record's project number, then [`emit`].
pub fn emit_for(updated: &WifConfig, target_dir: &Path) -> Result<Vec<PathBuf>, WifError> {
    let project_number = updated
        .gcp
        .project_number_i64()
        .map_err(WifError::InvalidProjectNumber)?;
    emit(updated, project_number, target_dir)
}

/// Write the update script (and the provider's JWKS, when set) under
/// `target_dir`. Returns the written paths.
pub fn emit(
    updated: &WifConfig,
    project_number: i64,
    target_dir: &Path,
) -> Result<Vec<PathBuf>, WifError> {
    let script = render(updated, project_number)?;
    let io_err = |source: std::io::Error| WifError::ScriptIo {
        dir: target_dir.to_path_buf(),
        source,
    };

    std::fs::create_dir_all(target_dir).map_err(io_err)?;
    let mut written = Vec::with_capacity(2);

    let script_path = target_dir.join(SCRIPT_FILE);
    std::fs::write(&script_path, script).map_err(io_err)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&script_path, std::fs::Permissions::from_mode(0o755))
            .map_err(io_err)?;
    }
    tracing::debug!(path = %script_path.display(), "script written");
    written.push(script_path);

    let jwks = &updated.gcp.workload_identity_pool.identity_provider.jwks;
    if !jwks.is_empty() {
        let jwks_path = target_dir.join(JWKS_FILE);
        std::fs::write(&jwks_path, jwks).map_err(io_err)?;
        tracing::debug!(path = %jwks_path.display(), "jwks written");
        written.push(jwks_path);
    }

    Ok(written)
}

/// Render the script body without touching the filesystem.
pub fn render(updated: &WifConfig, project_number: i64) -> Result<String, WifError> {
    let target = ReconciliationTarget::for_project_number(updated, project_number);

    let mut tera = Tera::default();
    tera.register_filter("shell_quote", shell_quote_filter);
    tera.add_raw_template(SCRIPT_FILE, SCRIPT_TEMPLATE)?;

    let context = Context::from_serialize(build_context(updated, &target))?;
    Ok(tera.render(SCRIPT_FILE, &context)?)
}

fn build_context(wif: &WifConfig, target: &ReconciliationTarget) -> ScriptContext {
    let mut templates = Vec::with_capacity(wif.wif_templates.len());
    for t in &wif.wif_templates {
        if !templates.contains(t) {
            templates.push(t.clone());
        }
    }

    let support_bindings = target
        .support
        .iter()
        .flat_map(|support| {
            support.roles.iter().map(|role| BindingContext {
                member: support.member.clone(),
                role: role.name.clone(),
            })
        })
        .collect();

    ScriptContext {
        wif_id: wif.id.clone(),
        display_name: wif.display_name.clone(),
        project_id: target.project_id.clone(),
        project_number: target.project_number,
        templates,
        pool_id: target.pool_id.clone(),
        pool_description: names::POOL_DESCRIPTION,
        provider_id: target.provider_id.clone(),
        provider_description: names::PROVIDER_DESCRIPTION,
        role_description: names::ROLE_DESCRIPTION,
        issuer_url: target.issuer_url.clone(),
        allowed_audiences: target.allowed_audiences.join(","),
        attribute_mapping: names::SUBJECT_ATTRIBUTE_MAPPING,
        jwks_file: (!target.jwks.is_empty()).then_some(JWKS_FILE),
        custom_roles: target
            .custom_roles()
            .into_iter()
            .map(|role| CustomRoleContext {
                role_id: role.role_id,
                permissions: role.permissions.join(","),
            })
            .collect(),
        support_bindings,
        service_accounts: target
            .service_accounts
            .iter()
            .map(|sa| ServiceAccountContext {
                service_account_id: sa.account_id.clone(),
                email: sa.email.clone(),
                member: sa.member.clone(),
                description: sa.description.clone(),
                roles: sa.roles.iter().map(|r| r.name.clone()).collect(),
                access_role: sa.access.as_ref().map_or("", |a| a.role),
                access_members: sa
                    .access
                    .as_ref()
                    .map(|a| a.members.clone())
                    .unwrap_or_default(),
            })
            .collect(),
    }
}

/// Single-quote a value for POSIX shells.
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

fn shell_quote_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let raw = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    Ok(Value::String(shell_quote(&raw)))
}
