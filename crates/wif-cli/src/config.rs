use std::path::{Path, PathBuf};
use std::time::Duration;

use wif_core::Mode;

pub const DEFAULT_OCM_URL: &str = "https://api.openshift.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings read from the environment.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub ocm_url: String,
    pub ocm_token: String,
    pub gcp_access_token: Option<String>,
    pub timeout: Duration,
}

impl CliConfig {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let ocm_url = non_empty("OCM_URL").unwrap_or_else(|| DEFAULT_OCM_URL.to_string());
        let ocm_token = non_empty("OCM_TOKEN")
            .ok_or_else(|| eyre::eyre!("OCM_TOKEN is not set; log in to OCM first"))?;
        let timeout = match non_empty("WIF_HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| eyre::eyre!("invalid WIF_HTTP_TIMEOUT_SECS {raw:?}: {e}"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            ocm_url: ocm_url.trim_end_matches('/').to_string(),
            ocm_token,
            gcp_access_token: non_empty("GCP_ACCESS_TOKEN"),
            timeout: Duration::from_secs(timeout),
        })
    }

    /// The GCP token, required only when cloud changes are applied directly.
    pub fn gcp_token_for(&self, mode: Mode) -> eyre::Result<Option<&str>> {
        match (mode, self.gcp_access_token.as_deref()) {
            (Mode::Auto, None) => Err(eyre::eyre!(
                "GCP_ACCESS_TOKEN is required in auto mode; use --mode manual to generate scripts instead"
            )),
            (_, token) => Ok(token),
        }
    }
}

/// Turns the `--output-dir` flag into an absolute path.
pub fn resolve_output_dir(raw: &str, cwd: &Path, home: Option<&Path>) -> eyre::Result<PathBuf> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(cwd.to_path_buf());
    }

    let expanded = if raw == "~" || raw.starts_with("~/") {
        let home = home.ok_or_else(|| eyre::eyre!("cannot expand {raw:?}: no home directory"))?;
        match raw.strip_prefix("~/") {
            Some(rest) => home.join(rest),
            None => home.to_path_buf(),
        }
    } else {
        PathBuf::from(raw)
    };

    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        Ok(cwd.join(expanded))
    }
}
