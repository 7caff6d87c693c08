use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a provisioning template, keyed by platform version.
///
/// Resolution is pure and total: the same version string always maps to the
/// same id, so re-running an update with one version never drifts.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(String);

impl TemplateId {
    /// Map a platform version to its template id.
    ///
    /// `4.15` → `v4.15`, `4.17.3` → `v4.17`, `openshift-v4.16.0` → `v4.16`.
    /// Anything past `major.minor` is dropped; a single component is kept as-is.
    pub fn for_version(version: &str) -> Self {
        let trimmed = version.trim();
        let bare = trimmed
            .strip_prefix("openshift-v")
            .or_else(|| trimmed.strip_prefix('v'))
            .unwrap_or(trimmed);

        let major_minor: Vec<&str> = bare.split('.').take(2).collect();
        Self(format!("v{}", major_minor.join(".")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<TemplateId> for String {
    fn from(id: TemplateId) -> Self {
        id.0
    }
}
