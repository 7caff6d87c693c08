use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which terminal path an update pass takes. Exactly one runs per pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Reconcile live cloud resources now.
    #[default]
    Auto,
    /// Write scripts for an operator to run later.
    Manual,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Auto, Mode::Manual];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Auto => "auto",
            Mode::Manual => "manual",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs of one update pass, fixed before the pass starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOptions {
    /// wif-config id or display name.
    pub key: String,
    pub mode: Mode,
    /// Script output directory. Only read in manual mode.
    pub target_dir: PathBuf,
    /// Target platform version. `None` persists a no-op update.
    pub version: Option<String>,
}

impl UpdateOptions {
    pub fn new(key: impl Into<String>, mode: Mode, target_dir: impl Into<PathBuf>) -> Self {
        Self {
            key: key.into(),
            mode,
            target_dir: target_dir.into(),
            version: None,
        }
    }

    pub fn with_version(self, version: impl Into<String>) -> Self {
        let version = version.into();
        Self {
            version: (!version.trim().is_empty()).then_some(version),
            ..self
        }
    }
}
