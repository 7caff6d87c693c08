use std::path::PathBuf;

use thiserror::Error;

use wif_core::{CoreError, format_err_chain};
use wif_gcp::GcpError;
use wif_ocm::OcmError;

#[derive(Debug, Error)]
pub enum WifError {
    #[error("failed to get wif-config {key:?}")]
    Lookup { key: String, source: OcmError },

    #[error("failed to create wif-config body")]
    InvalidPayload(#[source] CoreError),

    #[error("failed to update wif-config {id:?}")]
    Persist { id: String, source: OcmError },

    #[error("failed to parse project number from wif-config")]
    InvalidProjectNumber(#[source] CoreError),

    #[error("failed to write script files to {}", dir.display())]
    ScriptIo {
        dir: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to render script: {0}")]
    Template(String),

    #[error("GCP {operation} failed")]
    Gcp {
        operation: &'static str,
        source: GcpError,
    },

    #[error("failed to {description} ({step})")]
    Step {
        step: &'static str,
        description: &'static str,
        source: Box<WifError>,
    },

    #[error("auto mode requires a GCP client")]
    MissingCloudClient,
}

/// Coarse classification of a failure. The binary maps it to an exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    UpstreamFailure,
    IoFailure,
}

impl WifError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Lookup { source, .. } if source.is_not_found() => ErrorKind::NotFound,
            Self::Lookup { source, .. } => match source {
                OcmError::Ambiguous { .. } => ErrorKind::InvalidInput,
                _ => ErrorKind::UpstreamFailure,
            },
            Self::InvalidPayload(_) | Self::InvalidProjectNumber(_) | Self::MissingCloudClient => {
                ErrorKind::InvalidInput
            }
            Self::Persist { .. } | Self::Gcp { .. } => ErrorKind::UpstreamFailure,
            Self::ScriptIo { .. } | Self::Template(_) => ErrorKind::IoFailure,
            Self::Step { source, .. } => source.kind(),
        }
    }

    /// Name of the reconciliation step that failed, if any.
    pub fn failed_step(&self) -> Option<&'static str> {
        match self {
            Self::Step { step, .. } => Some(step),
            _ => None,
        }
    }

    /// Wrap a GCP error with the API operation that produced it.
    pub(crate) fn gcp(operation: &'static str) -> impl FnOnce(GcpError) -> Self {
        move |source| Self::Gcp { operation, source }
    }
}

impl From<tera::Error> for WifError {
    fn from(e: tera::Error) -> Self {
        WifError::Template(format_err_chain(&e))
    }
}
