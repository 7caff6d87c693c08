use thiserror::Error;

use wif_core::format_err_chain;

#[derive(Debug, Error)]
pub enum OcmError {
    #[error("wif-config not found: {key}")]
    NotFound { key: String },

    #[error("wif-config key {key:?} matches {count} records, use the id instead")]
    Ambiguous { key: String, count: usize },

    #[error("OCM request failed: {0}")]
    Request(String),

    #[error("OCM returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("OCM client config error: {0}")]
    Config(String),
}

impl OcmError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<reqwest::Error> for OcmError {
    fn from(e: reqwest::Error) -> Self {
        OcmError::Request(format_err_chain(&e))
    }
}
