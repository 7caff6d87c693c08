use thiserror::Error;

use wif_core::format_err_chain;

#[derive(Debug, Error)]
pub enum GcpError {
    #[error("GCP request failed: {0}")]
    Request(String),

    #[error("{operation} returned {status}: {body}")]
    Status {
        operation: String,
        status: u16,
        body: String,
    },

    #[error("GCP client config error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for GcpError {
    fn from(e: reqwest::Error) -> Self {
        GcpError::Request(format_err_chain(&e))
    }
}
