//! wif-ocm
//!
//! Control-plane operations on wif-config records. Thin wrapper around the
//! OCM `clusters_mgmt` REST API.

pub mod client;
pub mod control_plane;
pub mod error;

pub use crate::client::{OcmClient, OcmConfig};
pub use crate::control_plane::{BoxFuture, ControlPlane};
pub use crate::error::OcmError;
