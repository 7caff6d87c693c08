//! wif-gcp
//!
//! The GCP primitives a wif-config reconciliation needs: project and
//! service-account IAM policies, workload identity pools and providers,
//! service accounts and custom roles. Thin wrapper around the IAM and Cloud
//! Resource Manager REST APIs.

pub mod api;
pub mod client;
pub mod error;
pub mod types;

pub use crate::api::{BoxFuture, GcpApi};
pub use crate::client::{GcpClient, GcpConfig};
pub use crate::error::GcpError;
pub use crate::types::{Binding, IamPolicy, Pool, Provider, ResourceState, Role, ServiceAccount};
