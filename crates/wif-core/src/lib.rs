//! wif-core
//!
//! Pure domain types for workload identity federation configs, the version
//! to template resolver, and GCP resource naming conventions.
//! No HTTP dependency; this is the shared vocabulary of the wif crates.

pub mod error;
pub mod models;
pub mod names;
pub mod options;
pub mod target;

pub use crate::error::{CoreError, format_err_chain};
pub use crate::models::template::TemplateId;
pub use crate::models::update::WifConfigUpdate;
pub use crate::models::wif_config::WifConfig;
pub use crate::options::{Mode, UpdateOptions};
pub use crate::target::ReconciliationTarget;
