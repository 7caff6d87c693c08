use std::future::Future;
use std::pin::Pin;

use wif_core::{WifConfig, WifConfigUpdate};

use crate::error::OcmError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The control-plane operations an update pass needs.
///
/// Methods return boxed futures for dyn compatibility.
pub trait ControlPlane: Send + Sync {
    /// Look a wif-config up by id, falling back to its display name.
    fn find<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<WifConfig, OcmError>>;

    /// Apply `body` to the record and return the server's post-update state.
    fn update<'a>(
        &'a self,
        id: &'a str,
        body: &'a WifConfigUpdate,
    ) -> BoxFuture<'a, Result<WifConfig, OcmError>>;
}
