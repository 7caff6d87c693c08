use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Body of a control-plane PATCH against a wif-config.
///
/// Built in one step from its inputs; there is no mutable builder. Fields
/// left as `None` are omitted from the request, so an empty body is a valid
/// no-op update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifConfigUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    wif_templates: Option<Vec<String>>,
}

impl WifConfigUpdate {
    /// An update that changes nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// An update carrying the full resulting template collection.
    pub fn try_new(wif_templates: Vec<String>) -> Result<Self, CoreError> {
        if let Some(pos) = wif_templates.iter().position(|t| t.trim().is_empty()) {
            return Err(CoreError::InvalidPayload(format!(
                "wif_templates[{pos}] is empty"
            )));
        }
        Ok(Self {
            wif_templates: Some(wif_templates),
        })
    }

    pub fn wif_templates(&self) -> Option<&[String]> {
        self.wif_templates.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.wif_templates.is_none()
    }
}
