use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;

use wif_core::{WifConfig, WifConfigUpdate};

use crate::control_plane::{BoxFuture, ControlPlane};
use crate::error::OcmError;

const WIF_CONFIGS_PATH: &str = "/api/clusters_mgmt/v1/gcp/wif_configs";

#[derive(Debug, Clone)]
pub struct OcmConfig {
    /// e.g. `https://api.openshift.com`
    pub base_url: String,
    pub token: String,
    pub timeout: Duration,
}

/// REST client for wif-config records.
pub struct OcmClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct WifConfigList {
    #[serde(default)]
    items: Vec<WifConfig>,
}

impl OcmClient {
    pub fn new(config: OcmConfig) -> Result<Self, OcmError> {
        if config.token.trim().is_empty() {
            return Err(OcmError::Config("OCM token is empty".into()));
        }
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| OcmError::Config(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token,
        })
    }

    fn url(&self, suffix: &str) -> String {
        format!("{}{WIF_CONFIGS_PATH}{suffix}", self.base_url)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<WifConfig>, OcmError> {
        let resp = self
            .http
            .get(self.url(&format!("/{id}")))
            .bearer_auth(&self.token)
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = check_status(resp).await?;
        Ok(Some(resp.json::<WifConfig>().await?))
    }

    async fn search_by_name(&self, name: &str) -> Result<Vec<WifConfig>, OcmError> {
        let search = format!("display_name = '{}'", name.replace('\'', "''"));
        let resp = self
            .http
            .get(self.url(""))
            .bearer_auth(&self.token)
            .query(&[("search", search.as_str())])
            .send()
            .await?;

        let resp = check_status(resp).await?;
        Ok(resp.json::<WifConfigList>().await?.items)
    }
}

impl ControlPlane for OcmClient {
    fn find<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<WifConfig, OcmError>> {
        Box::pin(async move {
            if let Some(wif) = self.get_by_id(key).await? {
                tracing::debug!(id = %wif.id, "wif-config found by id");
                return Ok(wif);
            }

            let mut matches = self.search_by_name(key).await?;
            match matches.len() {
                0 => Err(OcmError::NotFound {
                    key: key.to_string(),
                }),
                1 => {
                    let wif = matches.remove(0);
                    tracing::debug!(id = %wif.id, name = %key, "wif-config found by name");
                    Ok(wif)
                }
                count => Err(OcmError::Ambiguous {
                    key: key.to_string(),
                    count,
                }),
            }
        })
    }

    fn update<'a>(
        &'a self,
        id: &'a str,
        body: &'a WifConfigUpdate,
    ) -> BoxFuture<'a, Result<WifConfig, OcmError>> {
        Box::pin(async move {
            let resp = self
                .http
                .patch(self.url(&format!("/{id}")))
                .bearer_auth(&self.token)
                .json(body)
                .send()
                .await?;

            if resp.status() == StatusCode::NOT_FOUND {
                return Err(OcmError::NotFound { key: id.to_string() });
            }
            let resp = check_status(resp).await?;
            let wif = resp.json::<WifConfig>().await?;
            tracing::debug!(id = %wif.id, templates = wif.wif_templates.len(), "wif-config updated");
            Ok(wif)
        })
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, OcmError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(OcmError::Status {
        status: status.as_u16(),
        body,
    })
}
