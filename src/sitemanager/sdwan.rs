use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ApiResponse, SiteManager};
use crate::client::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SdwanConfig {
    pub id: String,
    pub name: String,
    pub description: String,
    pub enabled: bool,
}

/// Deployment state of one SD-WAN configuration and its peers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SdwanStatus {
    pub config_id: String,
    pub status: String,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub peers: Vec<SdwanPeer>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SdwanPeer {
    pub id: String,
    pub name: String,
    pub status: String,
    /// Milliseconds.
    pub latency: i64,
}

impl SiteManager {
    /// `GET /v1/sdwan/configs`
    pub async fn get_sdwan_configs(&self) -> Result<Vec<SdwanConfig>> {
        let resp: ApiResponse<Vec<SdwanConfig>> = self.client().get("/v1/sdwan/configs").await?;
        Ok(resp.data)
    }

    /// `GET /v1/sdwan/configs/{id}/status`
    pub async fn get_sdwan_status(&self, config_id: &str) -> Result<SdwanStatus> {
        let config_id = config_id.trim();
        if config_id.is_empty() {
            return Err(Error::validation("configId", "config ID cannot be empty"));
        }
        let resp: ApiResponse<SdwanStatus> = self
            .client()
            .get(&format!("/v1/sdwan/configs/{}/status", config_id))
            .await?;
        Ok(resp.data)
    }
}
