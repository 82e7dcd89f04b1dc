use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ApiResponse, PageParams, SiteManager};
use crate::client::{Error, Result};

/// A UniFi console or self-hosted controller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Host {
    pub id: String,
    pub hardware_id: String,
    #[serde(rename = "type")]
    pub host_type: String,
    pub ip_address: String,
    pub owner: bool,
    pub is_blocked: bool,
    pub registration_time: DateTime<Utc>,
    pub last_connection_state_change: DateTime<Utc>,
    pub latest_backup_time: String,
    pub user_data: serde_json::Value,
    pub reported_state: serde_json::Value,
}

impl SiteManager {
    /// `GET /v1/hosts`
    pub async fn list_hosts(&self, page: &PageParams) -> Result<ApiResponse<Vec<Host>>> {
        self.client().get_with_query("/v1/hosts", &page.to_query()).await
    }

    /// `GET /v1/hosts/{id}`
    pub async fn get_host(&self, id: &str) -> Result<Host> {
        let id = id.trim();
        if id.is_empty() {
            return Err(Error::validation("hostId", "host ID cannot be empty"));
        }
        let resp: ApiResponse<Host> = self.client().get(&format!("/v1/hosts/{}", id)).await?;
        Ok(resp.data)
    }
}
