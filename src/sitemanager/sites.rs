use serde::{Deserialize, Serialize};

use super::{ApiResponse, PageParams, SiteManager};
use crate::client::Result;

/// A UniFi Network site.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Site {
    pub site_id: String,
    pub host_id: String,
    pub meta: SiteMeta,
    /// Shape varies by console firmware; kept raw.
    pub statistics: serde_json::Value,
    pub permission: String,
    pub is_owner: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteMeta {
    pub desc: String,
    pub gateway_mac: String,
    pub name: String,
    pub timezone: String,
}

impl SiteManager {
    /// `GET /v1/sites`
    pub async fn list_sites(&self, page: &PageParams) -> Result<ApiResponse<Vec<Site>>> {
        self.client().get_with_query("/v1/sites", &page.to_query()).await
    }
}
