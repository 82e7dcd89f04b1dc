//! Typed client for the UniFi Site Manager cloud API.

mod devices;
mod hosts;
mod isp_metrics;
mod sdwan;
mod sites;

pub use devices::{Device, DeviceUidb, DeviceUidbImages, HostDevices, ListDevicesParams};
pub use hosts::Host;
pub use isp_metrics::{IspMetricPeriod, IspMetricPeriodData, IspMetricWan, IspMetricsData, IspMetricsInterval, IspMetricsParams};
pub use sdwan::{SdwanConfig, SdwanPeer, SdwanStatus};
pub use sites::{Site, SiteMeta};

use serde::Deserialize;

use crate::client::{ApiClient, Config, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.ui.com";

/// Envelope every Site Manager response is wrapped in.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub data: T,
    #[serde(default)]
    pub next_token: Option<String>,
    #[serde(default)]
    pub http_status_code: u16,
    #[serde(default)]
    pub trace_id: String,
}

/// Cursor pagination shared by the list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageParams {
    pub page_size: Option<u32>,
    pub next_token: Option<String>,
}

impl PageParams {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(size) = self.page_size {
            query.push(("pageSize", size.to_string()));
        }
        if let Some(token) = self.next_token.as_deref().filter(|t| !t.is_empty()) {
            query.push(("nextToken", token.to_string()));
        }
        query
    }
}

#[derive(Debug, Clone)]
pub struct SiteManager {
    client: ApiClient,
}

impl SiteManager {
    /// `config.base_url` defaults to [`DEFAULT_BASE_URL`].
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: ApiClient::new(config, DEFAULT_BASE_URL)?,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(&Config::from_env()?)
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}
