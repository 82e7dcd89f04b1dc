use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ApiResponse, PageParams, SiteManager};
use crate::client::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Device {
    pub id: String,
    pub mac: String,
    pub name: String,
    pub model: String,
    pub shortname: String,
    pub ip: String,
    pub product_line: String,
    pub status: String,
    pub version: String,
    pub firmware_status: String,
    pub update_available: String,
    pub is_console: bool,
    pub is_managed: bool,
    pub startup_time: Option<DateTime<Utc>>,
    pub adoption_time: Option<DateTime<Utc>>,
    pub note: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uidb: Option<DeviceUidb>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceUidb {
    pub guid: String,
    pub icon_id: String,
    pub id: String,
    pub images: DeviceUidbImages,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceUidbImages {
    pub default: String,
    pub nopadding: String,
    pub topology: String,
}

/// Devices reported by one host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostDevices {
    pub host_id: String,
    pub host_name: String,
    pub devices: Vec<Device>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListDevicesParams {
    pub host_ids: Vec<String>,
    /// Last-processed timestamp, RFC 3339.
    pub time: Option<String>,
    pub page: PageParams,
}

impl ListDevicesParams {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query: Vec<(&'static str, String)> =
            self.host_ids.iter().map(|id| ("hostIds", id.clone())).collect();
        if let Some(time) = self.time.as_deref().filter(|t| !t.is_empty()) {
            query.push(("time", time.to_string()));
        }
        query.extend(self.page.to_query());
        query
    }
}

impl SiteManager {
    /// `GET /v1/devices`
    pub async fn list_devices(&self, params: &ListDevicesParams) -> Result<ApiResponse<Vec<HostDevices>>> {
        self.client().get_with_query("/v1/devices", &params.to_query()).await
    }
}
