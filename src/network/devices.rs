use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{require_id, ListParams, Network, Page};
use crate::client::Result;

/// One row of the adopted device list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdoptedDeviceOverview {
    pub id: String,
    pub mac_address: String,
    pub ip_address: String,
    pub name: String,
    pub model: String,
    pub state: String,
    pub supported: bool,
    pub firmware_version: String,
    pub firmware_updatable: bool,
    pub features: Vec<String>,
    pub interfaces: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdoptedDevice {
    pub id: String,
    pub mac_address: String,
    pub ip_address: String,
    pub name: String,
    pub model: String,
    pub supported: bool,
    pub state: String,
    pub firmware_version: String,
    pub firmware_updatable: bool,
    pub adopted_at: Option<DateTime<Utc>>,
    pub provisioned_at: Option<DateTime<Utc>>,
    pub configuration_id: String,
    pub uplink: Option<DeviceUplink>,
    pub features: DeviceFeatures,
    pub interfaces: DeviceInterfaces,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceUplink {
    pub device_id: String,
}

/// Feature blocks are present only for what the device can do; their contents vary by
/// model and are kept as raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceFeatures {
    pub switching: Option<serde_json::Value>,
    pub access_point: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceInterfaces {
    pub ports: Vec<DevicePort>,
    pub radios: Vec<DeviceRadio>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DevicePort {
    pub idx: u32,
    pub state: String,
    pub connector: String,
    pub max_speed_mbps: u32,
    pub speed_mbps: u32,
    pub poe: Option<DevicePortPoe>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DevicePortPoe {
    pub standard: String,
    #[serde(rename = "type")]
    pub poe_type: u32,
    pub enabled: bool,
    pub state: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceRadio {
    pub wlan_standard: String,
    #[serde(rename = "frequencyGHz")]
    pub frequency_ghz: f64,
    #[serde(rename = "channelWidthMHz")]
    pub channel_width_mhz: u32,
    pub channel: u32,
}

/// Latest heartbeat figures for one device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceStatistics {
    pub uptime_sec: u64,
    pub last_heartbeat_at: Option<DateTime<Utc>>,
    pub next_heartbeat_at: Option<DateTime<Utc>>,
    #[serde(rename = "loadAverage1Min")]
    pub load_average_1_min: f64,
    #[serde(rename = "loadAverage5Min")]
    pub load_average_5_min: f64,
    #[serde(rename = "loadAverage15Min")]
    pub load_average_15_min: f64,
    pub cpu_utilization_pct: f64,
    pub memory_utilization_pct: f64,
    pub uplink: Option<UplinkStatistics>,
    pub interfaces: RadioStatisticsList,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UplinkStatistics {
    pub tx_rate_bps: u64,
    pub rx_rate_bps: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadioStatisticsList {
    pub radios: Vec<RadioStatistics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RadioStatistics {
    #[serde(rename = "frequencyGHz")]
    pub frequency_ghz: f64,
    pub tx_retries_pct: f64,
}

/// A device seen on the network but not yet adopted by any site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PendingDevice {
    pub mac_address: String,
    pub ip_address: String,
    pub model: String,
    pub state: String,
    pub supported: bool,
    pub firmware_version: String,
    pub firmware_updatable: bool,
    pub features: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdoptDeviceRequest {
    pub mac_address: String,
    #[serde(default)]
    pub ignore_device_limit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceAction {
    Restart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PortAction {
    PowerCycle,
}

impl Network {
    /// `GET /v1/sites/{siteId}/devices`
    pub async fn list_devices(&self, site_id: &str, params: &ListParams) -> Result<Page<AdoptedDeviceOverview>> {
        let site_id = require_id("siteId", site_id)?;
        self.client()
            .get_with_query(&format!("/v1/sites/{}/devices", site_id), &params.to_query())
            .await
    }

    /// `GET /v1/sites/{siteId}/devices/{deviceId}`
    pub async fn get_device(&self, site_id: &str, device_id: &str) -> Result<AdoptedDevice> {
        let site_id = require_id("siteId", site_id)?;
        let device_id = require_id("deviceId", device_id)?;
        self.client()
            .get(&format!("/v1/sites/{}/devices/{}", site_id, device_id))
            .await
    }

    /// `GET /v1/sites/{siteId}/devices/{deviceId}/statistics/latest`
    pub async fn get_device_statistics(&self, site_id: &str, device_id: &str) -> Result<DeviceStatistics> {
        let site_id = require_id("siteId", site_id)?;
        let device_id = require_id("deviceId", device_id)?;
        self.client()
            .get(&format!("/v1/sites/{}/devices/{}/statistics/latest", site_id, device_id))
            .await
    }

    /// `POST /v1/sites/{siteId}/devices`
    pub async fn adopt_device(&self, site_id: &str, request: &AdoptDeviceRequest) -> Result<AdoptedDevice> {
        let site_id = require_id("siteId", site_id)?;
        require_id("macAddress", &request.mac_address)?;
        self.client()
            .post(&format!("/v1/sites/{}/devices", site_id), request)
            .await
    }

    /// `POST /v1/sites/{siteId}/devices/{deviceId}/actions`
    pub async fn execute_device_action(&self, site_id: &str, device_id: &str, action: DeviceAction) -> Result<()> {
        let site_id = require_id("siteId", site_id)?;
        let device_id = require_id("deviceId", device_id)?;
        let _: Option<serde_json::Value> = self
            .client()
            .post(&format!("/v1/sites/{}/devices/{}/actions", site_id, device_id), &action)
            .await?;
        Ok(())
    }

    /// `POST /v1/sites/{siteId}/devices/{deviceId}/interfaces/ports/{portIdx}/actions`
    pub async fn execute_port_action(
        &self,
        site_id: &str,
        device_id: &str,
        port_idx: u32,
        action: PortAction,
    ) -> Result<()> {
        let site_id = require_id("siteId", site_id)?;
        let device_id = require_id("deviceId", device_id)?;
        let path = format!(
            "/v1/sites/{}/devices/{}/interfaces/ports/{}/actions",
            site_id, device_id, port_idx
        );
        let _: Option<serde_json::Value> = self.client().post(&path, &action).await?;
        Ok(())
    }

    /// `GET /v1/pending-devices`
    pub async fn list_pending_devices(&self, params: &ListParams) -> Result<Page<PendingDevice>> {
        self.client()
            .get_with_query("/v1/pending-devices", &params.to_query())
            .await
    }
}
