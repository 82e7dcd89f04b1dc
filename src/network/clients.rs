use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{require_id, ListParams, Network, Page};
use crate::client::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectedClientType {
    Wired,
    Wireless,
    Vpn,
    Teleport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedClient {
    #[serde(rename = "type")]
    pub client_type: ConnectedClientType,
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub connected_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ip_address: Option<String>,
    pub access: ClientAccess,
    /// Absent for VPN and Teleport clients.
    #[serde(default)]
    pub mac_address: Option<String>,
    #[serde(default)]
    pub uplink_device_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientAccessType {
    Default,
    Guest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientAccess {
    #[serde(rename = "type")]
    pub access_type: ClientAccessType,
    #[serde(default)]
    pub authorized: bool,
    #[serde(default)]
    pub authorization: Option<ClientAuthorization>,
}

/// A guest authorization, granted or revoked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientAuthorization {
    pub authorized_at: Option<DateTime<Utc>>,
    pub authorization_method: String,
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(rename = "dataUsageLimitMBytes")]
    pub data_usage_limit_mbytes: Option<u64>,
    pub rx_rate_limit_kbps: Option<u64>,
    pub tx_rate_limit_kbps: Option<u64>,
    pub usage: AuthorizationUsage,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthorizationUsage {
    pub duration_sec: u64,
    pub rx_bytes: u64,
    pub tx_bytes: u64,
    pub bytes: u64,
}

/// Body of `POST .../clients/{clientId}/actions`, tagged by `action`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientAction {
    AuthorizeGuestAccess(GuestAccessLimits),
    UnauthorizeGuestAccess,
}

/// Unset limits fall back to the guest portal's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestAccessLimits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit_minutes: Option<u64>,
    #[serde(default, rename = "dataUsageLimitMBytes", skip_serializing_if = "Option::is_none")]
    pub data_usage_limit_mbytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rx_rate_limit_kbps: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_rate_limit_kbps: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientActionResponse {
    pub action: String,
    pub revoked_authorization: Option<ClientAuthorization>,
    pub granted_authorization: Option<ClientAuthorization>,
}

impl Network {
    /// `GET /v1/sites/{siteId}/clients`
    pub async fn list_clients(&self, site_id: &str, params: &ListParams) -> Result<Page<ConnectedClient>> {
        let site_id = require_id("siteId", site_id)?;
        self.client()
            .get_with_query(&format!("/v1/sites/{}/clients", site_id), &params.to_query())
            .await
    }

    /// `GET /v1/sites/{siteId}/clients/{clientId}`
    pub async fn get_client(&self, site_id: &str, client_id: &str) -> Result<ConnectedClient> {
        let site_id = require_id("siteId", site_id)?;
        let client_id = require_id("clientId", client_id)?;
        self.client()
            .get(&format!("/v1/sites/{}/clients/{}", site_id, client_id))
            .await
    }

    /// `POST /v1/sites/{siteId}/clients/{clientId}/actions`
    pub async fn execute_client_action(
        &self,
        site_id: &str,
        client_id: &str,
        action: &ClientAction,
    ) -> Result<ClientActionResponse> {
        let site_id = require_id("siteId", site_id)?;
        let client_id = require_id("clientId", client_id)?;
        self.client()
            .post(&format!("/v1/sites/{}/clients/{}/actions", site_id, client_id), action)
            .await
    }
}
