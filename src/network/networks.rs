use serde::{Deserialize, Serialize};

use super::{require_id, ListParams, Network, Page};
use crate::client::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NetworkManagement {
    Unmanaged,
    Gateway,
    Switch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NetworkOrigin {
    UserDefined,
    SystemDefined,
    Orchestrated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDetail {
    pub management: NetworkManagement,
    pub id: String,
    pub name: String,
    pub enabled: bool,
    pub vlan_id: u16,
    pub metadata: NetworkMetadata,
    #[serde(default)]
    pub dhcp_guarding: Option<DhcpGuarding>,
    #[serde(default)]
    pub isolation_enabled: bool,
    #[serde(default)]
    pub cellular_backup_enabled: bool,
    #[serde(default)]
    pub zone_id: Option<String>,
    /// Switch that hosts a `SWITCH`-managed network.
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub internet_access_enabled: bool,
    #[serde(default)]
    pub mdns_forwarding_enabled: bool,
    #[serde(default)]
    pub ipv4_configuration: Option<Ipv4Configuration>,
    #[serde(default)]
    pub ipv6_configuration: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkMetadata {
    pub origin: NetworkOrigin,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DhcpGuarding {
    pub trusted_dhcp_server_ip_addresses: Vec<String>,
}

/// The commonly edited IPv4 settings. Anything else the console sends is kept in `extra`
/// and written back unchanged on update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ipv4Configuration {
    #[serde(default)]
    pub auto_scale_enabled: bool,
    pub host_ip_address: String,
    pub prefix_length: u8,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_host_ip_subnets: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dhcp_configuration: Option<Ipv4DhcpConfiguration>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DhcpMode {
    Server,
    Relay,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ipv4DhcpConfiguration {
    pub mode: DhcpMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address_range: Option<IpAddressRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lease_time_seconds: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dns_server_ip_addresses_override: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpAddressRange {
    pub start: String,
    pub stop: String,
}

/// Body of create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRequest {
    pub management: NetworkManagement,
    pub name: String,
    pub enabled: bool,
    pub vlan_id: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dhcp_guarding: Option<DhcpGuarding>,
    #[serde(default)]
    pub isolation_enabled: bool,
    #[serde(default)]
    pub cellular_backup_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(default)]
    pub internet_access_enabled: bool,
    #[serde(default)]
    pub mdns_forwarding_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4_configuration: Option<Ipv4Configuration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_configuration: Option<serde_json::Value>,
}

impl From<NetworkDetail> for NetworkRequest {
    fn from(detail: NetworkDetail) -> Self {
        Self {
            management: detail.management,
            name: detail.name,
            enabled: detail.enabled,
            vlan_id: detail.vlan_id,
            dhcp_guarding: detail.dhcp_guarding,
            isolation_enabled: detail.isolation_enabled,
            cellular_backup_enabled: detail.cellular_backup_enabled,
            zone_id: detail.zone_id,
            device_id: detail.device_id,
            internet_access_enabled: detail.internet_access_enabled,
            mdns_forwarding_enabled: detail.mdns_forwarding_enabled,
            ipv4_configuration: detail.ipv4_configuration,
            ipv6_configuration: detail.ipv6_configuration,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteNetworkParams {
    /// Also delete the resources that reference the network.
    pub cascade: bool,
    pub force: bool,
}

impl DeleteNetworkParams {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if self.cascade {
            query.push(("cascade", "true".to_string()));
        }
        if self.force {
            query.push(("force", "true".to_string()));
        }
        query
    }
}

/// What would break if the network were deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkReferences {
    pub reference_resources: Vec<ReferenceResource>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReferenceResource {
    pub resource_type: String,
    pub reference_count: u32,
    pub references: Vec<Reference>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Reference {
    pub reference_id: String,
}

impl Network {
    /// `GET /v1/sites/{siteId}/networks`
    pub async fn list_networks(&self, site_id: &str, params: &ListParams) -> Result<Page<NetworkDetail>> {
        let site_id = require_id("siteId", site_id)?;
        self.client()
            .get_with_query(&format!("/v1/sites/{}/networks", site_id), &params.to_query())
            .await
    }

    /// `GET /v1/sites/{siteId}/networks/{networkId}`
    pub async fn get_network(&self, site_id: &str, network_id: &str) -> Result<NetworkDetail> {
        let site_id = require_id("siteId", site_id)?;
        let network_id = require_id("networkId", network_id)?;
        self.client()
            .get(&format!("/v1/sites/{}/networks/{}", site_id, network_id))
            .await
    }

    /// `POST /v1/sites/{siteId}/networks`
    pub async fn create_network(&self, site_id: &str, network: &NetworkRequest) -> Result<NetworkDetail> {
        let site_id = require_id("siteId", site_id)?;
        self.client()
            .post(&format!("/v1/sites/{}/networks", site_id), network)
            .await
    }

    /// `PUT /v1/sites/{siteId}/networks/{networkId}`
    pub async fn update_network(
        &self,
        site_id: &str,
        network_id: &str,
        network: &NetworkRequest,
    ) -> Result<NetworkDetail> {
        let site_id = require_id("siteId", site_id)?;
        let network_id = require_id("networkId", network_id)?;
        self.client()
            .put(&format!("/v1/sites/{}/networks/{}", site_id, network_id), network)
            .await
    }

    /// `DELETE /v1/sites/{siteId}/networks/{networkId}`
    pub async fn delete_network(&self, site_id: &str, network_id: &str, params: &DeleteNetworkParams) -> Result<()> {
        let site_id = require_id("siteId", site_id)?;
        let network_id = require_id("networkId", network_id)?;
        let _: Option<serde_json::Value> = self
            .client()
            .delete_with_query(&format!("/v1/sites/{}/networks/{}", site_id, network_id), &params.to_query())
            .await?;
        Ok(())
    }

    /// `GET /v1/sites/{siteId}/networks/{networkId}/references`
    pub async fn get_network_references(&self, site_id: &str, network_id: &str) -> Result<NetworkReferences> {
        let site_id = require_id("siteId", site_id)?;
        let network_id = require_id("networkId", network_id)?;
        self.client()
            .get(&format!("/v1/sites/{}/networks/{}/references", site_id, network_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_ipv4_settings_survive_an_update() {
        let detail: NetworkDetail = serde_json::from_value(json!({
            "management": "GATEWAY",
            "id": "n1",
            "name": "IoT",
            "enabled": true,
            "vlanId": 30,
            "metadata": {"origin": "USER_DEFINED"},
            "ipv4Configuration": {
                "hostIpAddress": "192.168.30.1",
                "prefixLength": 24,
                "dhcpConfiguration": {"mode": "SERVER", "leaseTimeSeconds": 86400, "pingConflictDetectionEnabled": true},
                "natOutboundIpAddressConfiguration": {"type": "AUTO"}
            }
        }))
        .unwrap();

        let mut request = NetworkRequest::from(detail);
        request.name = "IoT devices".into();
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["name"], "IoT devices");
        assert_eq!(body["vlanId"], 30);
        assert_eq!(body["ipv4Configuration"]["natOutboundIpAddressConfiguration"]["type"], "AUTO");
        assert_eq!(body["ipv4Configuration"]["dhcpConfiguration"]["pingConflictDetectionEnabled"], true);
        assert!(body.get("zoneId").is_none());
    }

    #[test]
    fn delete_flags_only_when_set() {
        assert!(DeleteNetworkParams::default().to_query().is_empty());
        let params = DeleteNetworkParams { cascade: true, force: false };
        assert_eq!(params.to_query(), vec![("cascade", "true".to_string())]);
    }
}
