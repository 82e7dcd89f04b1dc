//! Typed client for the Network integration API served by a local UniFi console
//! (UDM, Cloud Key, self-hosted controller).
//!
//! Unlike the Site Manager API there is no default host: the console's URL, e.g.
//! `https://192.168.1.1/proxy/network/integration`, must be configured. Single-object
//! responses are returned bare; list responses use the offset-paged [`Page`] envelope.

mod clients;
mod devices;
mod networks;
mod sites;

pub use clients::{
    AuthorizationUsage, ClientAccess, ClientAccessType, ClientAction, ClientActionResponse, ClientAuthorization,
    ConnectedClient, ConnectedClientType, GuestAccessLimits,
};
pub use devices::{
    AdoptDeviceRequest, AdoptedDevice, AdoptedDeviceOverview, DeviceAction, DeviceFeatures, DeviceInterfaces,
    DevicePort, DevicePortPoe, DeviceRadio, DeviceStatistics, DeviceUplink, PendingDevice, PortAction,
    RadioStatistics, RadioStatisticsList, UplinkStatistics,
};
pub use networks::{
    DeleteNetworkParams, DhcpGuarding, DhcpMode, IpAddressRange, Ipv4Configuration, Ipv4DhcpConfiguration,
    NetworkDetail, NetworkManagement, NetworkMetadata, NetworkOrigin, NetworkReferences, NetworkRequest,
    Reference, ReferenceResource,
};
pub use sites::SiteOverview;

use serde::Deserialize;

use crate::client::{ApiClient, Config, Error, Result};

/// Offset-paged list envelope.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Page<T> {
    pub offset: u32,
    pub limit: u32,
    pub count: u32,
    pub total_count: u32,
    pub data: Vec<T>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 0,
            count: 0,
            total_count: 0,
            data: Vec::new(),
        }
    }
}

impl<T> Page<T> {
    /// Parameters for the page after this one, or `None` on the last page.
    pub fn next(&self, params: &ListParams) -> Option<ListParams> {
        let next = self.offset + self.count;
        if self.count == 0 || next >= self.total_count {
            return None;
        }
        Some(ListParams {
            offset: Some(next),
            ..params.clone()
        })
    }
}

/// Paging and filtering shared by the list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub offset: Option<u32>,
    pub limit: Option<u32>,
    /// Filter expression, e.g. `type.eq('WIRED')`.
    pub filter: Option<String>,
}

impl ListParams {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(offset) = self.offset {
            query.push(("offset", offset.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(filter) = self.filter.as_deref().filter(|f| !f.trim().is_empty()) {
            query.push(("filter", filter.to_string()));
        }
        query
    }
}

#[derive(Debug, Clone)]
pub struct Network {
    client: ApiClient,
}

impl Network {
    /// `config.base_url` is required.
    pub fn new(config: &Config) -> Result<Self> {
        if config.base_url.is_empty() {
            return Err(Error::validation("baseUrl", "console base URL is required"));
        }
        Ok(Self {
            client: ApiClient::new(config, &config.base_url)?,
        })
    }

    /// Read `UNIFI_API_KEY` and `UNIFI_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        Self::new(&Config::from_env()?)
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

/// Trimmed `id`, or a validation error naming `field`.
fn require_id<'a>(field: &str, id: &'a str) -> Result<&'a str> {
    let id = id.trim();
    if id.is_empty() {
        return Err(Error::validation(field, &format!("{} cannot be empty", field)));
    }
    Ok(id)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_required() {
        let err = Network::new(&Config::new("k")).unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "baseUrl"));

        let net = Network::new(&Config::new("k").with_base_url("https://192.168.1.1/proxy/network/integration/")).unwrap();
        assert_eq!(net.client().base_url(), "https://192.168.1.1/proxy/network/integration");
    }

    #[test]
    fn list_params_query() {
        assert!(ListParams::default().to_query().is_empty());
        let params = ListParams {
            offset: Some(25),
            limit: Some(25),
            filter: Some("  ".into()),
        };
        assert_eq!(
            params.to_query(),
            vec![("offset", "25".to_string()), ("limit", "25".to_string())]
        );
    }

    #[test]
    fn next_page_stops_at_total() {
        let params = ListParams {
            limit: Some(2),
            ..Default::default()
        };
        let first: Page<()> = Page {
            offset: 0,
            limit: 2,
            count: 2,
            total_count: 3,
            data: vec![(), ()],
        };
        let next = first.next(&params).unwrap();
        assert_eq!((next.offset, next.limit), (Some(2), Some(2)));

        let last: Page<()> = Page {
            offset: 2,
            limit: 2,
            count: 1,
            total_count: 3,
            data: vec![()],
        };
        assert!(last.next(&next).is_none());
    }

    #[test]
    fn blank_ids_are_rejected() {
        assert_eq!(require_id("siteId", " abc ").unwrap(), "abc");
        let err = require_id("clientId", "\t").unwrap_err();
        assert_eq!(err.to_string(), "validation error on field \"clientId\": clientId cannot be empty");
    }
}
