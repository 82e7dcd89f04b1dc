use serde::{Deserialize, Serialize};

use super::{ListParams, Network, Page};
use crate::client::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteOverview {
    /// UUID used in every site-scoped path.
    pub id: String,
    /// Legacy short name, e.g. `default`.
    pub internal_reference: String,
    pub name: String,
}

impl Network {
    /// `GET /v1/sites`
    pub async fn list_sites(&self, params: &ListParams) -> Result<Page<SiteOverview>> {
        self.client().get_with_query("/v1/sites", &params.to_query()).await
    }
}
