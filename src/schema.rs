//! Normalized schema records produced by the scraper and consumed by `codegen`.
//!
//! Field names serialize in PascalCase so the `types_schema.json` files stay readable by
//! the existing client generators that consume them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A navigation entry discovered on the documentation site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct APIEndpoint {
    pub name: String,
    pub url: String,
    /// Nearest preceding navigation heading.
    #[serde(default)]
    pub category: String,
}

/// One documentation page's extracted contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct APISchema {
    pub endpoint: String,
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub path_params: Vec<Property>,
    pub request: Option<SchemaObject>,
    pub response: Option<SchemaObject>,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SchemaObject {
    pub name: String,
    #[serde(default)]
    pub properties: Vec<Property>,
    /// Name of the enum-valued property selecting between `variants`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_discriminator: Option<String>,
    /// Discriminator literal -> that branch's properties, in enum order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub variants: IndexMap<String, Vec<Property>>,
}

impl SchemaObject {
    pub fn new(name: &str, properties: Vec<Property>) -> Self {
        Self {
            name: name.to_string(),
            properties,
            ..Default::default()
        }
    }

    pub fn has_variants(&self) -> bool {
        self.variant_discriminator.is_some() && !self.variants.is_empty()
    }
}

/// A nested schema node. `children` is only populated for object-typed nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Property {
    pub name: String,
    #[serde(rename = "Type")]
    pub ty: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub r#enum: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Property>,
    #[serde(default)]
    pub is_array: bool,
}

impl Property {
    pub fn is_object(&self) -> bool {
        !self.children.is_empty() || self.ty.to_lowercase().contains("object")
    }
}

/// Outcome of processing one endpoint in a batch run.
#[derive(Debug, Clone)]
pub struct GenerateResult {
    pub endpoint: APIEndpoint,
    pub schema: Option<APISchema>,
    pub code: Option<String>,
    pub error: Option<String>,
}

impl GenerateResult {
    pub fn failed(endpoint: APIEndpoint, error: impl std::fmt::Display) -> Self {
        Self {
            endpoint,
            schema: None,
            code: None,
            error: Some(error.to_string()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}
