use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// Identity of the local connector as declared in its configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorInfo {
    /// Connector URI, stamped as both issuer and sender agent.
    pub id: Url,
    /// Information-model version the connector speaks on outbound messages.
    pub outbound_model_version: String,
}

/// Kind of backend a representation's bytes are fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BackendType {
    /// Bytes are held by this connector.
    #[default]
    Local,
    /// Bytes are fetched over HTTP from `location`.
    HttpGet,
    /// Bytes are fetched over HTTP with basic-auth credentials.
    HttpGetBasicAuth,
}

/// Where and how the content of a representation can be obtained.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendSource {
    #[serde(rename = "type")]
    pub kind: BackendType,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub location: Option<Url>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub password: Option<String>,
}

impl BackendSource {
    /// A local backend with no location and empty credentials.
    #[must_use]
    pub fn local() -> Self {
        Self::default()
    }
}

/// One concrete rendering of a resource's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRepresentation {
    pub id: Uuid,
    /// Media type in filename-extension form (`json`, `csv`, ...).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub media_type: Option<String>,
    pub byte_size: u64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub file_name: Option<String>,
    pub source: BackendSource,
}

/// Internal metadata of a resource described by a peer connector.
///
/// Every field is optional: extraction sets only what the peer payload carries.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMetadata {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub keywords: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub representations: Option<HashMap<Uuid, ResourceRepresentation>>,
    /// Serialized form of the first contract offer.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub policy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub owner: Option<Url>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub license: Option<Url>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub version: Option<String>,
    /// Resource URI on the provider side.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub remote_id: Option<Url>,
}
