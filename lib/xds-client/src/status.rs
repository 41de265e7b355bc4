//! Client status snapshot types
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use xds_bootstrap::Node;

/// Aggregate status across every client in a pool
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientStatusResponse {
    #[serde(default)]
    pub config: Vec<ClientConfig>,
}

/// Status of one client
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Name the client is registered under in its pool
    #[serde(default)]
    pub client_scope: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<Node>,

    #[serde(default)]
    pub generic_xds_configs: Vec<GenericXdsConfig>,
}

/// One cached xDS resource
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericXdsConfig {
    pub type_url: String,
    pub name: String,
    #[serde(default)]
    pub version_info: String,
    pub client_status: ClientResourceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

/// Cache state of a resource as seen by the client
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientResourceStatus {
    Requested,
    DoesNotExist,
    Acked,
    Nacked,
}
