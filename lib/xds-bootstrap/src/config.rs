//! Bootstrap configuration model

use crate::{BootstrapError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Channel credential types understood by the xDS transport
const SUPPORTED_CREDS: &[&str] = &["insecure", "google_default", "tls"];

/// BootstrapConfig is the process-level configuration shared by xDS clients
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Management servers, in order of preference
    pub xds_servers: Vec<ServerConfig>,

    /// Identity this process presents to the management server
    #[serde(default)]
    pub node: Node,

    /// Listener name template for clients without an authority
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_default_listener_resource_name_template: Option<String>,

    /// Named authorities for federation
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub authorities: BTreeMap<String, Authority>,
}

/// A single management server
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Target URI of the management server
    pub server_uri: String,

    /// Credentials to use, first supported entry wins
    #[serde(default)]
    pub channel_creds: Vec<ChannelCreds>,

    /// Feature flags such as "ignore_resource_deletion"
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub server_features: Vec<String>,
}

/// Channel credentials entry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelCreds {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<serde_json::Value>,
}

/// Node identity
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(default)]
    pub id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cluster: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locality: Option<Locality>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

/// Node locality
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Locality {
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub zone: String,
    #[serde(default)]
    pub sub_zone: String,
}

/// Authority used for xdstp:// resource names
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Authority {
    /// Overrides the top-level servers when non-empty
    #[serde(default)]
    pub xds_servers: Vec<ServerConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_listener_resource_name_template: Option<String>,
}

impl BootstrapConfig {
    /// Parse and validate a bootstrap document
    pub fn from_json(contents: &str) -> Result<Self> {
        let config: BootstrapConfig = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants a client relies on
    pub fn validate(&self) -> Result<()> {
        if self.xds_servers.is_empty() {
            return Err(BootstrapError::Invalid(
                "xds_servers must contain at least one server".to_string(),
            ));
        }

        for server in &self.xds_servers {
            server.validate()?;
        }

        for (name, authority) in &self.authorities {
            for server in &authority.xds_servers {
                server.validate().map_err(|e| {
                    BootstrapError::Invalid(format!("authority {:?}: {}", name, e))
                })?;
            }

            if let Some(template) = &authority.client_listener_resource_name_template {
                let prefix = format!("xdstp://{}/", name);
                if !template.starts_with(&prefix) {
                    return Err(BootstrapError::Invalid(format!(
                        "authority {:?}: listener template {:?} must start with {:?}",
                        name, template, prefix
                    )));
                }
            }
        }

        Ok(())
    }

    /// The management server clients connect to by default
    pub fn primary_server(&self) -> Option<&ServerConfig> {
        self.xds_servers.first()
    }
}

impl ServerConfig {
    fn validate(&self) -> Result<()> {
        if self.server_uri.is_empty() {
            return Err(BootstrapError::Invalid("server_uri must be non-empty".to_string()));
        }

        if !self
            .channel_creds
            .iter()
            .any(|c| SUPPORTED_CREDS.contains(&c.kind.as_str()))
        {
            return Err(BootstrapError::Invalid(format!(
                "server {:?} has no supported channel_creds (expected one of {:?})",
                self.server_uri, SUPPORTED_CREDS
            )));
        }

        Ok(())
    }

    /// Credential type the transport will use
    pub fn selected_creds(&self) -> Option<&str> {
        self.channel_creds
            .iter()
            .map(|c| c.kind.as_str())
            .find(|kind| SUPPORTED_CREDS.contains(kind))
    }
}

impl fmt::Display for BootstrapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string_pretty(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => write!(f, "{:?}", self),
        }
    }
}
