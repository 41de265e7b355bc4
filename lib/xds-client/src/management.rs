//! Default xDS client backed by a management server

use crate::{
    BackoffFn, ClientConfig, ClientError, ClientFactory, ClientResourceStatus, GenericXdsConfig,
    Result, XdsClient,
};
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;
use xds_bootstrap::{BootstrapConfig, Node};

/// ManagementClient holds the connection parameters and resource cache for
/// one management server session
pub struct ManagementClient {
    id: Uuid,
    config: Arc<BootstrapConfig>,
    server_uri: String,
    watch_expiry_timeout: Duration,
    stream_backoff: BackoffFn,
    // keyed by (type_url, name)
    resources: RwLock<BTreeMap<(String, String), GenericXdsConfig>>,
    closed: AtomicBool,
}

impl ManagementClient {
    /// Create a client for the primary server in `config`
    pub fn new(
        config: Arc<BootstrapConfig>,
        watch_expiry_timeout: Duration,
        stream_backoff: BackoffFn,
    ) -> Result<Self> {
        let server = config.primary_server().ok_or(ClientError::NoServers)?;
        let server_uri = server.server_uri.trim().to_string();
        if server_uri.is_empty() || server_uri.contains(char::is_whitespace) {
            return Err(ClientError::InvalidServerUri(server.server_uri.clone()));
        }

        let id = Uuid::new_v4();
        debug!(
            "Created xDS client {} for {} (creds: {:?}, watch expiry: {:?})",
            id,
            server_uri,
            server.selected_creds(),
            watch_expiry_timeout
        );

        Ok(Self {
            id,
            config,
            server_uri,
            watch_expiry_timeout,
            stream_backoff,
            resources: RwLock::new(BTreeMap::new()),
            closed: AtomicBool::new(false),
        })
    }

    /// Unique id of this client instance
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Management server this client talks to
    pub fn server_uri(&self) -> &str {
        &self.server_uri
    }

    pub fn watch_expiry_timeout(&self) -> Duration {
        self.watch_expiry_timeout
    }

    /// Delay before reconnecting after `failures` consecutive stream failures
    pub fn stream_backoff(&self, failures: u32) -> Duration {
        (self.stream_backoff)(failures)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Record the latest state of a resource received from the server
    pub fn update_resource(
        &self,
        type_url: &str,
        name: &str,
        version_info: &str,
        status: ClientResourceStatus,
    ) -> Result<()> {
        if self.is_closed() {
            return Err(ClientError::Closed);
        }

        let entry = GenericXdsConfig {
            type_url: type_url.to_string(),
            name: name.to_string(),
            version_info: version_info.to_string(),
            client_status: status,
            last_updated: Some(Utc::now()),
        };

        let mut resources = self.resources.write().unwrap_or_else(|e| e.into_inner());
        resources.insert((type_url.to_string(), name.to_string()), entry);
        Ok(())
    }
}

impl XdsClient for ManagementClient {
    fn node(&self) -> &Node {
        &self.config.node
    }

    fn dump_resources(&self) -> ClientConfig {
        let resources = self.resources.read().unwrap_or_else(|e| e.into_inner());
        ClientConfig {
            client_scope: String::new(),
            node: Some(self.config.node.clone()),
            generic_xds_configs: resources.values().cloned().collect(),
        }
    }

    fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        self.resources
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
        info!("Closed xDS client {} for {}", self.id, self.server_uri);
    }
}

/// Factory for `ManagementClient`
#[derive(Clone, Debug, Default)]
pub struct ManagementClientFactory;

impl ClientFactory for ManagementClientFactory {
    fn build(
        &self,
        config: Arc<BootstrapConfig>,
        watch_expiry_timeout: Duration,
        stream_backoff: BackoffFn,
    ) -> Result<Arc<dyn XdsClient>> {
        let client = ManagementClient::new(config, watch_expiry_timeout, stream_backoff)?;
        Ok(Arc::new(client))
    }
}
