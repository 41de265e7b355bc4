//! Capability interfaces consumed by client pools

use crate::{ClientConfig, Result};
use std::sync::Arc;
use std::time::Duration;
use xds_bootstrap::{BootstrapConfig, Node};

/// Watch expiry used when the caller does not supply one
pub const DEFAULT_WATCH_EXPIRY_TIMEOUT: Duration = Duration::from_secs(15);

/// Maps the number of consecutive stream failures to the delay before the
/// next attempt
pub type BackoffFn = Arc<dyn Fn(u32) -> Duration + Send + Sync>;

/// A long-lived connection to an xDS management server
pub trait XdsClient: Send + Sync {
    /// Node identity presented to the management server
    fn node(&self) -> &Node;

    /// Snapshot of every resource this client knows about.
    /// `client_scope` is left empty for the caller to fill in.
    fn dump_resources(&self) -> ClientConfig;

    /// Tear down the connection. Called at most once by a pool.
    fn close(&self);
}

/// Builds clients from a shared bootstrap configuration
pub trait ClientFactory: Send + Sync {
    fn build(
        &self,
        config: Arc<BootstrapConfig>,
        watch_expiry_timeout: Duration,
        stream_backoff: BackoffFn,
    ) -> Result<Arc<dyn XdsClient>>;
}
