//! Reference-counted pool of named xDS clients

use crate::{PoolError, PoolHooks, PoolMetrics, ReleaseHandle, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, error, info};
use xds_bootstrap::BootstrapConfig;
use xds_client::{
    default_stream_backoff, BackoffFn, ClientFactory, ClientStatusResponse,
    ManagementClientFactory, XdsClient, DEFAULT_WATCH_EXPIRY_TIMEOUT,
};

/// Options for creating a client with non-default tunables
#[derive(Clone, Default)]
pub struct ClientOptions {
    /// Unique name of the client in the pool
    pub name: String,
    /// Watch expiry timeout, zero selects the default
    pub watch_expiry_timeout: Duration,
    /// Backoff after stream failures, `None` selects the default
    pub stream_backoff_after_failure: Option<BackoffFn>,
}

impl ClientOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_watch_expiry_timeout(mut self, timeout: Duration) -> Self {
        self.watch_expiry_timeout = timeout;
        self
    }

    pub fn with_stream_backoff(mut self, backoff: BackoffFn) -> Self {
        self.stream_backoff_after_failure = Some(backoff);
        self
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("name", &self.name)
            .field("watch_expiry_timeout", &self.watch_expiry_timeout)
            .field("stream_backoff_after_failure", &self.stream_backoff_after_failure.is_some())
            .finish()
    }
}

struct RefCountedClient {
    client: Arc<dyn XdsClient>,
    ref_count: usize,
}

impl RefCountedClient {
    fn incr_ref(&mut self) -> usize {
        self.ref_count += 1;
        self.ref_count
    }

    fn decr_ref(&mut self) -> usize {
        self.ref_count -= 1;
        self.ref_count
    }
}

struct PoolState {
    clients: HashMap<String, RefCountedClient>,
    config: Option<Arc<BootstrapConfig>>,
}

pub(crate) struct PoolInner {
    // guards config too, since the fallback setter writes it
    state: Mutex<PoolState>,
    factory: Arc<dyn ClientFactory>,
    hooks: PoolHooks,
    metrics: Option<PoolMetrics>,
}

impl PoolInner {
    fn lock(&self) -> MutexGuard<'_, PoolState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Drop one reference to `name`, closing the client when none remain
    pub(crate) fn release_client(&self, name: &str) {
        let client = {
            let mut state = self.lock();
            let remaining = match state.clients.get_mut(name) {
                Some(entry) => entry.decr_ref(),
                None => {
                    error!("Attempt to close a non-existent xDS client with name {:?}", name);
                    return;
                }
            };
            if remaining != 0 {
                debug!("Released xDS client {:?} ({} references left)", name, remaining);
                return;
            }
            match state.clients.remove(name) {
                Some(entry) => entry.client,
                None => return,
            }
        };

        // Closing may call back into the pool, so the lock must not be held.
        client.close();
        if let Some(metrics) = &self.metrics {
            metrics.record_closed();
        }
        self.hooks.closed(name);
        info!("Closed xDS client {:?}", name);
    }
}

/// Pool of xDS clients sharing one bootstrap configuration.
///
/// Cloning a `Pool` yields another handle to the same pool.
#[derive(Clone)]
pub struct Pool {
    inner: Arc<PoolInner>,
}

impl Pool {
    /// Create a pool building `ManagementClient`s from `config`.
    ///
    /// With `None`, client creation fails until a fallback configuration is
    /// set.
    pub fn new(config: Option<Arc<BootstrapConfig>>) -> Self {
        Self::builder().config(config).build()
    }

    pub fn builder() -> PoolBuilder {
        PoolBuilder::default()
    }

    /// Get the client named `name`, creating it with default tunables if it
    /// does not exist yet.
    ///
    /// The returned handle must be released once the caller is done with the
    /// client; releasing more than once is harmless.
    pub fn new_client(&self, name: &str) -> Result<(Arc<dyn XdsClient>, ReleaseHandle)> {
        self.new_ref_counted(name, DEFAULT_WATCH_EXPIRY_TIMEOUT, default_stream_backoff())
    }

    /// Like `new_client`, with caller-supplied tunables.
    ///
    /// The tunables only apply when this call creates the client; an existing
    /// client keeps the ones it was built with.
    pub fn new_client_with_options(
        &self,
        opts: ClientOptions,
    ) -> Result<(Arc<dyn XdsClient>, ReleaseHandle)> {
        if opts.name.is_empty() {
            return Err(PoolError::InvalidArgument(
                "client name must be non-empty".to_string(),
            ));
        }

        let watch_expiry_timeout = if opts.watch_expiry_timeout.is_zero() {
            DEFAULT_WATCH_EXPIRY_TIMEOUT
        } else {
            opts.watch_expiry_timeout
        };
        let stream_backoff = opts
            .stream_backoff_after_failure
            .unwrap_or_else(default_stream_backoff);

        self.new_ref_counted(&opts.name, watch_expiry_timeout, stream_backoff)
    }

    /// Get an existing client without creating one
    pub fn get_client(&self, name: &str) -> Result<(Arc<dyn XdsClient>, ReleaseHandle)> {
        let mut state = self.inner.lock();
        let entry = state
            .clients
            .get_mut(name)
            .ok_or_else(|| PoolError::NotFound(name.to_string()))?;

        let count = entry.incr_ref();
        if let Some(metrics) = &self.inner.metrics {
            metrics.record_hit();
        }
        debug!("Acquired existing xDS client {:?} ({} references)", name, count);
        Ok((entry.client.clone(), ReleaseHandle::new(self.inner.clone(), name)))
    }

    /// Set the configuration used when none was given at construction.
    /// Clients that already exist are unaffected.
    pub fn set_fallback_bootstrap_config(&self, config: Option<Arc<BootstrapConfig>>) {
        let mut state = self.inner.lock();
        state.config = config;
    }

    /// Status of every live client, tagged with its name
    pub fn dump_resources(&self) -> ClientStatusResponse {
        let state = self.inner.lock();

        let mut resp = ClientStatusResponse::default();
        for (name, entry) in &state.clients {
            let mut cfg = entry.client.dump_resources();
            cfg.client_scope = name.clone();
            resp.config.push(cfg);
        }
        resp.config.sort_by(|a, b| a.client_scope.cmp(&b.client_scope));
        resp
    }

    /// Number of live clients
    pub fn len(&self) -> usize {
        self.inner.lock().clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.lock().clients.contains_key(name)
    }

    /// Outstanding leases on `name`, `None` if no such client is live
    pub fn ref_count(&self, name: &str) -> Option<usize> {
        self.inner.lock().clients.get(name).map(|entry| entry.ref_count)
    }

    /// Metrics attached to this pool, if any
    pub fn metrics(&self) -> Option<&PoolMetrics> {
        self.inner.metrics.as_ref()
    }

    fn new_ref_counted(
        &self,
        name: &str,
        watch_expiry_timeout: Duration,
        stream_backoff: BackoffFn,
    ) -> Result<(Arc<dyn XdsClient>, ReleaseHandle)> {
        let client = {
            let mut state = self.inner.lock();

            let config = match &state.config {
                Some(config) => config.clone(),
                None => {
                    if let Some(metrics) = &self.inner.metrics {
                        metrics.record_error();
                    }
                    return Err(PoolError::ConfigurationMissing);
                }
            };

            if let Some(entry) = state.clients.get_mut(name) {
                let count = entry.incr_ref();
                if let Some(metrics) = &self.inner.metrics {
                    metrics.record_hit();
                }
                debug!("Reusing xDS client {:?} ({} references)", name, count);
                return Ok((entry.client.clone(), ReleaseHandle::new(self.inner.clone(), name)));
            }

            let client = self
                .inner
                .factory
                .build(config.clone(), watch_expiry_timeout, stream_backoff)
                .map_err(|source| {
                    if let Some(metrics) = &self.inner.metrics {
                        metrics.record_error();
                    }
                    PoolError::ConstructionFailed {
                        name: name.to_string(),
                        source,
                    }
                })?;

            debug!(
                "Created client with name {:?} and bootstrap configuration:\n{}",
                name, config
            );
            state.clients.insert(
                name.to_string(),
                RefCountedClient {
                    client: client.clone(),
                    ref_count: 1,
                },
            );
            info!("xDS node ID: {}", config.node.id);
            client
        };

        // The new lease keeps the client alive, so no close can overtake this.
        if let Some(metrics) = &self.inner.metrics {
            metrics.record_created();
        }
        self.inner.hooks.created(name);

        Ok((client, ReleaseHandle::new(self.inner.clone(), name)))
    }
}

impl fmt::Debug for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("Pool")
            .field("clients", &state.clients.len())
            .field("configured", &state.config.is_some())
            .finish()
    }
}

/// Builder for `Pool`
pub struct PoolBuilder {
    config: Option<Arc<BootstrapConfig>>,
    factory: Arc<dyn ClientFactory>,
    hooks: PoolHooks,
    metrics: Option<PoolMetrics>,
}

impl Default for PoolBuilder {
    fn default() -> Self {
        Self {
            config: None,
            factory: Arc::new(ManagementClientFactory),
            hooks: PoolHooks::default(),
            metrics: None,
        }
    }
}

impl PoolBuilder {
    pub fn config(mut self, config: Option<Arc<BootstrapConfig>>) -> Self {
        self.config = config;
        self
    }

    /// Replace the factory used to build clients
    pub fn factory(mut self, factory: Arc<dyn ClientFactory>) -> Self {
        self.factory = factory;
        self
    }

    pub fn hooks(mut self, hooks: PoolHooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn metrics(mut self, metrics: PoolMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn build(self) -> Pool {
        Pool {
            inner: Arc::new(PoolInner {
                state: Mutex::new(PoolState {
                    clients: HashMap::new(),
                    config: self.config,
                }),
                factory: self.factory,
                hooks: self.hooks,
                metrics: self.metrics,
            }),
        }
    }
}
