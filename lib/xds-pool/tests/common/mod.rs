#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use xds_bootstrap::{BootstrapConfig, ChannelCreds, Node, ServerConfig};
use xds_client::{BackoffFn, ClientConfig, ClientFactory, XdsClient};

pub type CloseCallback = Arc<dyn Fn() + Send + Sync>;

pub fn bootstrap(node_id: &str) -> Arc<BootstrapConfig> {
    Arc::new(BootstrapConfig {
        xds_servers: vec![ServerConfig {
            server_uri: "cp.example.com:18000".to_string(),
            channel_creds: vec![ChannelCreds {
                kind: "insecure".to_string(),
                config: None,
            }],
            server_features: vec![],
        }],
        node: Node {
            id: node_id.to_string(),
            ..Default::default()
        },
        ..Default::default()
    })
}

pub struct CountingClient {
    node: Node,
    closes: Arc<AtomicUsize>,
    on_close: Option<CloseCallback>,
}

impl XdsClient for CountingClient {
    fn node(&self) -> &Node {
        &self.node
    }

    fn dump_resources(&self) -> ClientConfig {
        ClientConfig {
            node: Some(self.node.clone()),
            ..Default::default()
        }
    }

    fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
        if let Some(callback) = &self.on_close {
            callback();
        }
    }
}

/// Factory that counts builds and closes, optionally slowing construction
/// down to widen race windows.
#[derive(Default)]
pub struct CountingFactory {
    pub builds: AtomicUsize,
    pub closes: Arc<AtomicUsize>,
    pub build_delay: Duration,
    pub on_close: Mutex<Option<CloseCallback>>,
}

impl CountingFactory {
    pub fn with_delay(build_delay: Duration) -> Self {
        Self {
            build_delay,
            ..Default::default()
        }
    }

    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

impl ClientFactory for CountingFactory {
    fn build(
        &self,
        config: Arc<BootstrapConfig>,
        _watch_expiry_timeout: Duration,
        _stream_backoff: BackoffFn,
    ) -> xds_client::Result<Arc<dyn XdsClient>> {
        if !self.build_delay.is_zero() {
            thread::sleep(self.build_delay);
        }
        self.builds.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(CountingClient {
            node: config.node.clone(),
            closes: self.closes.clone(),
            on_close: self.on_close.lock().unwrap().clone(),
        }))
    }
}
