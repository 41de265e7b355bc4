//! Prometheus metrics for client pools

use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// Counters describing pool activity
#[derive(Clone)]
pub struct PoolMetrics {
    /// Clients currently held in the pool
    pub clients_active: IntGauge,
    /// Clients constructed over the pool's lifetime
    pub clients_created_total: IntCounter,
    /// Clients closed after their last release
    pub clients_closed_total: IntCounter,
    /// Acquire attempts by outcome (hit, miss, error)
    pub acquires_total: IntCounterVec,
    /// Prometheus registry for metrics
    pub registry: Arc<Registry>,
}

impl PoolMetrics {
    /// Create metrics registered in a fresh registry
    pub fn new() -> prometheus::Result<Self> {
        Self::with_registry(Arc::new(Registry::new()))
    }

    /// Create metrics registered in an existing registry
    pub fn with_registry(registry: Arc<Registry>) -> prometheus::Result<Self> {
        let clients_active = IntGauge::new("xds_pool_clients_active", "xDS clients currently in the pool")?;
        let clients_created_total =
            IntCounter::new("xds_pool_clients_created_total", "Total xDS clients created")?;
        let clients_closed_total =
            IntCounter::new("xds_pool_clients_closed_total", "Total xDS clients closed")?;
        let acquires_total = IntCounterVec::new(
            Opts::new("xds_pool_acquires_total", "xDS client acquire attempts by outcome"),
            &["outcome"],
        )?;

        registry.register(Box::new(clients_active.clone()))?;
        registry.register(Box::new(clients_created_total.clone()))?;
        registry.register(Box::new(clients_closed_total.clone()))?;
        registry.register(Box::new(acquires_total.clone()))?;

        Ok(Self {
            clients_active,
            clients_created_total,
            clients_closed_total,
            acquires_total,
            registry,
        })
    }

    pub(crate) fn record_hit(&self) {
        self.acquires_total.with_label_values(&["hit"]).inc();
    }

    pub(crate) fn record_created(&self) {
        self.acquires_total.with_label_values(&["miss"]).inc();
        self.clients_created_total.inc();
        self.clients_active.inc();
    }

    pub(crate) fn record_error(&self) {
        self.acquires_total.with_label_values(&["error"]).inc();
    }

    pub(crate) fn record_closed(&self) {
        self.clients_closed_total.inc();
        self.clients_active.dec();
    }

    /// Gather all metrics in Prometheus text format
    pub fn gather(&self) -> prometheus::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = vec![];
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
