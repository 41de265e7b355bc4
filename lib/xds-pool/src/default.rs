//! Process-wide default pool

use crate::Pool;
use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::{debug, warn};
use xds_bootstrap::BootstrapConfig;

static DEFAULT_POOL: Lazy<Pool> = Lazy::new(|| Pool::new(bootstrap_from_env()));

/// The default pool, configured on first use from the bootstrap environment
/// variables. When they are unset or invalid the pool starts without a
/// configuration and `Pool::set_fallback_bootstrap_config` must be called
/// before clients can be created.
pub fn default_pool() -> &'static Pool {
    &DEFAULT_POOL
}

fn bootstrap_from_env() -> Option<Arc<BootstrapConfig>> {
    match xds_bootstrap::from_env() {
        Ok(Some(config)) => Some(Arc::new(config)),
        Ok(None) => {
            debug!("No xDS bootstrap configuration in environment");
            None
        }
        Err(e) => {
            warn!("Failed to read xDS bootstrap configuration from environment: {}", e);
            None
        }
    }
}
