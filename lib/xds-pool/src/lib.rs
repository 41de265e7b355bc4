//! Shared, reference-counted pool of xDS clients
//!
//! This library provides:
//! - A pool handing out one client per name to many callers
//! - Idempotent release handles; the last release closes the client
//! - Aggregate status dumps across all live clients
//! - A process-wide default pool configured from the environment

pub mod default;
pub mod error;
pub mod hooks;
pub mod metrics;
pub mod pool;
pub mod release;

pub use default::default_pool;
pub use error::{PoolError, Result};
pub use hooks::PoolHooks;
pub use metrics::PoolMetrics;
pub use pool::{ClientOptions, Pool, PoolBuilder};
pub use release::ReleaseHandle;
