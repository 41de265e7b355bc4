use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};
use tracing_subscriber::fmt::init as tracing_init;
use xds_pool::{Pool, PoolMetrics};

const DEFAULT_CLIENT_NAME: &str = "xds-status";
const DEFAULT_INTERVAL_SECS: u64 = 30;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_init();

    info!("Starting xds-status...");

    let name = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CLIENT_NAME.to_string());
    let interval = std::env::var("XDS_STATUS_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or(Duration::from_secs(DEFAULT_INTERVAL_SECS));

    let config = xds_bootstrap::from_env()
        .context("Failed to load xDS bootstrap configuration")?
        .context("Set GRPC_XDS_BOOTSTRAP or GRPC_XDS_BOOTSTRAP_CONFIG")?;
    info!("Bootstrap node ID: {}", config.node.id);

    let metrics = PoolMetrics::new().context("Failed to create pool metrics")?;
    let pool = Pool::builder()
        .config(Some(Arc::new(config)))
        .metrics(metrics.clone())
        .build();

    let (client, release) = pool
        .new_client(&name)
        .context("Failed to acquire xDS client")?;
    info!("Acquired xDS client {:?} for node {:?}", name, client.node().id);

    let mut ticker = tokio::time::interval(interval);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = report(&pool, &metrics) {
                    error!("Error reporting xDS client status: {}", e);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received, exiting...");
                break;
            }
        }
    }

    release.release();
    debug!("Released xDS client; {} left in pool", pool.len());

    Ok(())
}

fn report(pool: &Pool, metrics: &PoolMetrics) -> Result<()> {
    let status = pool.dump_resources();
    info!("xDS client status: {}", serde_json::to_string(&status)?);
    debug!("Pool metrics:\n{}", metrics.gather()?);
    Ok(())
}
