use thiserror::Error;
use xds_client::ClientError;

pub type Result<T> = std::result::Result<T, PoolError>;

#[derive(Error, Debug)]
pub enum PoolError {
    #[error("Bootstrap configuration not set in the pool")]
    ConfigurationMissing,

    #[error("xDS client not found: {0}")]
    NotFound(String),

    #[error("Failed to create xDS client {name}: {source}")]
    ConstructionFailed {
        name: String,
        #[source]
        source: ClientError,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
