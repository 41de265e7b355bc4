use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("No management servers in bootstrap configuration")]
    NoServers,

    #[error("Invalid management server URI: {0}")]
    InvalidServerUri(String),

    #[error("xDS client is closed")]
    Closed,

    #[error("Internal error: {0}")]
    Internal(String),
}
