use thiserror::Error;

pub type Result<T> = std::result::Result<T, BootstrapError>;

#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("Failed to read bootstrap file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed bootstrap JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid bootstrap configuration: {0}")]
    Invalid(String),
}
