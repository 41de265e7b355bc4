//! Bootstrap loading from environment variables

use crate::{BootstrapConfig, BootstrapError, Result};
use std::fs;
use tracing::debug;

/// Path to a bootstrap file, takes precedence over the inline variant
pub const BOOTSTRAP_FILE_ENV: &str = "GRPC_XDS_BOOTSTRAP";

/// Inline bootstrap JSON
pub const BOOTSTRAP_CONFIG_ENV: &str = "GRPC_XDS_BOOTSTRAP_CONFIG";

/// Load the bootstrap configuration from the process environment.
///
/// Returns `Ok(None)` when neither variable is set.
pub fn from_env() -> Result<Option<BootstrapConfig>> {
    from_sources(
        std::env::var(BOOTSTRAP_FILE_ENV).ok(),
        std::env::var(BOOTSTRAP_CONFIG_ENV).ok(),
    )
}

/// Resolve a bootstrap configuration from an optional file path and optional
/// inline contents.
pub fn from_sources(file: Option<String>, contents: Option<String>) -> Result<Option<BootstrapConfig>> {
    if let Some(path) = file.filter(|p| !p.is_empty()) {
        debug!("Reading xDS bootstrap file {}", path);
        let raw = fs::read_to_string(&path).map_err(|source| BootstrapError::Io {
            path: path.clone(),
            source,
        })?;
        return BootstrapConfig::from_json(&raw).map(Some);
    }

    if let Some(raw) = contents.filter(|c| !c.is_empty()) {
        debug!("Using inline xDS bootstrap configuration");
        return BootstrapConfig::from_json(&raw).map(Some);
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const VALID: &str = r#"{"xds_servers": [{"server_uri": "cp:18000", "channel_creds": [{"type": "insecure"}]}], "node": {"id": "from-file"}}"#;

    #[test]
    fn test_nothing_set() {
        assert!(from_sources(None, None).unwrap().is_none());
        assert!(from_sources(Some(String::new()), Some(String::new())).unwrap().is_none());
    }

    #[test]
    fn test_file_takes_precedence() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(VALID.as_bytes()).unwrap();
        let path = file.path().to_string_lossy().to_string();

        let inline = VALID.replace("from-file", "inline");
        let config = from_sources(Some(path), Some(inline)).unwrap().unwrap();
        assert_eq!(config.node.id, "from-file");
    }

    #[test]
    fn test_inline_contents() {
        let config = from_sources(None, Some(VALID.to_string())).unwrap().unwrap();
        assert_eq!(config.xds_servers[0].server_uri, "cp:18000");
    }

    #[test]
    fn test_missing_file() {
        let err = from_sources(Some("/nonexistent/bootstrap.json".to_string()), None).unwrap_err();
        assert!(matches!(err, BootstrapError::Io { .. }));
    }
}
