//! xDS bootstrap configuration
//!
//! This library provides:
//! - The bootstrap model shared by every xDS client in a process
//! - JSON parsing and validation
//! - Loading from the standard bootstrap environment variables

pub mod config;
pub mod env;
pub mod error;

pub use config::{Authority, BootstrapConfig, ChannelCreds, Locality, Node, ServerConfig};
pub use env::{from_env, from_sources, BOOTSTRAP_CONFIG_ENV, BOOTSTRAP_FILE_ENV};
pub use error::{BootstrapError, Result};
