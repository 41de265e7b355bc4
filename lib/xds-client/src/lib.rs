//! xDS client capability and the default management-server client
//!
//! This library provides:
//! - The narrow `XdsClient` / `ClientFactory` interfaces a client pool depends on
//! - `ManagementClient`, the default client implementation
//! - Exponential stream backoff used after stream failures
//! - Client status snapshot types

pub mod backoff;
pub mod client;
pub mod error;
pub mod management;
pub mod status;

pub use backoff::{default_stream_backoff, ExponentialBackoff};
pub use client::{BackoffFn, ClientFactory, XdsClient, DEFAULT_WATCH_EXPIRY_TIMEOUT};
pub use error::{ClientError, Result};
pub use management::{ManagementClient, ManagementClientFactory};
pub use status::{ClientConfig, ClientResourceStatus, ClientStatusResponse, GenericXdsConfig};
