//! Lifecycle callbacks for pooled clients

use std::fmt;
use std::sync::Arc;

type Hook = Arc<dyn Fn(&str) + Send + Sync>;

/// Callbacks fired when a named client is created or finally closed.
///
/// Both run without the pool lock held and may call back into the pool.
/// Return values are never consulted.
#[derive(Clone, Default)]
pub struct PoolHooks {
    on_create: Option<Hook>,
    on_close: Option<Hook>,
}

impl PoolHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called after a new client has been inserted into the pool
    pub fn on_create<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_create = Some(Arc::new(hook));
        self
    }

    /// Called after the last lease was released and the client closed
    pub fn on_close<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_close = Some(Arc::new(hook));
        self
    }

    pub(crate) fn created(&self, name: &str) {
        if let Some(hook) = &self.on_create {
            hook(name);
        }
    }

    pub(crate) fn closed(&self, name: &str) {
        if let Some(hook) = &self.on_close {
            hook(name);
        }
    }
}

impl fmt::Debug for PoolHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolHooks")
            .field("on_create", &self.on_create.is_some())
            .field("on_close", &self.on_close.is_some())
            .finish()
    }
}
