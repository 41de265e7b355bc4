//! Release handles for pooled clients

use crate::pool::PoolInner;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A caller's lease on a named client.
///
/// `release` gives the lease back to the pool. Only the first call has an
/// effect, including when clones of the same handle race from several
/// threads. Dropping the handle does not release the lease; a lease that is
/// never released keeps the client alive.
#[derive(Clone)]
#[must_use = "the client stays alive until `release` is called on this handle"]
pub struct ReleaseHandle {
    lease: Arc<Lease>,
}

struct Lease {
    pool: Arc<PoolInner>,
    name: String,
    released: AtomicBool,
}

impl ReleaseHandle {
    pub(crate) fn new(pool: Arc<PoolInner>, name: &str) -> Self {
        Self {
            lease: Arc::new(Lease {
                pool,
                name: name.to_string(),
                released: AtomicBool::new(false),
            }),
        }
    }

    /// Give the lease back. Safe to call any number of times.
    pub fn release(&self) {
        self.lease.release();
    }

    pub fn is_released(&self) -> bool {
        self.lease.released.load(Ordering::Acquire)
    }

    /// Name of the client this lease refers to
    pub fn name(&self) -> &str {
        &self.lease.name
    }
}

impl Lease {
    fn release(&self) {
        if self.released.swap(true, Ordering::AcqRel) {
            return;
        }
        self.pool.release_client(&self.name);
    }
}

impl fmt::Debug for ReleaseHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReleaseHandle")
            .field("name", &self.lease.name)
            .field("released", &self.is_released())
            .finish()
    }
}
