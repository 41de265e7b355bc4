//! Exponential backoff for stream reconnects

use crate::BackoffFn;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

/// Exponential backoff parameters
#[derive(Clone, Debug, PartialEq)]
pub struct ExponentialBackoff {
    /// Delay after the first failure
    pub base_delay: Duration,
    /// Factor applied per additional failure
    pub multiplier: f64,
    /// Randomization factor, the delay is scaled by 1 ± jitter
    pub jitter: f64,
    /// Upper bound before jitter
    pub max_delay: Duration,
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_secs(1),
            multiplier: 1.6,
            jitter: 0.2,
            max_delay: Duration::from_secs(120),
        }
    }
}

impl ExponentialBackoff {
    /// Delay before retry number `retries`
    pub fn backoff(&self, retries: u32) -> Duration {
        if retries == 0 {
            return self.base_delay;
        }

        let max = self.max_delay.as_secs_f64();
        let mut delay = self.base_delay.as_secs_f64();
        let mut remaining = retries;
        while delay < max && remaining > 0 {
            delay *= self.multiplier;
            remaining -= 1;
        }
        if delay > max {
            delay = max;
        }

        delay *= 1.0 + self.jitter * (rand::thread_rng().gen::<f64>() * 2.0 - 1.0);
        if delay < 0.0 {
            return Duration::ZERO;
        }
        // Out of range or NaN after jitter falls back to the cap.
        Duration::try_from_secs_f64(delay).unwrap_or(self.max_delay)
    }

    /// Wrap this policy as a shareable backoff function
    pub fn into_fn(self) -> BackoffFn {
        Arc::new(move |retries| self.backoff(retries))
    }
}

/// Backoff applied after stream failures when the caller does not supply one
pub fn default_stream_backoff() -> BackoffFn {
    ExponentialBackoff::default().into_fn()
}
