//! Metrics
//!
//! The initializer reports through a [`Metrics`] handle. [`GlobalMetrics`]
//! forwards to the `metrics` crate facade, so whatever recorder the
//! application installs (Prometheus, StatsD, ...) receives the samples.

pub mod counters;
pub mod histograms;
pub mod labels;

use crate::{Address, Error};
use std::time::Duration;

/// Counter/histogram recording handle passed to the pool manager
///
/// All methods default to no-ops.
pub trait Metrics: Send + Sync {
    /// A connector started connecting to `address`
    fn pool_connect_attempted(&self, _address: &Address) {}

    /// A pool for `address` was established
    fn pool_connect_succeeded(&self, _address: &Address, _elapsed: Duration) {}

    /// Connecting to `address` failed
    fn pool_connect_failed(&self, _address: &Address, _error: &Error) {}

    /// The pool for `address` was closed
    fn pool_closed(&self, _address: &Address) {}

    /// An initialization finished
    fn initialization_completed(&self, _succeeded: usize, _failed: usize, _elapsed: Duration) {}
}

/// Forwards to the global `metrics` recorder
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalMetrics;

impl Metrics for GlobalMetrics {
    fn pool_connect_attempted(&self, address: &Address) {
        counters::pool_connect_attempted(&address.to_string());
    }

    fn pool_connect_succeeded(&self, address: &Address, elapsed: Duration) {
        let host = address.to_string();
        counters::pool_connect_succeeded(&host);
        histograms::pool_connect_duration(&host, elapsed.as_millis() as u64);
    }

    fn pool_connect_failed(&self, address: &Address, error: &Error) {
        counters::pool_connect_failed(&address.to_string(), error.category());
    }

    fn pool_closed(&self, address: &Address) {
        counters::pool_closed(&address.to_string());
    }

    fn initialization_completed(&self, succeeded: usize, failed: usize, elapsed: Duration) {
        let outcome = match (succeeded, failed) {
            (_, 0) => labels::OUTCOME_COMPLETE,
            (0, _) => labels::OUTCOME_FAILED,
            _ => labels::OUTCOME_PARTIAL,
        };
        counters::initialization_completed(outcome);
        histograms::initialization_duration(elapsed.as_millis() as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // No recorder is installed in unit tests; the facade must be a silent no-op.
    #[test]
    fn test_global_metrics_without_recorder() {
        let metrics = GlobalMetrics;
        let addr = Address::new("10.0.0.1", 9042);
        metrics.pool_connect_attempted(&addr);
        metrics.pool_connect_succeeded(&addr, Duration::from_millis(3));
        metrics.pool_connect_failed(&addr, &Error::Connection("refused".into()));
        metrics.pool_closed(&addr);
        metrics.initialization_completed(1, 1, Duration::from_millis(7));
    }
}
