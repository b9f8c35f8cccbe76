//! Histogram recording functions

use super::labels;

/// Record how long one pool took to establish
pub fn pool_connect_duration(host: &str, duration_ms: u64) {
    metrics::histogram!(labels::POOL_CONNECT_DURATION, labels::HOST => host.to_string())
        .record(duration_ms as f64);
}

/// Record how long a whole initialization took
pub fn initialization_duration(duration_ms: u64) {
    metrics::histogram!(labels::INITIALIZATION_DURATION).record(duration_ms as f64);
}
