//! Counter recording functions

use super::labels;

/// Record the start of a pool connect attempt
pub fn pool_connect_attempted(host: &str) {
    metrics::counter!(labels::POOL_CONNECT_ATTEMPTED, labels::HOST => host.to_string()).increment(1);
}

/// Record an established pool
pub fn pool_connect_succeeded(host: &str) {
    metrics::counter!(labels::POOL_CONNECT_SUCCEEDED, labels::HOST => host.to_string()).increment(1);
}

/// Record a failed pool connect attempt
pub fn pool_connect_failed(host: &str, category: &'static str) {
    metrics::counter!(
        labels::POOL_CONNECT_FAILED,
        labels::HOST => host.to_string(),
        labels::ERROR_CATEGORY => category
    )
    .increment(1);
}

/// Record a closed pool
pub fn pool_closed(host: &str) {
    metrics::counter!(labels::POOL_CLOSED, labels::HOST => host.to_string()).increment(1);
}

/// Record a completed initialization
pub fn initialization_completed(outcome: &'static str) {
    metrics::counter!(labels::INITIALIZATIONS_COMPLETED, labels::OUTCOME => outcome).increment(1);
}
