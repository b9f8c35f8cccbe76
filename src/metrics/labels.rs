//! Metric names and label values

/// Pool connect attempts, labelled by host
pub const POOL_CONNECT_ATTEMPTED: &str = "wirepool_pool_connect_attempted_total";
/// Pools established, labelled by host
pub const POOL_CONNECT_SUCCEEDED: &str = "wirepool_pool_connect_succeeded_total";
/// Pool connect failures, labelled by host and error category
pub const POOL_CONNECT_FAILED: &str = "wirepool_pool_connect_failed_total";
/// Pools closed, labelled by host
pub const POOL_CLOSED: &str = "wirepool_pool_closed_total";
/// Completed initializations, labelled by outcome
pub const INITIALIZATIONS_COMPLETED: &str = "wirepool_initializations_completed_total";

/// Time to establish one pool (ms)
pub const POOL_CONNECT_DURATION: &str = "wirepool_pool_connect_duration_ms";
/// Time from `initialize` to callback (ms)
pub const INITIALIZATION_DURATION: &str = "wirepool_initialization_duration_ms";

/// Label key: host address
pub const HOST: &str = "host";
/// Label key: error category
pub const ERROR_CATEGORY: &str = "error_category";
/// Label key: initialization outcome
pub const OUTCOME: &str = "outcome";

/// Every address connected
pub const OUTCOME_COMPLETE: &str = "complete";
/// Some addresses failed
pub const OUTCOME_PARTIAL: &str = "partial";
/// No address connected
pub const OUTCOME_FAILED: &str = "failed";
