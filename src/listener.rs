//! Pool manager event notifications

use crate::{Address, Error};

/// Receives pool lifecycle events from a [`PoolManager`](crate::PoolManager)
///
/// All methods default to no-ops. Implementations are called from connector
/// tasks and must not block.
///
/// `on_pool_up` and `on_pool_critical_error` run while the initializer holds
/// its aggregation lock. They must not call back into the
/// [`Initialization`](crate::Initialization) handle (`failures`, `manager`,
/// `release_manager`), which would deadlock.
pub trait PoolManagerListener: Send + Sync {
    /// A pool for `address` was added to the manager
    fn on_pool_up(&self, _address: &Address) {}

    /// The pool for `address` was closed
    fn on_pool_down(&self, _address: &Address) {}

    /// Connecting to `address` failed with an error that retrying will not fix
    fn on_pool_critical_error(&self, _address: &Address, _error: &Error) {}
}
