//! Connection pools and parallel pool initialization
//!
//! This module provides:
//! * Per-host connection pools
//! * Pool connectors (one connect attempt per host)
//! * The pool manager that owns every established pool
//! * The initializer that fans connectors out and reports once

mod connector;
mod host_pool;
mod initializer;
mod manager;
mod state;

pub use connector::{ConnectFailure, PoolConnector};
pub use host_pool::ConnectionPool;
pub use initializer::{Initialization, PoolManagerInitializer, Protected};
pub use manager::PoolManager;
pub use state::ConnectorState;

use std::sync::{Mutex, MutexGuard, PoisonError};

// A panicking listener or callback must not wedge the aggregate state
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
