//! Pool manager: owns one established pool per host

use super::connector::ConnectFailure;
use super::host_pool::ConnectionPool;
use super::initializer::Protected;
use super::lock;
use crate::connection::Connect;
use crate::{Address, Metrics, PoolManagerListener, PoolManagerSettings};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, RwLock};
use tokio::runtime::Handle;

#[derive(Default)]
struct Pools {
    by_address: HashMap<Address, ConnectionPool>,
    closed: bool,
}

/// Aggregate owner of all established pools
///
/// Pools can only be added by a [`PoolManagerInitializer`](super::PoolManagerInitializer)
/// while it is running; see [`Protected`].
pub struct PoolManager {
    runtime: Handle,
    protocol_version: u8,
    keyspace: RwLock<Option<String>>,
    listener: Option<Arc<dyn PoolManagerListener>>,
    metrics: Arc<dyn Metrics>,
    settings: PoolManagerSettings,
    connector: Arc<dyn Connect>,
    pools: Mutex<Pools>,
}

impl PoolManager {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        runtime: Handle,
        protocol_version: u8,
        keyspace: Option<String>,
        listener: Option<Arc<dyn PoolManagerListener>>,
        metrics: Arc<dyn Metrics>,
        settings: PoolManagerSettings,
        connector: Arc<dyn Connect>,
    ) -> Self {
        Self {
            runtime,
            protocol_version,
            keyspace: RwLock::new(keyspace),
            listener,
            metrics,
            settings,
            connector,
            pools: Mutex::new(Pools::default()),
        }
    }

    /// Insert an established pool
    ///
    /// If a pool for the same address is already present, the existing pool
    /// is kept and `pool` is closed. A closed manager closes every pool it is
    /// handed.
    pub fn add_pool(&self, pool: ConnectionPool, _token: Protected) {
        let address = pool.address().clone();

        let rejected = {
            let mut pools = lock(&self.pools);
            if pools.closed || pools.by_address.contains_key(&address) {
                Some(pool)
            } else {
                pools.by_address.insert(address.clone(), pool);
                None
            }
        };

        match rejected {
            Some(pool) => {
                tracing::debug!(%address, "pool rejected (duplicate or manager closed)");
                pool.close();
            }
            None => {
                tracing::info!(%address, "pool up");
                if let Some(listener) = &self.listener {
                    listener.on_pool_up(&address);
                }
            }
        }
    }

    /// Forward a connect failure to the listener when it is critical
    pub(crate) fn notify_failure(&self, failure: &ConnectFailure) {
        if !failure.is_critical() {
            return;
        }
        if let Some(listener) = &self.listener {
            listener.on_pool_critical_error(failure.address(), failure.error());
        }
    }

    /// Close every owned pool
    ///
    /// Idempotent. Pools added afterwards are closed immediately.
    pub fn close(&self) {
        let drained: Vec<ConnectionPool> = {
            let mut pools = lock(&self.pools);
            if pools.closed {
                return;
            }
            pools.closed = true;
            pools.by_address.drain().map(|(_, pool)| pool).collect()
        };

        tracing::info!(pools = drained.len(), "closing pool manager");
        for pool in drained {
            let address = pool.address().clone();
            pool.close();
            self.metrics.pool_closed(&address);
            if let Some(listener) = &self.listener {
                listener.on_pool_down(&address);
            }
        }
    }

    /// Whether `close()` has been called
    pub fn is_closed(&self) -> bool {
        lock(&self.pools).closed
    }

    /// Number of pools held
    pub fn pool_count(&self) -> usize {
        lock(&self.pools).by_address.len()
    }

    /// Addresses with an established pool, sorted
    pub fn addresses(&self) -> Vec<Address> {
        let mut addresses: Vec<Address> = lock(&self.pools).by_address.keys().cloned().collect();
        addresses.sort();
        addresses
    }

    /// Whether a pool for `address` is held
    pub fn contains(&self, address: &Address) -> bool {
        lock(&self.pools).by_address.contains_key(address)
    }

    /// Number of connections in the pool for `address`
    pub fn connection_count(&self, address: &Address) -> Option<usize> {
        lock(&self.pools).by_address.get(address).map(ConnectionPool::len)
    }

    /// Current keyspace
    pub fn keyspace(&self) -> Option<String> {
        self.keyspace
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Replace the keyspace
    pub fn set_keyspace(&self, keyspace: impl Into<String>) {
        *self
            .keyspace
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(keyspace.into());
    }

    /// Protocol version pools are opened with
    pub fn protocol_version(&self) -> u8 {
        self.protocol_version
    }

    /// Settings
    pub fn settings(&self) -> &PoolManagerSettings {
        &self.settings
    }

    /// Event listener, if any
    pub fn listener(&self) -> Option<&Arc<dyn PoolManagerListener>> {
        self.listener.as_ref()
    }

    /// Metrics handle
    pub fn metrics(&self) -> &dyn Metrics {
        self.metrics.as_ref()
    }

    pub(crate) fn connector(&self) -> &dyn Connect {
        self.connector.as_ref()
    }

    pub(crate) fn runtime(&self) -> &Handle {
        &self.runtime
    }
}

impl fmt::Debug for PoolManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolManager")
            .field("protocol_version", &self.protocol_version)
            .field("keyspace", &self.keyspace())
            .field("settings", &self.settings)
            .field("addresses", &self.addresses())
            .field("closed", &self.is_closed())
            .finish()
    }
}
