//! Pool connector: one in-flight attempt to establish a pool for one address

use super::host_pool::ConnectionPool;
use super::manager::PoolManager;
use super::state::ConnectorState;
use crate::{Address, Error, Result};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

/// A failed pool connect attempt, as recorded in the failure list
#[derive(Debug, Clone)]
pub struct ConnectFailure {
    address: Address,
    error: Arc<Error>,
}

impl ConnectFailure {
    /// Address that could not be connected
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Underlying error
    pub fn error(&self) -> &Error {
        &self.error
    }

    /// Human-readable failure reason
    pub fn reason(&self) -> String {
        self.error.to_string()
    }

    /// Whether retrying the same host is pointless
    pub fn is_critical(&self) -> bool {
        self.error.is_critical()
    }
}

/// Establishes the pool for a single address
///
/// Opens `connections_per_host` connections concurrently through the
/// manager's [`Connect`](crate::Connect) implementation, each bounded by
/// `connect_timeout`. Any failed connection fails the whole attempt, and
/// settings that do not pass [`validate`](crate::PoolManagerSettings::validate)
/// fail it with [`Error::Config`].
pub struct PoolConnector {
    manager: Arc<PoolManager>,
    address: Address,
    state: ConnectorState,
    pool: Option<ConnectionPool>,
    error: Option<Arc<Error>>,
}

impl PoolConnector {
    /// Create a pending connector bound to `manager`
    pub fn new(manager: Arc<PoolManager>, address: Address) -> Self {
        Self {
            manager,
            address,
            state: ConnectorState::Pending,
            pool: None,
            error: None,
        }
    }

    /// Start connecting on the manager's runtime
    ///
    /// `on_connect` is invoked exactly once, with the resolved connector,
    /// from the spawned task.
    pub fn connect<F>(self, on_connect: F)
    where
        F: FnOnce(PoolConnector) + Send + 'static,
    {
        let span = tracing::info_span!("pool_connect", address = %self.address);
        let runtime = self.manager.runtime().clone();

        runtime.spawn(
            async move {
                let mut connector = self;
                connector.run().await;
                on_connect(connector);
            }
            .instrument(span),
        );
    }

    async fn run(&mut self) {
        let manager = Arc::clone(&self.manager);
        manager.metrics().pool_connect_attempted(&self.address);
        let start = Instant::now();

        match establish(&manager, &self.address).await {
            Ok(pool) => {
                let elapsed = start.elapsed();
                tracing::debug!(
                    connections = pool.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "pool established"
                );
                manager
                    .metrics()
                    .pool_connect_succeeded(&self.address, elapsed);
                self.pool = Some(pool);
                self.resolve(ConnectorState::Ok);
            }
            Err(e) => {
                tracing::warn!(error = %e, "pool connect failed");
                manager.metrics().pool_connect_failed(&self.address, &e);
                self.error = Some(Arc::new(e));
                self.resolve(ConnectorState::Failed);
            }
        }
    }

    fn resolve(&mut self, next: ConnectorState) {
        if let Err(e) = self.state.transition(next) {
            tracing::error!(error = %e, "connector resolved twice");
        }
    }

    /// Target address
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Current outcome state
    pub fn state(&self) -> ConnectorState {
        self.state
    }

    /// Whether the pool was established
    pub fn is_ok(&self) -> bool {
        self.state == ConnectorState::Ok
    }

    /// Failure reason, if the attempt failed
    pub fn error(&self) -> Option<&Error> {
        self.error.as_deref()
    }

    /// Take ownership of the established pool
    ///
    /// Returns `None` if the attempt failed or the pool was already released.
    pub fn release_pool(&mut self) -> Option<ConnectionPool> {
        self.pool.take()
    }

    /// Failure list entry for a failed attempt
    pub fn to_failure(&self) -> Option<ConnectFailure> {
        self.error.as_ref().map(|error| ConnectFailure {
            address: self.address.clone(),
            error: Arc::clone(error),
        })
    }
}

impl std::fmt::Debug for PoolConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolConnector")
            .field("address", &self.address)
            .field("state", &self.state)
            .field("error", &self.error)
            .finish()
    }
}

async fn establish(manager: &PoolManager, address: &Address) -> Result<ConnectionPool> {
    let settings = manager.settings();
    settings.validate()?;
    let timeout = settings.connect_timeout;

    let attempts = (0..settings.connections_per_host).map(|_| {
        let connect = manager
            .connector()
            .connect(address, manager.protocol_version(), settings);
        async move {
            tokio::time::timeout(timeout, connect)
                .await
                .map_err(|_| Error::Timeout(timeout))?
        }
    });

    let connections = futures::future::try_join_all(attempts).await?;
    Ok(ConnectionPool::new(address.clone(), connections))
}
