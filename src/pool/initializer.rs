//! Pool manager initializer
//!
//! Fans out one [`PoolConnector`] per address, merges every result into a
//! single [`PoolManager`] (successes) or the failure list (failures), and
//! invokes the completion callback exactly once, after the last connector
//! has been merged.
//!
//! Two independently synchronized pieces of state drive completion:
//! * a mutex guarding the manager slot and the failure list
//! * an atomic remaining counter that decides who finishes
//!
//! The mutex is released before the counter is touched, so deciding "am I
//! last" never waits on aggregation.

use super::connector::{ConnectFailure, PoolConnector};
use super::lock;
use super::manager::PoolManager;
use crate::connection::{Connect, TcpConnect};
use crate::{Address, GlobalMetrics, Metrics, PoolManagerListener, PoolManagerSettings};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::runtime::Handle;
use tokio::sync::watch;

type Callback = Box<dyn FnOnce(&Initialization) + Send + 'static>;

/// Capability token for [`PoolManager::add_pool`]
///
/// Only this module can construct one, so no other code can inject pools
/// into a manager.
#[derive(Debug)]
pub struct Protected {
    _private: (),
}

impl Protected {
    fn new() -> Self {
        Self { _private: () }
    }
}

/// Builds a [`PoolManager`] by connecting to every address in parallel
///
/// Configure with the `with_*` methods, then call [`initialize`](Self::initialize).
/// The callback runs exactly once, on a runtime worker (or synchronously
/// inside `initialize` when there are no addresses).
///
/// # Examples
///
/// ```no_run
/// # async fn example() {
/// use wirepool::{Address, PoolManagerInitializer};
///
/// let init = PoolManagerInitializer::new(tokio::runtime::Handle::current(), 4, |init| {
///     let manager = init.release_manager();
///     println!("failures: {:?}", init.failures());
///     # drop(manager);
/// })
/// .with_keyspace("app")
/// .initialize(vec![Address::new("10.0.0.1", 9042)]);
///
/// init.completed().await;
/// # }
/// ```
pub struct PoolManagerInitializer {
    runtime: Handle,
    protocol_version: u8,
    callback: Callback,
    keyspace: Option<String>,
    listener: Option<Arc<dyn PoolManagerListener>>,
    metrics: Option<Arc<dyn Metrics>>,
    settings: PoolManagerSettings,
    connector: Arc<dyn Connect>,
}

impl PoolManagerInitializer {
    /// Create an initializer
    ///
    /// # Arguments
    ///
    /// * `runtime` - Runtime the pool connectors are spawned on
    /// * `protocol_version` - Protocol version every connection is opened with
    /// * `callback` - Invoked once when every address has resolved
    ///
    /// If `callback` panics, an unclaimed manager is still closed and
    /// [`Initialization::completed`] still resolves before the panic resumes.
    pub fn new<F>(runtime: Handle, protocol_version: u8, callback: F) -> Self
    where
        F: FnOnce(&Initialization) + Send + 'static,
    {
        Self {
            runtime,
            protocol_version,
            callback: Box::new(callback),
            keyspace: None,
            listener: None,
            metrics: None,
            settings: PoolManagerSettings::default(),
            connector: Arc::new(TcpConnect),
        }
    }

    /// Set the keyspace handed to the manager
    pub fn with_keyspace(mut self, keyspace: impl Into<String>) -> Self {
        self.keyspace = Some(keyspace.into());
        self
    }

    /// Set the pool event listener
    pub fn with_listener(mut self, listener: Arc<dyn PoolManagerListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Set the metrics handle (default: [`GlobalMetrics`])
    pub fn with_metrics(mut self, metrics: Arc<dyn Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Set the manager settings
    pub fn with_settings(mut self, settings: PoolManagerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Set how individual connections are opened (default: [`TcpConnect`])
    pub fn with_connector(mut self, connector: Arc<dyn Connect>) -> Self {
        self.connector = connector;
        self
    }

    /// Connect to every address in parallel
    ///
    /// Never blocks and never fails; per-address failures are reported
    /// through [`Initialization::failures`]. With no addresses the callback
    /// runs before this method returns.
    ///
    /// The returned handle may be dropped immediately: in-flight connectors
    /// keep the initialization alive until the callback has run.
    pub fn initialize(self, addresses: impl IntoIterator<Item = Address>) -> Initialization {
        let addresses: Vec<Address> = addresses.into_iter().collect();
        let metrics = self
            .metrics
            .unwrap_or_else(|| Arc::new(GlobalMetrics) as Arc<dyn Metrics>);

        let manager = Arc::new(PoolManager::new(
            self.runtime,
            self.protocol_version,
            self.keyspace,
            self.listener,
            Arc::clone(&metrics),
            self.settings,
            self.connector,
        ));

        let (done, _) = watch::channel(false);
        let shared = Arc::new(Shared {
            remaining: AtomicUsize::new(addresses.len()),
            aggregate: Mutex::new(Aggregate {
                manager: Some(Arc::clone(&manager)),
                failures: Vec::new(),
            }),
            callback: Mutex::new(Some(self.callback)),
            metrics,
            started_at: Instant::now(),
            done,
        });

        tracing::info!(hosts = addresses.len(), "initializing connection pools");

        if addresses.is_empty() {
            shared.finish();
            return Initialization { shared };
        }

        for address in addresses {
            let shared = Arc::clone(&shared);
            PoolConnector::new(Arc::clone(&manager), address)
                .connect(move |connector| shared.handle_connect(connector));
        }

        Initialization { shared }
    }
}

impl fmt::Debug for PoolManagerInitializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolManagerInitializer")
            .field("protocol_version", &self.protocol_version)
            .field("keyspace", &self.keyspace)
            .field("has_listener", &self.listener.is_some())
            .field("has_metrics", &self.metrics.is_some())
            .field("settings", &self.settings)
            .finish()
    }
}

struct Aggregate {
    manager: Option<Arc<PoolManager>>,
    failures: Vec<ConnectFailure>,
}

struct Shared {
    remaining: AtomicUsize,
    aggregate: Mutex<Aggregate>,
    callback: Mutex<Option<Callback>>,
    metrics: Arc<dyn Metrics>,
    started_at: Instant,
    done: watch::Sender<bool>,
}

impl Shared {
    fn handle_connect(self: &Arc<Self>, mut connector: PoolConnector) {
        // A panicking listener must still count this connector as resolved
        let merged = panic::catch_unwind(AssertUnwindSafe(|| {
            let mut aggregate = lock(&self.aggregate);

            if connector.is_ok() {
                if let Some(pool) = connector.release_pool() {
                    match &aggregate.manager {
                        Some(manager) => manager.add_pool(pool, Protected::new()),
                        None => pool.close(),
                    }
                }
            } else if let Some(failure) = connector.to_failure() {
                aggregate.failures.push(failure.clone());
                if let Some(manager) = &aggregate.manager {
                    manager.notify_failure(&failure);
                }
            }
        }));

        if self.remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.finish();
        }

        if let Err(payload) = merged {
            tracing::error!(address = %connector.address(), "pool listener panicked");
            panic::resume_unwind(payload);
        }
    }

    fn finish(self: &Arc<Self>) {
        let _signal = CompletionSignal(&self.done);

        let (succeeded, failed) = {
            let aggregate = lock(&self.aggregate);
            let succeeded = aggregate.manager.as_ref().map_or(0, |m| m.pool_count());
            (succeeded, aggregate.failures.len())
        };
        let elapsed = self.started_at.elapsed();
        tracing::info!(
            succeeded,
            failed,
            elapsed_ms = elapsed.as_millis() as u64,
            "connection pool initialization complete"
        );
        self.metrics.initialization_completed(succeeded, failed, elapsed);

        let callback = lock(&self.callback).take();
        let outcome = callback.map(|callback| {
            panic::catch_unwind(AssertUnwindSafe(|| {
                callback(&Initialization {
                    shared: Arc::clone(self),
                })
            }))
        });

        // Unclaimed by the callback
        let manager = lock(&self.aggregate).manager.take();
        if let Some(manager) = manager {
            tracing::debug!("closing unclaimed pool manager");
            manager.close();
        }

        if let Some(Err(payload)) = outcome {
            tracing::error!("initialization callback panicked");
            panic::resume_unwind(payload);
        }
    }
}

/// Flips the completion flag when dropped, including during unwinding
struct CompletionSignal<'a>(&'a watch::Sender<bool>);

impl Drop for CompletionSignal<'_> {
    fn drop(&mut self) {
        self.0.send_replace(true);
    }
}

/// Handle to a running (or finished) initialization
///
/// Cheap to clone. Passed to the completion callback, and returned by
/// [`PoolManagerInitializer::initialize`].
#[derive(Clone)]
pub struct Initialization {
    shared: Arc<Shared>,
}

impl Initialization {
    /// Snapshot of the failure list, in completion order
    ///
    /// Only complete once the callback has fired; earlier calls see the
    /// connectors resolved so far.
    pub fn failures(&self) -> Vec<ConnectFailure> {
        lock(&self.shared.aggregate).failures.clone()
    }

    /// The manager, without claiming it
    ///
    /// Returns `None` once the manager has been claimed, or closed after an
    /// unclaimed completion.
    pub fn manager(&self) -> Option<Arc<PoolManager>> {
        lock(&self.shared.aggregate).manager.clone()
    }

    /// Claim the manager
    ///
    /// A claimed manager is not closed when the callback returns. Only the
    /// first call gets it.
    pub fn release_manager(&self) -> Option<Arc<PoolManager>> {
        lock(&self.shared.aggregate).manager.take()
    }

    /// Connectors that have not resolved yet
    pub fn remaining(&self) -> usize {
        self.shared.remaining.load(Ordering::Acquire)
    }

    /// Whether the callback has run and cleanup is done
    pub fn is_complete(&self) -> bool {
        *self.shared.done.borrow()
    }

    /// Wait until the callback has run and an unclaimed manager is closed
    pub async fn completed(&self) {
        let mut done = self.shared.done.subscribe();
        // The sender lives in `shared`, which we hold
        let _ = done.wait_for(|done| *done).await;
    }
}

impl fmt::Debug for Initialization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Initialization")
            .field("remaining", &self.remaining())
            .field("complete", &self.is_complete())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConnectionPool;

    #[derive(Default)]
    struct Events {
        up: AtomicUsize,
        down: AtomicUsize,
    }

    impl PoolManagerListener for Events {
        fn on_pool_up(&self, _address: &Address) {
            self.up.fetch_add(1, Ordering::SeqCst);
        }

        fn on_pool_down(&self, _address: &Address) {
            self.down.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn manager(listener: Arc<Events>) -> PoolManager {
        PoolManager::new(
            Handle::current(),
            4,
            Some("ks".into()),
            Some(listener as Arc<dyn PoolManagerListener>),
            Arc::new(GlobalMetrics),
            PoolManagerSettings::default(),
            Arc::new(TcpConnect),
        )
    }

    fn empty_pool(host: &str) -> ConnectionPool {
        ConnectionPool::new(Address::new(host, 9042), Vec::new())
    }

    #[tokio::test]
    async fn test_add_pool_is_idempotent() {
        let events = Arc::new(Events::default());
        let manager = manager(Arc::clone(&events));

        manager.add_pool(empty_pool("a"), Protected::new());
        manager.add_pool(empty_pool("a"), Protected::new());
        manager.add_pool(empty_pool("b"), Protected::new());

        assert_eq!(manager.pool_count(), 2);
        assert_eq!(
            manager.addresses(),
            vec![Address::new("a", 9042), Address::new("b", 9042)]
        );
        assert_eq!(events.up.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_close_drains_pools() {
        let events = Arc::new(Events::default());
        let manager = manager(Arc::clone(&events));
        manager.add_pool(empty_pool("a"), Protected::new());
        manager.add_pool(empty_pool("b"), Protected::new());

        manager.close();
        manager.close();

        assert!(manager.is_closed());
        assert_eq!(manager.pool_count(), 0);
        assert_eq!(events.down.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_closed_manager_rejects_pools() {
        let events = Arc::new(Events::default());
        let manager = manager(Arc::clone(&events));
        manager.close();

        manager.add_pool(empty_pool("a"), Protected::new());

        assert_eq!(manager.pool_count(), 0);
        assert_eq!(events.up.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_keyspace_passthrough() {
        let manager = manager(Arc::new(Events::default()));
        assert_eq!(manager.keyspace().as_deref(), Some("ks"));
        assert_eq!(manager.protocol_version(), 4);

        manager.set_keyspace("other");
        assert_eq!(manager.keyspace().as_deref(), Some("other"));
    }

    #[tokio::test]
    async fn test_empty_addresses_complete_synchronously() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);

        let init = PoolManagerInitializer::new(Handle::current(), 4, move |init| {
            assert_eq!(init.remaining(), 0);
            assert!(init.failures().is_empty());
            seen.fetch_add(1, Ordering::SeqCst);
        })
        .initialize(Vec::new());

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(init.is_complete());
        assert!(init.manager().is_none());
        init.completed().await;
    }

    #[tokio::test]
    async fn test_builder_last_write_wins() {
        let init = PoolManagerInitializer::new(Handle::current(), 3, |_| {})
            .with_keyspace("first")
            .with_keyspace("second");
        assert_eq!(init.keyspace.as_deref(), Some("second"));
        assert_eq!(init.protocol_version, 3);
    }
}
