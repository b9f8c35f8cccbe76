//! wirepool: parallel connection pool initialization for database drivers
//!
//! Given a set of host addresses, a [`PoolManagerInitializer`] opens one
//! connection pool per address concurrently, collects the per-address
//! outcomes into a single [`PoolManager`] plus a failure list, and reports
//! the aggregate result exactly once through a completion callback.
//!
//! ```no_run
//! # async fn example() -> wirepool::Result<()> {
//! use wirepool::{Address, PoolManagerInitializer, PoolManagerSettings};
//!
//! let addresses = Address::parse_list("10.0.0.1,10.0.0.2:9043", wirepool::DEFAULT_PORT)?;
//! let settings = PoolManagerSettings::builder()
//!     .connections_per_host(2)
//!     .build();
//!
//! let init = PoolManagerInitializer::new(tokio::runtime::Handle::current(), 4, |init| {
//!     for failure in init.failures() {
//!         eprintln!("{} failed: {}", failure.address(), failure.reason());
//!     }
//!     if let Some(manager) = init.release_manager() {
//!         println!("connected to {} hosts", manager.pool_count());
//!     }
//! })
//! .with_keyspace("app")
//! .with_settings(settings)
//! .initialize(addresses);
//!
//! init.completed().await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod address;
pub mod connection;
pub mod error;
pub mod listener;
pub mod logging;
pub mod metrics;
pub mod pool;
pub mod settings;

pub use address::{Address, DEFAULT_PORT};
pub use connection::{Connect, Connection, TcpConnect};
pub use error::{Error, Result};
pub use listener::PoolManagerListener;
pub use metrics::{GlobalMetrics, Metrics};
pub use pool::{
    ConnectFailure, ConnectionPool, ConnectorState, Initialization, PoolConnector, PoolManager,
    PoolManagerInitializer,
};
pub use settings::{PoolManagerSettings, PoolManagerSettingsBuilder};
