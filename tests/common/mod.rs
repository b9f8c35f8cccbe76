//! Shared test fixtures: a loopback upstream and a scripted connector

#![allow(dead_code)]

use futures::future::BoxFuture;
use futures::FutureExt;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use wirepool::connection::Transport;
use wirepool::{
    Address, Connect, Connection, Error, Initialization, Metrics, PoolManagerListener,
    PoolManagerSettings, Result,
};

/// Local TCP server that accepts and holds every connection
pub struct Upstream {
    pub addr: SocketAddr,
    pub accepted: Arc<Mutex<Vec<TcpStream>>>,
}

impl Upstream {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let accepted = Arc::new(Mutex::new(Vec::new()));

        let held = Arc::clone(&accepted);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                held.lock().unwrap().push(stream);
            }
        });

        Self { addr, accepted }
    }

    pub fn address(&self) -> Address {
        Address::from(self.addr)
    }
}

/// How the scripted connector resolves one address
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Connect to the upstream after `delay`
    Accept(Duration),
    /// Fail with a plain connection error after `delay`
    Refuse(String, Duration),
    /// Fail with an authentication (critical) error
    RejectAuth(String),
    /// Never resolve
    Hang,
}

/// Routes every address to one loopback upstream, or fails it as scripted
pub struct ScriptedConnect {
    upstream: SocketAddr,
    outcomes: HashMap<Address, Outcome>,
    pub calls: AtomicUsize,
}

impl ScriptedConnect {
    pub fn new(upstream: &Upstream) -> Self {
        Self {
            upstream: upstream.addr,
            outcomes: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with(mut self, address: &Address, outcome: Outcome) -> Self {
        self.outcomes.insert(address.clone(), outcome);
        self
    }
}

impl Connect for ScriptedConnect {
    fn connect(
        &self,
        address: &Address,
        protocol_version: u8,
        settings: &PoolManagerSettings,
    ) -> BoxFuture<'static, Result<Connection>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self
            .outcomes
            .get(address)
            .cloned()
            .unwrap_or(Outcome::Accept(Duration::ZERO));
        let upstream = self.upstream;
        let address = address.clone();
        let nodelay = settings.tcp_nodelay;

        async move {
            match outcome {
                Outcome::Accept(delay) => {
                    tokio::time::sleep(delay).await;
                    let transport = Transport::connect_tcp(
                        &upstream.ip().to_string(),
                        upstream.port(),
                        nodelay,
                    )
                    .await?;
                    Ok(Connection::new(address, transport, protocol_version))
                }
                Outcome::Refuse(reason, delay) => {
                    tokio::time::sleep(delay).await;
                    Err(Error::Connection(reason))
                }
                Outcome::RejectAuth(reason) => Err(Error::Authentication(reason)),
                Outcome::Hang => futures::future::pending().await,
            }
        }
        .boxed()
    }
}

/// Listener that records every event
#[derive(Default)]
pub struct RecordingListener {
    pub up: Mutex<Vec<Address>>,
    pub down: Mutex<Vec<Address>>,
    pub critical: Mutex<Vec<(Address, String)>>,
}

impl PoolManagerListener for RecordingListener {
    fn on_pool_up(&self, address: &Address) {
        self.up.lock().unwrap().push(address.clone());
    }

    fn on_pool_down(&self, address: &Address) {
        self.down.lock().unwrap().push(address.clone());
    }

    fn on_pool_critical_error(&self, address: &Address, error: &Error) {
        self.critical
            .lock()
            .unwrap()
            .push((address.clone(), error.to_string()));
    }
}

/// Metrics handle that counts calls
#[derive(Default)]
pub struct CountingMetrics {
    pub attempted: AtomicUsize,
    pub succeeded: AtomicUsize,
    pub failed: AtomicUsize,
    pub closed: AtomicUsize,
    pub completions: Mutex<Vec<(usize, usize)>>,
}

impl Metrics for CountingMetrics {
    fn pool_connect_attempted(&self, _address: &Address) {
        self.attempted.fetch_add(1, Ordering::SeqCst);
    }

    fn pool_connect_succeeded(&self, _address: &Address, _elapsed: Duration) {
        self.succeeded.fetch_add(1, Ordering::SeqCst);
    }

    fn pool_connect_failed(&self, _address: &Address, _error: &Error) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }

    fn pool_closed(&self, _address: &Address) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }

    fn initialization_completed(&self, succeeded: usize, failed: usize, _elapsed: Duration) {
        self.completions.lock().unwrap().push((succeeded, failed));
    }
}

/// Wait for completion, failing the test instead of hanging
pub async fn wait(init: &Initialization) {
    tokio::time::timeout(Duration::from_secs(10), init.completed())
        .await
        .expect("initialization did not complete");
}

/// `count` distinct addresses in 10.0.0.0/24
pub fn addresses(count: usize) -> Vec<Address> {
    (1..=count)
        .map(|i| Address::new(format!("10.0.0.{}", i), 9042))
        .collect()
}

pub fn init_tracing() {
    wirepool::logging::init_tracing();
}
