//! Connect to a list of hosts and report which pools came up
//!
//! Usage:
//!
//! ```bash
//! RUST_LOG=wirepool=debug cargo run --example connect_all -- "127.0.0.1:9042,10.0.0.2"
//! ```
//!
//! Optional second argument: path to a JSON settings file.

use std::sync::Arc;
use wirepool::{Address, PoolManagerInitializer, PoolManagerListener, PoolManagerSettings};

struct LogListener;

impl PoolManagerListener for LogListener {
    fn on_pool_up(&self, address: &Address) {
        println!("up:   {}", address);
    }

    fn on_pool_down(&self, address: &Address) {
        println!("down: {}", address);
    }

    fn on_pool_critical_error(&self, address: &Address, error: &wirepool::Error) {
        println!("critical: {} ({})", address, error);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    wirepool::logging::init_tracing();

    let mut args = std::env::args().skip(1);
    let hosts = args.next().unwrap_or_else(|| "127.0.0.1".to_string());
    let settings = match args.next() {
        Some(path) => PoolManagerSettings::from_json(&std::fs::read_to_string(path)?)?,
        None => PoolManagerSettings::default(),
    };

    let addresses = Address::parse_list(&hosts, wirepool::DEFAULT_PORT)?;
    println!("Connecting to {} host(s)", addresses.len());

    let (tx, rx) = tokio::sync::oneshot::channel();
    let init = PoolManagerInitializer::new(tokio::runtime::Handle::current(), 4, move |init| {
        for failure in init.failures() {
            println!("failed: {} ({})", failure.address(), failure.reason());
        }
        let _ = tx.send(init.release_manager());
    })
    .with_listener(Arc::new(LogListener))
    .with_settings(settings)
    .initialize(addresses);

    init.completed().await;

    if let Some(manager) = rx.await? {
        println!("{} pool(s) established", manager.pool_count());
        manager.close();
    }

    Ok(())
}
