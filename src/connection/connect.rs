//! Single-connection establishment

use super::conn::Connection;
use super::transport::Transport;
use crate::{Address, PoolManagerSettings, Result};
use futures::future::BoxFuture;
use futures::FutureExt;

/// Opens one connection to an address
///
/// This is where the wire-protocol handshake plugs in. The returned future
/// must be `'static` so it can run on a spawned task; implementations clone
/// whatever they need out of `address` and `settings`. Timeouts are applied
/// by the caller.
pub trait Connect: Send + Sync {
    /// Establish one connection
    fn connect(
        &self,
        address: &Address,
        protocol_version: u8,
        settings: &PoolManagerSettings,
    ) -> BoxFuture<'static, Result<Connection>>;
}

/// Plain TCP connector
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnect;

impl Connect for TcpConnect {
    fn connect(
        &self,
        address: &Address,
        protocol_version: u8,
        settings: &PoolManagerSettings,
    ) -> BoxFuture<'static, Result<Connection>> {
        let address = address.clone();
        let nodelay = settings.tcp_nodelay;

        async move {
            let transport = Transport::connect_tcp(address.host(), address.port(), nodelay).await?;
            tracing::debug!(%address, "tcp connection established");
            Ok(Connection::new(address, transport, protocol_version))
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_tcp_connect() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = Address::from(listener.local_addr().unwrap());
        let settings = PoolManagerSettings::default();

        let conn = TcpConnect.connect(&address, 3, &settings).await.unwrap();
        assert_eq!(conn.address(), &address);
        assert_eq!(conn.protocol_version(), 3);
    }
}
