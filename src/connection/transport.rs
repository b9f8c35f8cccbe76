//! Transport abstraction (plain TCP)

use crate::Result;
use std::net::SocketAddr;
use tokio::net::TcpStream;

/// Transport layer for one connection
#[derive(Debug)]
pub struct Transport {
    stream: TcpStream,
}

impl Transport {
    /// Connect via plain TCP
    pub async fn connect_tcp(host: &str, port: u16, nodelay: bool) -> Result<Self> {
        let stream = TcpStream::connect((host, port)).await?;
        stream.set_nodelay(nodelay)?;
        Ok(Self { stream })
    }

    /// Remote socket address
    pub fn peer_addr(&self) -> Result<SocketAddr> {
        Ok(self.stream.peer_addr()?)
    }

    /// Whether TCP_NODELAY is set
    pub fn nodelay(&self) -> Result<bool> {
        Ok(self.stream.nodelay()?)
    }
}
