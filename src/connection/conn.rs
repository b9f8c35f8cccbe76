//! Core connection type

use super::transport::Transport;
use crate::Address;
use std::time::Instant;

/// One established connection to a host
///
/// Dropping the connection closes its socket.
#[derive(Debug)]
pub struct Connection {
    address: Address,
    transport: Transport,
    protocol_version: u8,
    established_at: Instant,
}

impl Connection {
    /// Create connection from a transport that completed its handshake
    pub fn new(address: Address, transport: Transport, protocol_version: u8) -> Self {
        Self {
            address,
            transport,
            protocol_version,
            established_at: Instant::now(),
        }
    }

    /// Address this connection was opened against
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Negotiated protocol version
    pub fn protocol_version(&self) -> u8 {
        self.protocol_version
    }

    /// Underlying transport
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// When the connection was established
    pub fn established_at(&self) -> Instant {
        self.established_at
    }
}
