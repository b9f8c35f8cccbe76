//! Per-host connection pool

use crate::connection::Connection;
use crate::Address;
use std::time::Instant;

/// Established set of connections to a single host
#[derive(Debug)]
pub struct ConnectionPool {
    address: Address,
    connections: Vec<Connection>,
    created_at: Instant,
}

impl ConnectionPool {
    pub(crate) fn new(address: Address, connections: Vec<Connection>) -> Self {
        Self {
            address,
            connections,
            created_at: Instant::now(),
        }
    }

    /// Host this pool serves
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Number of open connections
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    /// Whether the pool holds no connections
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Open connections
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// When the pool was assembled
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Close every connection
    pub(crate) fn close(self) {
        tracing::debug!(
            address = %self.address,
            connections = self.connections.len(),
            "closing pool"
        );
        drop(self.connections);
    }
}
