//! Connection management
//!
//! This module handles:
//! * Transport abstraction (TCP)
//! * The established connection type
//! * The `Connect` seam used by pool connectors to open connections

mod conn;
mod connect;
mod transport;

pub use conn::Connection;
pub use connect::{Connect, TcpConnect};
pub use transport::Transport;
