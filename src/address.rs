//! Host addresses
//!
//! Supports formats:
//! * host
//! * host:port
//! * [ipv6]
//! * [ipv6]:port
//! * bare ipv6 (no port)

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Default native protocol port
pub const DEFAULT_PORT: u16 = 9042;

/// Host endpoint (host + port), compared by value
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    host: String,
    port: u16,
}

impl Address {
    /// Create an address from host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Host name or IP literal (without brackets)
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Parse a single address, using `default_port` when none is given
    pub fn parse_with_default_port(s: &str, default_port: u16) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidAddress("empty address".into()));
        }

        let (host, port) = if let Some(rest) = s.strip_prefix('[') {
            let (host, tail) = rest
                .split_once(']')
                .ok_or_else(|| Error::InvalidAddress(format!("unclosed bracket in '{}'", s)))?;
            let port = match tail {
                "" => None,
                tail => Some(tail.strip_prefix(':').ok_or_else(|| {
                    Error::InvalidAddress(format!("unexpected characters after ']' in '{}'", s))
                })?),
            };
            (host, port)
        } else {
            match s.matches(':').count() {
                0 => (s, None),
                // host:port
                1 => {
                    let (host, port) = s.split_once(':').unwrap_or((s, ""));
                    (host, Some(port))
                }
                // Bare IPv6 literal, port must be bracketed
                _ => (s, None),
            }
        };

        if host.is_empty() {
            return Err(Error::InvalidAddress(format!("missing host in '{}'", s)));
        }
        if host.contains(|c: char| c.is_whitespace() || matches!(c, '[' | ']' | ',')) {
            return Err(Error::InvalidAddress(format!("invalid host in '{}'", s)));
        }

        let port = match port {
            None => default_port,
            Some(p) => parse_port(p).ok_or_else(|| {
                Error::InvalidAddress(format!("invalid port '{}' in '{}'", p, s))
            })?,
        };

        Ok(Self::new(host, port))
    }

    /// Parse a comma-separated contact point list
    ///
    /// Empty entries (e.g. trailing commas) are skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use wirepool::Address;
    ///
    /// let addrs = Address::parse_list("10.0.0.1, 10.0.0.2:9043,", 9042).unwrap();
    /// assert_eq!(addrs, vec![
    ///     Address::new("10.0.0.1", 9042),
    ///     Address::new("10.0.0.2", 9043),
    /// ]);
    /// ```
    pub fn parse_list(s: &str, default_port: u16) -> Result<Vec<Self>> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| Self::parse_with_default_port(part, default_port))
            .collect()
    }

    fn is_ipv6(&self) -> bool {
        self.host.contains(':')
    }
}

fn parse_port(s: &str) -> Option<u16> {
    match s.parse::<u16>() {
        Ok(0) | Err(_) => None,
        Ok(port) => Some(port),
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_with_default_port(s, DEFAULT_PORT)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ipv6() {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl From<std::net::SocketAddr> for Address {
    fn from(addr: std::net::SocketAddr) -> Self {
        Self::new(addr.ip().to_string(), addr.port())
    }
}
