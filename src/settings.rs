//! Pool manager settings
//!
//! Settings are opaque to the initializer: they are handed unchanged to the
//! [`PoolManager`](crate::PoolManager) and read by each pool connector.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Pool manager configuration
///
/// Use `PoolManagerSettings::builder()` for fluent configuration or
/// `PoolManagerSettings::from_json()` to load from a config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolManagerSettings {
    /// Timeout for establishing each connection (default: 5 seconds)
    #[serde(rename = "connect_timeout_ms", with = "duration_ms")]
    pub connect_timeout: Duration,
    /// Connections opened per host (default: 1)
    pub connections_per_host: usize,
    /// Delay between reconnection attempts, consumed by the pool layer (default: 2 seconds)
    #[serde(rename = "reconnect_wait_time_ms", with = "duration_ms")]
    pub reconnect_wait_time: Duration,
    /// Disable Nagle's algorithm on each socket (default: true)
    pub tcp_nodelay: bool,
}

impl Default for PoolManagerSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            connections_per_host: 1,
            reconnect_wait_time: Duration::from_secs(2),
            tcp_nodelay: true,
        }
    }
}

impl PoolManagerSettings {
    /// Create a builder starting from the defaults
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use wirepool::PoolManagerSettings;
    ///
    /// let settings = PoolManagerSettings::builder()
    ///     .connections_per_host(2)
    ///     .connect_timeout(Duration::from_secs(1))
    ///     .build();
    /// assert_eq!(settings.connections_per_host, 2);
    /// ```
    pub fn builder() -> PoolManagerSettingsBuilder {
        PoolManagerSettingsBuilder {
            settings: Self::default(),
        }
    }

    /// Load settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check that the settings can be used to open connections
    pub fn validate(&self) -> Result<()> {
        if self.connections_per_host == 0 {
            return Err(Error::Config(
                "connections_per_host must be at least 1".into(),
            ));
        }
        if self.connect_timeout.is_zero() {
            return Err(Error::Config("connect_timeout must be non-zero".into()));
        }
        Ok(())
    }
}

/// Builder for `PoolManagerSettings`
#[derive(Debug, Clone)]
pub struct PoolManagerSettingsBuilder {
    settings: PoolManagerSettings,
}

impl PoolManagerSettingsBuilder {
    /// Set the per-connection connect timeout
    ///
    /// # Arguments
    ///
    /// * `duration` - Upper bound for establishing one connection
    pub fn connect_timeout(mut self, duration: Duration) -> Self {
        self.settings.connect_timeout = duration;
        self
    }

    /// Set the number of connections opened per host
    pub fn connections_per_host(mut self, count: usize) -> Self {
        self.settings.connections_per_host = count;
        self
    }

    /// Set the reconnect wait time
    pub fn reconnect_wait_time(mut self, duration: Duration) -> Self {
        self.settings.reconnect_wait_time = duration;
        self
    }

    /// Enable or disable TCP_NODELAY
    pub fn tcp_nodelay(mut self, enabled: bool) -> Self {
        self.settings.tcp_nodelay = enabled;
        self
    }

    /// Build the settings
    ///
    /// Not validated here; connectors reject invalid settings with
    /// [`Error::Config`] before opening any connection.
    pub fn build(self) -> PoolManagerSettings {
        self.settings
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
