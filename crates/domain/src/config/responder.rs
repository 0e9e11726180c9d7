use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use super::ConfigError;
use crate::test_domain::DEFAULT_TEST_DOMAIN;

/// Where the simulated upstream listens and which zone it scripts.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResponderConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_test_domain")]
    pub test_domain: String,

    #[serde(default = "default_tcp_backlog")]
    pub tcp_backlog: i32,

    #[serde(default = "default_tcp_session_timeout_ms")]
    pub tcp_session_timeout_ms: u64,
}

impl ResponderConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.bind_address.parse().map_err(|e| {
            ConfigError::Validation(format!(
                "Invalid responder bind address '{}': {}",
                self.bind_address, e
            ))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn tcp_session_timeout(&self) -> Duration {
        Duration::from_millis(self.tcp_session_timeout_ms)
    }
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            test_domain: default_test_domain(),
            tcp_backlog: default_tcp_backlog(),
            tcp_session_timeout_ms: default_tcp_session_timeout_ms(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5350
}

fn default_test_domain() -> String {
    DEFAULT_TEST_DOMAIN.to_string()
}

fn default_tcp_backlog() -> i32 {
    100
}

fn default_tcp_session_timeout_ms() -> u64 {
    10_000
}
