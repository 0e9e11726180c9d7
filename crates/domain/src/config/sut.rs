use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use super::ConfigError;

/// Environment variable that names the SUT binary, taking precedence over
/// the configured `binary`.
pub const SUT_BINARY_ENV: &str = "DNSDISTBIN";

/// How the system under test is launched and where it listens.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SutConfig {
    #[serde(default = "default_binary")]
    pub binary: String,

    #[serde(default = "default_listen_address")]
    pub listen_address: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_config_path")]
    pub config_path: String,

    /// Custom configuration template; the built-in one is used when empty.
    #[serde(default)]
    pub template_path: String,

    #[serde(default = "default_acl")]
    pub acl: Vec<String>,

    #[serde(default = "default_true")]
    pub quiet: bool,

    #[serde(default = "default_startup_grace_ms")]
    pub startup_grace_ms: u64,
}

impl SutConfig {
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.listen_address.parse().map_err(|e| {
            ConfigError::Validation(format!(
                "Invalid SUT listen address '{}': {}",
                self.listen_address, e
            ))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn startup_grace(&self) -> Duration {
        Duration::from_millis(self.startup_grace_ms)
    }

    /// The binary to launch, honouring the `DNSDISTBIN` override.
    pub fn resolved_binary(&self) -> String {
        std::env::var(SUT_BINARY_ENV)
            .ok()
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| self.binary.clone())
    }
}

impl Default for SutConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            listen_address: default_listen_address(),
            port: default_port(),
            config_path: default_config_path(),
            template_path: String::new(),
            acl: default_acl(),
            quiet: true,
            startup_grace_ms: default_startup_grace_ms(),
        }
    }
}

fn default_binary() -> String {
    "dnsdist".to_string()
}

fn default_listen_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5340
}

fn default_config_path() -> String {
    "dnsdist_test.conf".to_string()
}

fn default_acl() -> Vec<String> {
    vec!["127.0.0.1/32".to_string()]
}

fn default_true() -> bool {
    true
}

fn default_startup_grace_ms() -> u64 {
    1000
}
