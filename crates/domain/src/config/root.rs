use serde::{Deserialize, Serialize};
use std::path::Path;

use super::client::ClientConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::responder::ResponderConfig;
use super::sut::SutConfig;
use crate::TestDomain;

const LOCAL_CONFIG_FILE: &str = "dns-harness.toml";

/// Main configuration structure for the harness
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct HarnessConfig {
    /// Simulated upstream (responder pair)
    #[serde(default)]
    pub responder: ResponderConfig,

    /// System under test
    #[serde(default)]
    pub sut: SutConfig,

    /// Client driver
    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl HarnessConfig {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. dns-harness.toml in current directory
    /// 3. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if Path::new(LOCAL_CONFIG_FILE).exists() {
            Self::from_file(LOCAL_CONFIG_FILE)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.responder_port {
            self.responder.port = port;
        }
        if let Some(port) = overrides.sut_port {
            self.sut.port = port;
        }
        if let Some(binary) = overrides.sut_binary {
            self.sut.binary = binary;
        }
        if let Some(domain) = overrides.test_domain {
            self.responder.test_domain = domain;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.responder.socket_addr()?;
        self.sut.listen_addr()?;

        if self.sut.port == 0 {
            return Err(ConfigError::Validation("SUT port cannot be 0".to_string()));
        }

        if TestDomain::new(&self.responder.test_domain).is_err() {
            return Err(ConfigError::Validation(format!(
                "Invalid test domain '{}'",
                self.responder.test_domain
            )));
        }

        if self.client.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "Client timeout cannot be 0".to_string(),
            ));
        }

        if self.responder.tcp_backlog <= 0 {
            return Err(ConfigError::Validation(
                "TCP backlog must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub responder_port: Option<u16>,
    pub sut_port: Option<u16>,
    pub sut_binary: Option<String>,
    pub test_domain: Option<String>,
    pub log_level: Option<String>,
}
