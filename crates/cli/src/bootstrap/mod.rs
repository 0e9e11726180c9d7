mod logging;

pub use logging::init_logging;

use dns_harness_domain::{CliOverrides, HarnessConfig};

/// Runs before logging is set up; failures surface through the returned
/// error, which `main` reports.
pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<HarnessConfig> {
    let config = HarnessConfig::load(path, overrides)
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;
    Ok(config)
}
