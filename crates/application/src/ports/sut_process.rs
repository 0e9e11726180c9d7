use async_trait::async_trait;
use dns_harness_domain::HarnessError;
use std::net::SocketAddr;
use std::path::Path;

/// Lifecycle of the DNS proxy under test.
#[async_trait]
pub trait SutProcess: Send + Sync {
    /// Launch the SUT with the given configuration file, listen address and
    /// ACL entries. Fails with `HarnessError::SutExited` when the process is
    /// already gone once the start-up grace period has elapsed.
    async fn start(
        &mut self,
        config_path: &Path,
        listen_addr: SocketAddr,
        acl: &[String],
    ) -> Result<(), HarnessError>;

    /// Terminate the SUT and wait for it to exit.
    async fn stop(&mut self) -> Result<(), HarnessError>;

    fn is_running(&mut self) -> bool;
}
