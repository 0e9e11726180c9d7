use async_trait::async_trait;
use dns_harness_application::ports::SutProcess;
use dns_harness_domain::HarnessError;
use std::net::SocketAddr;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::{Child, Command};
use tracing::{error, info, warn};

const DEFAULT_STARTUP_GRACE: Duration = Duration::from_secs(1);

/// Runs the SUT binary as a child process:
/// `<binary> -C <config> -l <listen> [--acl <entry>]...`
pub struct ProcessSupervisor {
    binary: String,
    quiet: bool,
    startup_grace: Duration,
    child: Option<Child>,
}

impl ProcessSupervisor {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            quiet: true,
            startup_grace: DEFAULT_STARTUP_GRACE,
            child: None,
        }
    }

    /// Discard the child's stdout.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// How long to wait after spawning before checking the child is alive.
    pub fn startup_grace(mut self, startup_grace: Duration) -> Self {
        self.startup_grace = startup_grace;
        self
    }

    pub fn pid(&self) -> Option<u32> {
        self.child.as_ref().and_then(Child::id)
    }

    fn command(&self, config_path: &Path, listen_addr: SocketAddr, acl: &[String]) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .arg("-C")
            .arg(config_path)
            .arg("-l")
            .arg(listen_addr.to_string());
        for entry in acl {
            command.arg("--acl").arg(entry);
        }
        if self.quiet {
            command.stdout(Stdio::null());
        }
        command.kill_on_drop(true);
        command
    }
}

#[async_trait]
impl SutProcess for ProcessSupervisor {
    async fn start(
        &mut self,
        config_path: &Path,
        listen_addr: SocketAddr,
        acl: &[String],
    ) -> Result<(), HarnessError> {
        if self.is_running() {
            warn!(pid = ?self.pid(), "System under test already running");
            return Ok(());
        }

        let mut child = {
            let mut command = self.command(config_path, listen_addr, acl);
            info!(command = ?command.as_std(), "Launching system under test");
            command
                .spawn()
                .map_err(|e| HarnessError::SutSpawn(format!("{}: {}", self.binary, e)))?
        };

        tokio::time::sleep(self.startup_grace).await;

        match child.try_wait() {
            Ok(Some(status)) => {
                error!(status = %status, "System under test exited during start-up");
                Err(HarnessError::SutExited {
                    code: status.code(),
                })
            }
            Ok(None) => {
                info!(pid = ?child.id(), listen = %listen_addr, "System under test running");
                self.child = Some(child);
                Ok(())
            }
            Err(e) => Err(HarnessError::Io(format!(
                "Failed to poll system under test: {}",
                e
            ))),
        }
    }

    async fn stop(&mut self) -> Result<(), HarnessError> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        terminate(&mut child);
        let status = child
            .wait()
            .await
            .map_err(|e| HarnessError::Io(format!("Failed to wait for system under test: {}", e)))?;

        info!(status = %status, "System under test stopped");
        Ok(())
    }

    fn is_running(&mut self) -> bool {
        match self.child.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }
}

/// SIGTERM where available so the SUT can shut down cleanly, kill otherwise.
fn terminate(child: &mut Child) {
    #[cfg(unix)]
    if let Some(pid) = child.id() {
        // SAFETY: `pid` belongs to a child we have not reaped yet.
        let rc = unsafe { libc::kill(pid as libc::pid_t, libc::SIGTERM) };
        if rc == 0 {
            return;
        }
    }

    if let Err(e) = child.start_kill() {
        warn!(error = %e, "Failed to kill system under test");
    }
}
