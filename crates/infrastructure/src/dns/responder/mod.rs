//! Simulated authoritative upstream for the system under test.
//!
//! One UDP and one TCP responder listen on the same address and share the
//! exchange queues and response counter through their `ResponseDecider`.

mod tcp;
mod udp;

pub use tcp::TcpResponder;
pub use udp::UdpResponder;

use dns_harness_application::ResponseDecider;
use dns_harness_domain::{HarnessError, ResponderId};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::info;

use super::transport::DEFAULT_TCP_BACKLOG;

pub struct ResponderPair {
    udp: UdpResponder,
    tcp: TcpResponder,
}

impl ResponderPair {
    /// Bind UDP first, then TCP on the port UDP ended up with, so that an
    /// ephemeral port (0) still yields a single shared address.
    pub fn bind(socket_addr: SocketAddr, decider: &ResponseDecider) -> Result<Self, HarnessError> {
        Self::bind_with(
            socket_addr,
            decider,
            DEFAULT_TCP_BACKLOG,
            tcp::DEFAULT_SESSION_TIMEOUT,
        )
    }

    pub fn bind_with(
        socket_addr: SocketAddr,
        decider: &ResponseDecider,
        tcp_backlog: i32,
        tcp_session_timeout: Duration,
    ) -> Result<Self, HarnessError> {
        let udp = UdpResponder::bind(socket_addr, decider.with_identity(ResponderId::udp()))?;
        let shared_addr = udp.local_addr()?;
        let tcp = TcpResponder::bind_with_backlog(
            shared_addr,
            decider.with_identity(ResponderId::tcp()),
            tcp_backlog,
        )?
        .with_session_timeout(tcp_session_timeout);

        Ok(Self { udp, tcp })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, HarnessError> {
        self.udp.local_addr()
    }

    pub fn spawn(self) -> ResponderTasks {
        info!("Launching responders");
        ResponderTasks {
            udp: self.udp.spawn(),
            tcp: self.tcp.spawn(),
        }
    }
}

/// Handles of the two long-lived responder tasks.
pub struct ResponderTasks {
    pub udp: JoinHandle<()>,
    pub tcp: JoinHandle<()>,
}

impl ResponderTasks {
    pub fn is_running(&self) -> bool {
        !self.udp.is_finished() && !self.tcp.is_finished()
    }

    pub fn abort(&self) {
        self.udp.abort();
        self.tcp.abort();
    }

    /// Abort both tasks and wait until they are gone, so their sockets are
    /// closed by the time this returns.
    pub async fn shutdown(self) {
        self.abort();
        let _ = self.udp.await;
        let _ = self.tcp.await;
    }
}
