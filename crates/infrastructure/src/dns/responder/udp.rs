use dns_harness_application::{decode_query, ResponseDecider};
use dns_harness_domain::HarnessError;
use std::net::SocketAddr;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::dns::transport::bind_udp_socket;

const MAX_DATAGRAM_SIZE: usize = 4096;

pub struct UdpResponder {
    socket: UdpSocket,
    decider: ResponseDecider,
}

impl UdpResponder {
    pub fn bind(socket_addr: SocketAddr, decider: ResponseDecider) -> Result<Self, HarnessError> {
        let socket = bind_udp_socket(socket_addr)?;
        Ok(Self { socket, decider })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, HarnessError> {
        self.socket
            .local_addr()
            .map_err(|e| HarnessError::Io(e.to_string()))
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Serve datagrams until the runtime shuts down. A bad packet only
    /// affects its own iteration.
    pub async fn run(self) {
        info!(
            responder = %self.decider.identity(),
            bind_address = ?self.socket.local_addr().ok(),
            "UDP responder listening"
        );

        let mut recv_buf = vec![0u8; MAX_DATAGRAM_SIZE];

        loop {
            let (len, peer) = match self.socket.recv_from(&mut recv_buf).await {
                Ok(received) => received,
                Err(e) => {
                    error!(responder = %self.decider.identity(), error = %e, "UDP recv error");
                    continue;
                }
            };

            self.handle_datagram(&recv_buf[..len], peer).await;
        }
    }

    async fn handle_datagram(&self, packet: &[u8], peer: SocketAddr) {
        let query = match decode_query(packet) {
            Ok(query) => query,
            Err(e) => {
                warn!(
                    responder = %self.decider.identity(),
                    peer = %peer,
                    error = %e,
                    "Skipping query"
                );
                return;
            }
        };

        let reply = self.decider.respond(query);

        let wire = match reply.message.to_vec() {
            Ok(wire) => wire,
            Err(e) => {
                error!(responder = %self.decider.identity(), error = %e, "Failed to encode response");
                return;
            }
        };

        match self.socket.send_to(&wire, peer).await {
            Ok(sent) => debug!(peer = %peer, bytes = sent, path = ?reply.path, "UDP response sent"),
            Err(e) => error!(peer = %peer, error = %e, "Failed to send UDP response"),
        }
    }
}
