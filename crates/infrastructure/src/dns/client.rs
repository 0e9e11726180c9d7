//! Client side of the harness: sends a query to the system under test and
//! collects both its reply and the query the responder observed.

use dns_harness_application::ExchangeQueues;
use dns_harness_domain::HarnessError;
use hickory_proto::op::Message;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpStream, UdpSocket};
use tracing::{debug, warn};

use super::transport::{read_with_length_prefix, send_with_length_prefix};

const MAX_UDP_RESPONSE_SIZE: usize = 4096;
const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy)]
pub struct QueryOptions {
    /// Queue the scripted response before sending and pop the observed
    /// query afterwards.
    pub use_queue: bool,
    pub timeout: Duration,
}

impl QueryOptions {
    pub fn without_queue() -> Self {
        Self {
            use_queue: false,
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            use_queue: true,
            timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }
}

/// Outcome of one query. Either side may be absent: no reply before the
/// timeout, or no query observed by a responder.
#[derive(Debug, Default)]
pub struct Exchange {
    pub received_query: Option<Message>,
    pub response: Option<Message>,
}

pub struct ClientDriver {
    sut_addr: SocketAddr,
    socket: UdpSocket,
    queues: Arc<ExchangeQueues>,
}

impl ClientDriver {
    /// Set up the datagram socket used for every UDP exchange with the SUT.
    pub async fn connect(
        sut_addr: SocketAddr,
        queues: Arc<ExchangeQueues>,
    ) -> Result<Self, HarnessError> {
        let bind_addr: SocketAddr = if sut_addr.is_ipv4() {
            SocketAddr::from(([0, 0, 0, 0], 0))
        } else {
            SocketAddr::from(([0u16; 8], 0))
        };

        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| HarnessError::Io(format!("Failed to bind client socket: {}", e)))?;
        socket
            .connect(sut_addr)
            .await
            .map_err(|e| HarnessError::Io(format!("Failed to connect to {}: {}", sut_addr, e)))?;

        debug!(sut = %sut_addr, "Client socket ready");

        Ok(Self {
            sut_addr,
            socket,
            queues,
        })
    }

    pub fn sut_addr(&self) -> SocketAddr {
        self.sut_addr
    }

    pub fn queues(&self) -> &Arc<ExchangeQueues> {
        &self.queues
    }

    /// Send `query` over UDP. A missing reply (timeout, ICMP error) is not
    /// an error; only encoding the query or decoding the reply can fail.
    pub async fn send_udp_query(
        &self,
        query: &Message,
        response: Option<Message>,
        options: QueryOptions,
    ) -> Result<Exchange, HarnessError> {
        let wire = encode(query)?;
        self.script(response, &options);

        let data = match tokio::time::timeout(options.timeout, self.udp_round_trip(&wire)).await {
            Ok(Ok(data)) => Some(data),
            Ok(Err(e)) => {
                warn!(sut = %self.sut_addr, error = %e, "UDP exchange failed");
                None
            }
            Err(_) => {
                debug!(sut = %self.sut_addr, timeout = ?options.timeout, "UDP exchange timed out");
                None
            }
        };

        self.finish(data, &options)
    }

    /// Send `query` over a fresh TCP connection, closed again before this
    /// returns on every path.
    pub async fn send_tcp_query(
        &self,
        query: &Message,
        response: Option<Message>,
        options: QueryOptions,
    ) -> Result<Exchange, HarnessError> {
        let wire = encode(query)?;
        self.script(response, &options);

        let data = match tokio::time::timeout(options.timeout, self.tcp_round_trip(&wire)).await {
            Ok(Ok(data)) => Some(data),
            Ok(Err(e)) => {
                warn!(sut = %self.sut_addr, error = %e, "TCP exchange failed");
                None
            }
            Err(_) => {
                debug!(sut = %self.sut_addr, timeout = ?options.timeout, "TCP exchange timed out");
                None
            }
        };

        self.finish(data, &options)
    }

    fn script(&self, response: Option<Message>, options: &QueryOptions) {
        if !options.use_queue {
            return;
        }
        if let Some(response) = response {
            self.queues.push_response(response);
        }
    }

    async fn udp_round_trip(&self, wire: &[u8]) -> Result<Vec<u8>, HarnessError> {
        self.socket
            .send(wire)
            .await
            .map_err(|e| HarnessError::Transport(format!("Failed to send UDP query: {}", e)))?;

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        let len = self
            .socket
            .recv(&mut recv_buf)
            .await
            .map_err(|e| HarnessError::Transport(format!("Failed to receive UDP response: {}", e)))?;
        recv_buf.truncate(len);

        Ok(recv_buf)
    }

    async fn tcp_round_trip(&self, wire: &[u8]) -> Result<Vec<u8>, HarnessError> {
        let mut stream = TcpStream::connect(self.sut_addr).await.map_err(|e| {
            HarnessError::Transport(format!("Failed to connect to {}: {}", self.sut_addr, e))
        })?;
        stream
            .set_nodelay(true)
            .map_err(|e| HarnessError::Transport(format!("Failed to set TCP_NODELAY: {}", e)))?;

        send_with_length_prefix(&mut stream, wire).await?;
        read_with_length_prefix(&mut stream).await
    }

    fn finish(&self, data: Option<Vec<u8>>, options: &QueryOptions) -> Result<Exchange, HarnessError> {
        let received_query = if options.use_queue {
            self.queues.pop_query()
        } else {
            None
        };

        let response = data
            .filter(|data| !data.is_empty())
            .map(|data| Message::from_vec(&data))
            .transpose()
            .map_err(|e| HarnessError::Decode(e.to_string()))?;

        Ok(Exchange {
            received_query,
            response,
        })
    }
}

fn encode(message: &Message) -> Result<Vec<u8>, HarnessError> {
    message
        .to_vec()
        .map_err(|e| HarnessError::Encode(e.to_string()))
}
