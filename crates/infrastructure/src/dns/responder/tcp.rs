use dns_harness_application::{decode_query, ResponseDecider, ResponsePath};
use dns_harness_domain::HarnessError;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::dns::transport::{
    bind_tcp_listener, read_with_length_prefix, send_with_length_prefix, DEFAULT_TCP_BACKLOG,
};

pub(super) const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TcpResponder {
    listener: TcpListener,
    decider: ResponseDecider,
    session_timeout: Duration,
}

impl TcpResponder {
    pub fn bind(socket_addr: SocketAddr, decider: ResponseDecider) -> Result<Self, HarnessError> {
        Self::bind_with_backlog(socket_addr, decider, DEFAULT_TCP_BACKLOG)
    }

    pub fn bind_with_backlog(
        socket_addr: SocketAddr,
        decider: ResponseDecider,
        backlog: i32,
    ) -> Result<Self, HarnessError> {
        let listener = bind_tcp_listener(socket_addr, backlog)?;
        Ok(Self {
            listener,
            decider,
            session_timeout: DEFAULT_SESSION_TIMEOUT,
        })
    }

    /// Upper bound on one request/response cycle over a connection.
    pub fn with_session_timeout(mut self, session_timeout: Duration) -> Self {
        self.session_timeout = session_timeout;
        self
    }

    pub fn local_addr(&self) -> Result<SocketAddr, HarnessError> {
        self.listener
            .local_addr()
            .map_err(|e| HarnessError::Io(e.to_string()))
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Accept connections until the runtime shuts down. Each connection gets
    /// its own task and carries exactly one exchange.
    pub async fn run(self) {
        info!(
            responder = %self.decider.identity(),
            bind_address = ?self.listener.local_addr().ok(),
            "TCP responder listening"
        );

        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!(responder = %self.decider.identity(), error = %e, "TCP accept error");
                    continue;
                }
            };

            let decider = self.decider.clone();
            let session_timeout = self.session_timeout;
            tokio::spawn(async move {
                match serve_session(stream, &decider, session_timeout).await {
                    Ok(path) => debug!(peer = %peer, path = ?path, "TCP response sent"),
                    Err(e) if e.is_malformed_input() => {
                        warn!(responder = %decider.identity(), peer = %peer, error = %e, "Skipping query")
                    }
                    Err(e) => {
                        error!(responder = %decider.identity(), peer = %peer, error = %e, "Abandoning TCP connection")
                    }
                }
            });
        }
    }
}

/// One framed request/response cycle. The stream is owned here and closed
/// when this returns, whatever the outcome.
async fn serve_session(
    mut stream: TcpStream,
    decider: &ResponseDecider,
    session_timeout: Duration,
) -> Result<ResponsePath, HarnessError> {
    let exchange = async {
        let request = read_with_length_prefix(&mut stream).await?;
        let query = decode_query(&request)?;
        let reply = decider.respond(query);
        let wire = reply
            .message
            .to_vec()
            .map_err(|e| HarnessError::Encode(e.to_string()))?;
        send_with_length_prefix(&mut stream, &wire).await?;
        Ok::<_, HarnessError>(reply.path)
    };

    tokio::time::timeout(session_timeout, exchange)
        .await
        .map_err(|_| HarnessError::Timeout)?
}
