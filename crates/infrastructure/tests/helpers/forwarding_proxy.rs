//! Stand-in for the system under test: relays every UDP datagram and every
//! framed TCP message to an upstream and hands the reply back.

use dns_harness_infrastructure::dns::transport::{
    bind_tcp_listener, bind_udp_socket, read_with_length_prefix, send_with_length_prefix,
    DEFAULT_TCP_BACKLOG,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpStream, UdpSocket};
use tokio::sync::oneshot;

const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(1);

pub struct ForwardingProxy {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ForwardingProxy {
    pub fn start(upstream: SocketAddr) -> Self {
        Self::start_at("127.0.0.1:0".parse().unwrap(), upstream)
    }

    pub fn start_at(listen: SocketAddr, upstream: SocketAddr) -> Self {
        let udp = Arc::new(bind_udp_socket(listen).unwrap());
        let addr = udp.local_addr().unwrap();
        let tcp = bind_tcp_listener(addr, DEFAULT_TCP_BACKLOG).unwrap();

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = udp.recv_from(&mut buf) => {
                        let Ok((len, client)) = result else { continue };
                        let packet = buf[..len].to_vec();
                        let udp = udp.clone();
                        tokio::spawn(async move {
                            if let Some(reply) = relay_udp(&packet, upstream).await {
                                let _ = udp.send_to(&reply, client).await;
                            }
                        });
                    }
                    accepted = tcp.accept() => {
                        let Ok((mut client, _)) = accepted else { continue };
                        tokio::spawn(async move {
                            let Ok(request) = read_with_length_prefix(&mut client).await else {
                                return;
                            };
                            if let Some(reply) = relay_tcp(&request, upstream).await {
                                let _ = send_with_length_prefix(&mut client, &reply).await;
                            }
                        });
                    }
                }
            }
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

impl Drop for ForwardingProxy {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn relay_udp(packet: &[u8], upstream: SocketAddr) -> Option<Vec<u8>> {
    let socket = UdpSocket::bind("127.0.0.1:0").await.ok()?;
    socket.send_to(packet, upstream).await.ok()?;

    let mut buf = vec![0u8; 4096];
    let (len, _) = tokio::time::timeout(UPSTREAM_TIMEOUT, socket.recv_from(&mut buf))
        .await
        .ok()?
        .ok()?;
    buf.truncate(len);
    Some(buf)
}

async fn relay_tcp(request: &[u8], upstream: SocketAddr) -> Option<Vec<u8>> {
    tokio::time::timeout(UPSTREAM_TIMEOUT, async {
        let mut stream = TcpStream::connect(upstream).await.ok()?;
        send_with_length_prefix(&mut stream, request).await.ok()?;
        read_with_length_prefix(&mut stream).await.ok()
    })
    .await
    .ok()?
}
