use dns_harness_domain::HarnessError;
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::SocketAddr;
use tokio::net::{TcpListener, UdpSocket};

/// Pending-connection backlog of the TCP responder.
pub const DEFAULT_TCP_BACKLOG: i32 = 100;

/// Bind a UDP socket with address reuse enabled, ready for the tokio reactor.
pub fn bind_udp_socket(socket_addr: SocketAddr) -> Result<UdpSocket, HarnessError> {
    create_udp_socket(socket_addr).map_err(|e| bind_error(socket_addr, e))
}

/// Bind and listen on a TCP socket with address reuse enabled.
pub fn bind_tcp_listener(socket_addr: SocketAddr, backlog: i32) -> Result<TcpListener, HarnessError> {
    create_tcp_listener(socket_addr, backlog).map_err(|e| bind_error(socket_addr, e))
}

fn create_udp_socket(socket_addr: SocketAddr) -> io::Result<UdpSocket> {
    let socket = Socket::new(
        Domain::for_address(socket_addr),
        Type::DGRAM,
        Some(Protocol::UDP),
    )?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.bind(&socket_addr.into())?;
    socket.set_nonblocking(true)?;
    let std_socket: std::net::UdpSocket = socket.into();
    UdpSocket::from_std(std_socket)
}

fn create_tcp_listener(socket_addr: SocketAddr, backlog: i32) -> io::Result<TcpListener> {
    let socket = Socket::new(
        Domain::for_address(socket_addr),
        Type::STREAM,
        Some(Protocol::TCP),
    )?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(backlog)?;
    socket.set_nonblocking(true)?;
    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}

fn bind_error(socket_addr: SocketAddr, e: io::Error) -> HarnessError {
    HarnessError::Bind {
        addr: socket_addr.to_string(),
        reason: e.to_string(),
    }
}
