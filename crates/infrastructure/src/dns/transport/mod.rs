pub mod framing;
pub mod socket;

pub use framing::{read_with_length_prefix, send_with_length_prefix, MAX_TCP_MESSAGE_SIZE};
pub use socket::{bind_tcp_listener, bind_udp_socket, DEFAULT_TCP_BACKLOG};
