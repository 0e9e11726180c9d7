pub mod client;
pub mod responder;
pub mod transport;
