//! dns-harness application layer: the exchange queues, the response counter
//! and the response decision shared by both responders.
pub mod ports;
pub mod services;
pub mod use_cases;

pub use services::{ExchangeQueues, ResponseCounter};
pub use use_cases::{decode_query, Reply, ResponseDecider, ResponsePath, DEFAULT_EDNS_PAYLOAD};
