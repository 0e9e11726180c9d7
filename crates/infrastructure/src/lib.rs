//! dns-harness infrastructure: sockets, the simulated upstream responders,
//! the client driver and the wrappers around the system under test.
pub mod dns;
pub mod harness;
pub mod sut;

pub use dns::client::{ClientDriver, Exchange, QueryOptions};
pub use dns::responder::{ResponderPair, ResponderTasks, TcpResponder, UdpResponder};
pub use harness::Harness;
pub use sut::{ProcessSupervisor, SutConfigTemplate, AUTOGENERATED_HEADER};
