//! dns-harness domain layer: configuration, errors and identities shared by
//! the responders, the client driver and the binary.
pub mod config;
pub mod errors;
pub mod responder_id;
pub mod test_domain;

pub use config::{CliOverrides, ConfigError, HarnessConfig};
pub use errors::HarnessError;
pub use responder_id::ResponderId;
pub use test_domain::{TestDomain, DEFAULT_TEST_DOMAIN};
