pub mod client;
pub mod errors;
pub mod logging;
pub mod responder;
pub mod root;
pub mod sut;

pub use client::ClientConfig;
pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use responder::ResponderConfig;
pub use root::{CliOverrides, HarnessConfig};
pub use sut::SutConfig;
