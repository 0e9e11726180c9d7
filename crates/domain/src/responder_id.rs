use std::fmt;
use std::sync::Arc;

/// Identity under which a responder records the scripted replies it served.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResponderId(Arc<str>);

impl ResponderId {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    pub fn udp() -> Self {
        Self::new("UDP Responder")
    }

    pub fn tcp() -> Self {
        Self::new("TCP Responder")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResponderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResponderId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}
