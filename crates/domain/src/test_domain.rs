use std::fmt;
use std::str::FromStr;

use crate::{ConfigError, HarnessError};

pub const DEFAULT_TEST_DOMAIN: &str = "tests.powerdns.com.";

/// The zone whose queries are eligible for scripted responses.
///
/// Stored lower-cased and fully qualified, so `Tests.PowerDNS.com` and
/// `tests.powerdns.com.` describe the same zone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TestDomain(String);

impl TestDomain {
    pub fn new(domain: &str) -> Result<Self, HarnessError> {
        let trimmed = domain.trim().trim_end_matches('.');
        if trimmed.is_empty() {
            return Err(HarnessError::Config(ConfigError::Validation(format!(
                "Invalid test domain '{}'",
                domain
            ))));
        }
        Ok(Self(format!("{}.", trimmed.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when `name` ends with the test domain, compared as plain
    /// case-insensitive text. `eviltests.powerdns.com.` matches as well as
    /// `a.tests.powerdns.com.`.
    pub fn contains(&self, name: &str) -> bool {
        let mut name = name.to_ascii_lowercase();
        if !name.ends_with('.') {
            name.push('.');
        }

        name.ends_with(&self.0)
    }
}

impl Default for TestDomain {
    fn default() -> Self {
        Self(DEFAULT_TEST_DOMAIN.to_string())
    }
}

impl FromStr for TestDomain {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for TestDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
