use crate::config::ConfigError;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum HarnessError {
    #[error("Failed to bind {addr}: {reason}")]
    Bind { addr: String, reason: String },

    #[error("Failed to decode DNS message: {0}")]
    Decode(String),

    #[error("Failed to encode DNS message: {0}")]
    Encode(String),

    #[error("Expected exactly one question, got {0}")]
    QuestionCount(usize),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Exchange timed out")]
    Timeout,

    #[error("Failed to spawn system under test: {0}")]
    SutSpawn(String),

    #[error("System under test exited during start-up (code {code:?})")]
    SutExited { code: Option<i32> },

    #[error("I/O error: {0}")]
    Io(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl HarnessError {
    /// Input that is dropped without a reply rather than reported upwards.
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, HarnessError::Decode(_) | HarnessError::QuestionCount(_))
    }

    /// Exit status to use when this error aborts the harness process.
    pub fn exit_code(&self) -> i32 {
        match self {
            HarnessError::SutExited { code: Some(code) } if *code != 0 => *code,
            _ => 1,
        }
    }
}
