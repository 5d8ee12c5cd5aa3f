use thiserror::Error;

pub type ReelResult<T> = Result<T, ReelError>;

/// Every failure is fatal to the job; the variants only tell the operator where it broke.
#[derive(Debug, Error)]
pub enum ReelError {
    #[error("Missing env-var {0}")]
    Config(String),

    #[error("Invalid env-var {name}: {reason}")]
    InvalidConfig { name: String, reason: String },

    #[error("No trending topic available: {0}")]
    SourceUnavailable(String),

    #[error("Script output does not match the expected schema: {0}")]
    Schema(String),

    #[error("Media generation failed: {0}")]
    Generation(String),

    #[error("Video assembly failed: {0}")]
    Assembly(String),

    #[error("Resumable upload protocol error: {0}")]
    Protocol(String),

    #[error("Publish failed: {0}")]
    Publish(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReelError {
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }

    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }
}
