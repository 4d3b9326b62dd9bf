use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Could not access {}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid API key: {0}")]
    Authentication(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Rate limited by the API")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Input error: {0}")]
    Input(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("API key is required to search for jobs")]
    MissingApiKey,
}

impl Error {
    pub fn config_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ConfigIo {
            path: path.into(),
            source,
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Follow-up advice printed under the error message, if any.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Authentication(_) => Some(
                "Reset your key with `job-search --reset-key`, then save a new one with `job-search --save-key`.",
            ),
            Self::Network(_) => Some("Check your connection and try again."),
            Self::RateLimited { .. } => Some("Wait a moment and try again."),
            Self::MissingApiKey => Some("Save one with `job-search --save-key`."),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
