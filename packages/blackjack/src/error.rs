use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlackjackError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<std::io::Error> for BlackjackError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

impl From<serde_json::Error> for BlackjackError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value.to_string())
    }
}
