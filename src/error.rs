use thiserror::Error;

#[derive(Error, Debug)]
pub enum QrisError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Malformed TLV at offset {offset}: {reason}")]
    MalformedTlv { offset: usize, reason: String },
    #[error("Checksum mismatch: expected {expected}, found {actual}")]
    ChecksumMismatch { expected: String, actual: String },
    #[error("Mutation feed error: {0}")]
    Feed(String),
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Config error: {0}")]
    ConfigError(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, QrisError>;
