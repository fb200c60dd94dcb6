use thiserror::Error;

#[derive(Error, Debug)]
pub enum XrefError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid translation unit: {0}")]
    InvalidUnit(String),
    #[error("invalid hierarchy payload: {0}")]
    Payload(#[from] PayloadError),
}

/// Failures decoding a hierarchy item's resumable payload.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PayloadError {
    #[error("payload is missing")]
    Missing,
    #[error("malformed payload: {0}")]
    Malformed(String),
    #[error("invalid symbol id `{0}`")]
    InvalidSymbolId(String),
}

pub type Result<T> = std::result::Result<T, XrefError>;
