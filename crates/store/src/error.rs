use prescripto_core::CoreError;
use prescripto_http::client::error::ClientError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Credential storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
