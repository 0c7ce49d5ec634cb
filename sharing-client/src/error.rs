//! Error types for the sharing client.

use thiserror::Error;

/// Errors that can occur when talking to a Delta Sharing server.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("{0}")]
    Profile(String),

    #[error("Invalid 'url': {0}")]
    InvalidUrl(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected server response: {0}")]
    Protocol(String),

    #[error("Failed to decode Parquet data: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Failed to read Arrow data: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Decoding task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Failed to read profile: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for ClientError.
pub type Result<T> = std::result::Result<T, ClientError>;
