//! Error types for sumstream-source.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("file I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("metadata probe of {url} failed with status {status}")]
    ProbeFailed { url: String, status: u16 },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("request was dropped before completing")]
    Bridge,
}

pub type Result<T> = std::result::Result<T, SourceError>;
