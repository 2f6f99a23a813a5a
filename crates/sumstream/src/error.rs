//! Error types for sumstream.

use sumstream_source::SourceError;
use thiserror::Error;

/// Why a checksum could not be produced.
#[derive(Debug, Error)]
pub enum ChecksumError {
    /// The subject could not be turned into a readable source.
    #[error("unusable source: {0}")]
    UnusableSource(#[source] SourceError),

    /// No digest was produced.
    #[error("checksum failed for an unknown reason")]
    Unknown,
}

impl From<SourceError> for ChecksumError {
    fn from(e: SourceError) -> Self { ChecksumError::UnusableSource(e) }
}

pub type Result<T> = std::result::Result<T, ChecksumError>;
