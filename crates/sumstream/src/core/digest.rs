//! Synchronous conveniences that need no runtime.

use std::path::Path;

use bytes::Bytes;
use sumstream_source::{FileSource, MemorySource};
use sumstream_verify::DigestAlgorithm;

use super::engine::ChecksumEngine;
use crate::data::Chunksize;
use crate::error::Result;

/// Hex digest of an in-memory buffer.
///
/// ```
/// use sumstream::{DigestAlgorithm, digest_bytes};
///
/// let digest = digest_bytes("abc", DigestAlgorithm::Sha1).unwrap();
/// assert_eq!(digest, "a9993e364706816aba3e25717850c26c9cd0d89d");
/// ```
pub fn digest_bytes(data: impl Into<Bytes>, algorithm: DigestAlgorithm) -> Result<String> {
    let data = data.into();
    let chunksize = Chunksize::custom(data.len()).unwrap_or_default();
    ChecksumEngine::new(algorithm, chunksize).run_source(MemorySource::new(data), |_| {})
}

/// Hex digest of a local file, read `chunksize` bytes at a time on the
/// calling thread.
pub fn digest_file(
    path: impl AsRef<Path>,
    algorithm: DigestAlgorithm,
    chunksize: Chunksize,
) -> Result<String> {
    let source = FileSource::open(path.as_ref())?;
    ChecksumEngine::new(algorithm, chunksize).run_source(source, |_| {})
}
