use std::time::Duration;

use serde::{Deserialize, Serialize};
use sumstream_source::HttpSourceOptions;
use sumstream_verify::DigestAlgorithm;

use super::chunksize::Chunksize;
use super::options::{BatchOptions, ChecksumOptions};

/// Flat, serializable settings for the whole stack.
///
/// Missing fields take their defaults, so an empty document is valid.
///
/// ```
/// use sumstream::{ChecksumConfig, Chunksize, DigestAlgorithm};
///
/// let config: ChecksumConfig =
///     serde_json::from_str(r#"{"algorithm": "sha1", "chunksize": "tiny"}"#).unwrap();
/// assert_eq!(config.algorithm, DigestAlgorithm::Sha1);
/// assert_eq!(config.chunksize, Chunksize::Tiny);
/// assert_eq!(config.request_timeout_ms, 5_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChecksumConfig {
    pub algorithm:          DigestAlgorithm,
    pub chunksize:          Chunksize,
    pub max_concurrent:     Option<usize>,
    pub request_timeout_ms: u64,
}

impl Default for ChecksumConfig {
    fn default() -> Self {
        Self {
            algorithm: DigestAlgorithm::Sha256,
            chunksize: Chunksize::default(),
            max_concurrent: None,
            request_timeout_ms: 5_000,
        }
    }
}

impl ChecksumConfig {
    pub fn checksum_options(&self) -> ChecksumOptions {
        ChecksumOptions::default()
            .algorithm(self.algorithm)
            .chunksize(self.chunksize)
    }

    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            max_concurrent: self.max_concurrent,
        }
    }

    pub fn http_options(&self) -> HttpSourceOptions {
        HttpSourceOptions::default().timeout(Duration::from_millis(self.request_timeout_ms))
    }
}
