use std::fmt;
use std::sync::Arc;

use sumstream_verify::DigestAlgorithm;

use super::chunksize::Chunksize;
use super::progress::ProgressSnapshot;
use crate::effects::DeliveryQueue;

/// Progress observer shared between the engine and its delivery queue.
pub type ProgressCallback = Arc<dyn Fn(&ProgressSnapshot) + Send + Sync>;

/// Configuration for a checksum computation.
///
/// # Examples
///
/// ```
/// use sumstream::{ChecksumOptions, Chunksize, DigestAlgorithm};
///
/// let options = ChecksumOptions::default()
///     .algorithm(DigestAlgorithm::Md5)
///     .chunksize(Chunksize::Small)
///     .on_progress(|p| println!("{}/{}", p.completed_units, p.total_units));
/// ```
#[derive(Clone)]
pub struct ChecksumOptions {
    /// Default: SHA-256
    pub algorithm: DigestAlgorithm,

    /// Upper bound on each read issued to the source.
    ///
    /// Default: [`Chunksize::Normal`]
    pub chunksize: Chunksize,

    /// Observer invoked on the delivery queue after every chunk.
    ///
    /// For batches it receives the aggregate progress of the whole batch,
    /// one unit per subject.
    ///
    /// Default: None
    pub on_progress: Option<ProgressCallback>,

    /// Queue that progress and completion callbacks run on.
    ///
    /// Default: None (the checksummer's own queue)
    pub delivery: Option<DeliveryQueue>,
}

impl fmt::Debug for ChecksumOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChecksumOptions")
            .field("algorithm", &self.algorithm)
            .field("chunksize", &self.chunksize)
            .field("on_progress", &self.on_progress.as_ref().map(|_| "{ ... }"))
            .field("delivery", &self.delivery)
            .finish()
    }
}

impl Default for ChecksumOptions {
    fn default() -> Self {
        Self {
            algorithm: DigestAlgorithm::Sha256,
            chunksize: Chunksize::default(),
            on_progress: None,
            delivery: None,
        }
    }
}

impl ChecksumOptions {
    #[must_use]
    pub fn algorithm(mut self, algorithm: DigestAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    #[must_use]
    pub fn chunksize(mut self, chunksize: Chunksize) -> Self {
        self.chunksize = chunksize;
        self
    }

    #[must_use]
    pub fn on_progress(
        mut self,
        callback: impl Fn(&ProgressSnapshot) + Send + Sync + 'static,
    ) -> Self {
        self.on_progress = Some(Arc::new(callback));
        self
    }

    #[must_use]
    pub fn delivery(mut self, queue: DeliveryQueue) -> Self {
        self.delivery = Some(queue);
        self
    }
}

/// Configuration for batch computations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOptions {
    /// Maximum number of subjects streamed at once.
    ///
    /// Default: None (every subject at once)
    pub max_concurrent: Option<usize>,
}

impl BatchOptions {
    #[must_use]
    pub fn max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = Some(max_concurrent);
        self
    }

    pub(crate) fn permits(&self, batch_len: usize) -> usize {
        self.max_concurrent.unwrap_or(batch_len).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ChecksumOptions::default();
        assert_eq!(options.algorithm, DigestAlgorithm::Sha256);
        assert_eq!(options.chunksize, Chunksize::Normal);
        assert!(options.on_progress.is_none());
        assert!(format!("{options:?}").contains("on_progress: None"));
    }

    #[test]
    fn test_batch_permits() {
        assert_eq!(BatchOptions::default().permits(7), 7);
        assert_eq!(BatchOptions::default().max_concurrent(2).permits(7), 2);
        assert_eq!(BatchOptions::default().max_concurrent(0).permits(7), 1);
    }
}
