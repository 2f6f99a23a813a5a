use std::fmt;
use std::ops::{Deref, DerefMut};

use sumstream_source::{Resolver, Source, Subject};
use sumstream_verify::{DigestAlgorithm, DigestContext};
use tracing::{debug, trace, warn};

use crate::data::{Chunksize, Progress, ProgressSnapshot};
use crate::error::{ChecksumError, Result};

/// Lifecycle of a [`ChecksumEngine`].
///
/// `Created → Resolving → Streaming → Finalizing → {Succeeded, Failed}`.
/// A failed resolution jumps straight from `Resolving` to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EngineState {
    #[default]
    Created,
    Resolving,
    Streaming,
    Finalizing,
    Succeeded,
    Failed,
}

impl EngineState {
    pub fn is_terminal(self) -> bool { matches!(self, EngineState::Succeeded | EngineState::Failed) }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineState::Created => write!(f, "Created"),
            EngineState::Resolving => write!(f, "Resolving"),
            EngineState::Streaming => write!(f, "Streaming"),
            EngineState::Finalizing => write!(f, "Finalizing"),
            EngineState::Succeeded => write!(f, "Succeeded"),
            EngineState::Failed => write!(f, "Failed"),
        }
    }
}

/// Drives one source through one digest, chunk by chunk.
///
/// An engine runs once. Reads and digest updates are strictly sequential,
/// and the source is closed exactly once when the engine reaches a terminal
/// state, including when the loop unwinds.
///
/// A source that stops yielding data before reporting end of input ends the
/// stream; the digest then covers only the bytes read so far.
///
/// # Examples
///
/// ```
/// use sumstream::{ChecksumEngine, Chunksize, DigestAlgorithm, EngineState};
/// use sumstream_source::MemorySource;
///
/// let mut engine = ChecksumEngine::new(DigestAlgorithm::Md5, Chunksize::Tiny);
/// let digest = engine
///     .run_source(MemorySource::new(&b"This is a simple string"[..]), |_| {})
///     .unwrap();
///
/// assert_eq!(digest, "0f13e02ea41fb763b0ad09daa72a4b6e");
/// assert_eq!(engine.state(), EngineState::Succeeded);
/// ```
#[derive(Debug)]
pub struct ChecksumEngine {
    algorithm: DigestAlgorithm,
    chunksize: Chunksize,
    progress:  Progress,
    state:     EngineState,
}

impl ChecksumEngine {
    pub fn new(algorithm: DigestAlgorithm, chunksize: Chunksize) -> Self {
        Self {
            algorithm,
            chunksize,
            progress: Progress::new(0),
            state: EngineState::Created,
        }
    }

    /// Reports into `progress` instead of a private node.
    #[must_use]
    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }

    pub fn algorithm(&self) -> DigestAlgorithm { self.algorithm }

    pub fn chunksize(&self) -> Chunksize { self.chunksize }

    pub fn state(&self) -> EngineState { self.state }

    pub fn progress(&self) -> &Progress { &self.progress }

    /// Resolves `subject` and streams it.
    ///
    /// `report` runs on the calling thread after every chunk.
    pub fn run(
        &mut self,
        resolver: &dyn Resolver,
        subject: &Subject,
        report: impl FnMut(ProgressSnapshot),
    ) -> Result<String> {
        self.start()?;

        let source = match resolver.resolve(subject) {
            Ok(source) => source,
            Err(err) => {
                debug!(%subject, %err, "subject could not be resolved");
                self.transition(EngineState::Failed);
                return Err(ChecksumError::UnusableSource(err));
            }
        };
        self.stream(source, report)
    }

    /// Streams an already opened source.
    pub fn run_source<S: Source>(
        &mut self,
        mut source: S,
        report: impl FnMut(ProgressSnapshot),
    ) -> Result<String> {
        if let Err(err) = self.start() {
            source.close();
            return Err(err);
        }
        self.stream(source, report)
    }

    fn start(&mut self) -> Result<()> {
        if self.state != EngineState::Created {
            warn!(state = %self.state, "checksum engine already ran");
            return Err(ChecksumError::Unknown);
        }
        self.transition(EngineState::Resolving);
        Ok(())
    }

    fn stream<S: Source>(
        &mut self,
        source: S,
        mut report: impl FnMut(ProgressSnapshot),
    ) -> Result<String> {
        let mut source = SourceGuard::new(source);
        self.transition(EngineState::Streaming);

        let mut context = DigestContext::new(self.algorithm);
        let chunk = self.chunksize.bytes();

        while !source.eof() {
            let Some(bytes) = source.read(chunk) else {
                break;
            };
            context.update(&bytes);

            self.progress.set_total(source.size().unwrap_or(0));
            self.progress.add_completed(bytes.len() as u64);
            trace!(len = bytes.len(), position = source.tell(), "digested chunk");
            report(self.progress.snapshot());
        }

        // A source of unknown size may only learn its end on the read that
        // returns nothing.
        let current = self.progress.snapshot();
        let total = source.size().unwrap_or(current.completed_units);
        if total != current.total_units {
            self.progress.set_total(total);
            report(self.progress.snapshot());
        }

        self.transition(EngineState::Finalizing);
        let digest = context.hex_digest();
        source.close();

        match digest {
            Some(digest) => {
                self.transition(EngineState::Succeeded);
                Ok(digest)
            }
            None => {
                warn!(algorithm = %self.algorithm, "digest finalization produced no result");
                self.transition(EngineState::Failed);
                Err(ChecksumError::Unknown)
            }
        }
    }

    fn transition(&mut self, next: EngineState) {
        debug!(from = %self.state, to = %next, "checksum engine transition");
        self.state = next;
    }
}

/// Owns a source and closes it exactly once.
struct SourceGuard<S: Source> {
    source: S,
    closed: bool,
}

impl<S: Source> SourceGuard<S> {
    fn new(source: S) -> Self {
        Self {
            source,
            closed: false,
        }
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.source.close();
        }
    }
}

impl<S: Source> Deref for SourceGuard<S> {
    type Target = S;

    fn deref(&self) -> &S { &self.source }
}

impl<S: Source> DerefMut for SourceGuard<S> {
    fn deref_mut(&mut self) -> &mut S { &mut self.source }
}

impl<S: Source> Drop for SourceGuard<S> {
    fn drop(&mut self) { self.close(); }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use sumstream_source::{MemorySource, SourceError};

    /// Memory source that counts `close` calls and can stop early.
    struct Tracked {
        inner:     MemorySource,
        closes:    Arc<AtomicUsize>,
        fail_from: Option<u64>,
        r#unsized:   bool,
    }

    impl Tracked {
        fn new(data: &'static [u8], closes: &Arc<AtomicUsize>) -> Self {
            Self {
                inner: MemorySource::new(data),
                closes: Arc::clone(closes),
                fail_from: None,
                r#unsized: false,
            }
        }
    }

    impl Source for Tracked {
        fn size(&self) -> Option<u64> {
            if self.r#unsized { None } else { self.inner.size() }
        }
        fn tell(&self) -> u64 { self.inner.tell() }
        fn seek(&mut self, position: u64) -> bool { self.inner.seek(position) }
        fn eof(&self) -> bool { !self.r#unsized && self.inner.eof() }
        fn read(&mut self, amount: usize) -> Option<Bytes> {
            match self.fail_from {
                Some(limit) if self.tell() >= limit => None,
                _ => self.inner.read(amount),
            }
        }
        fn close(&mut self) {
            self.closes.fetch_add(1, Ordering::SeqCst);
            self.inner.close();
        }
    }

    struct Refusing;

    impl Resolver for Refusing {
        fn resolve(&self, subject: &Subject) -> sumstream_source::Result<Box<dyn Source>> {
            Err(SourceError::UnsupportedScheme(subject.to_string()))
        }
    }

    fn chunks(n: usize) -> Chunksize { Chunksize::custom(n).unwrap() }

    #[test]
    fn test_chunking_does_not_change_digest() {
        let data: &'static [u8] = b"The quick brown fox jumps over the lazy dog";
        let whole = ChecksumEngine::new(DigestAlgorithm::Sha256, chunks(data.len()))
            .run_source(MemorySource::new(data), |_| {})
            .unwrap();

        for size in [1, 2, 7, 64] {
            let chunked = ChecksumEngine::new(DigestAlgorithm::Sha256, chunks(size))
                .run_source(MemorySource::new(data), |_| {})
                .unwrap();
            assert_eq!(chunked, whole, "chunk size {size}");
        }
    }

    #[test]
    fn test_progress_is_monotonic() {
        let mut seen = Vec::new();
        ChecksumEngine::new(DigestAlgorithm::Sha1, chunks(3))
            .run_source(MemorySource::new(&b"0123456789"[..]), |p| seen.push(p))
            .unwrap();

        let completed: Vec<u64> = seen.iter().map(|p| p.completed_units).collect();
        assert_eq!(completed, vec![3, 6, 9, 10]);
        assert!(seen.iter().all(|p| p.total_units == 10));
    }

    #[test]
    fn test_unsized_source_ends_with_settled_total() {
        let closes = Arc::new(AtomicUsize::new(0));
        let mut source = Tracked::new(b"abcdefgh", &closes);
        source.r#unsized = true;

        let mut seen = Vec::new();
        ChecksumEngine::new(DigestAlgorithm::Sha1, chunks(4))
            .run_source(source, |p| seen.push(p))
            .unwrap();

        let last = seen.last().unwrap();
        assert_eq!(seen.len(), 3);
        assert!(seen[..2].iter().all(|p| p.total_units == 0));
        assert_eq!(last.completed_units, 8);
        assert_eq!(last.total_units, 8);
        assert_eq!(last.fraction_completed, 1.0);
    }

    #[test]
    fn test_known_size_adds_no_final_report() {
        let mut seen = Vec::new();
        ChecksumEngine::new(DigestAlgorithm::Sha1, chunks(4))
            .run_source(MemorySource::new(&b"abcdefgh"[..]), |p| seen.push(p))
            .unwrap();
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_source_closed_once_on_success() {
        let closes = Arc::new(AtomicUsize::new(0));
        let mut engine = ChecksumEngine::new(DigestAlgorithm::Md5, chunks(4));
        engine.run_source(Tracked::new(b"abcdef", &closes), |_| {}).unwrap();

        assert_eq!(engine.state(), EngineState::Succeeded);
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_read_truncates_digest() {
        let closes = Arc::new(AtomicUsize::new(0));
        let mut source = Tracked::new(b"abcdef", &closes);
        source.fail_from = Some(4);

        let truncated = ChecksumEngine::new(DigestAlgorithm::Md5, chunks(2))
            .run_source(source, |_| {})
            .unwrap();
        let prefix = ChecksumEngine::new(DigestAlgorithm::Md5, chunks(2))
            .run_source(MemorySource::new(&b"abcd"[..]), |_| {})
            .unwrap();

        assert_eq!(truncated, prefix);
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_source_closed_when_report_panics() {
        let closes = Arc::new(AtomicUsize::new(0));
        let source = Tracked::new(b"abcdef", &closes);

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            ChecksumEngine::new(DigestAlgorithm::Md5, chunks(2))
                .run_source(source, |_| panic!("observer failure"))
        }));

        assert!(outcome.is_err());
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unresolvable_subject_fails_without_reading() {
        let mut engine = ChecksumEngine::new(DigestAlgorithm::Sha256, Chunksize::Tiny);
        let mut reports = 0;
        let result = engine.run(&Refusing, &Subject::from("abc"), |_| reports += 1);

        assert!(matches!(result, Err(ChecksumError::UnusableSource(_))));
        assert_eq!(engine.state(), EngineState::Failed);
        assert_eq!(reports, 0);
    }

    #[test]
    fn test_engine_runs_once() {
        let closes = Arc::new(AtomicUsize::new(0));
        let mut engine = ChecksumEngine::new(DigestAlgorithm::Sha256, Chunksize::Tiny);
        engine.run_source(MemorySource::new(&b"a"[..]), |_| {}).unwrap();

        let again = engine.run_source(Tracked::new(b"b", &closes), |_| {});
        assert!(matches!(again, Err(ChecksumError::Unknown)));
        assert_eq!(engine.state(), EngineState::Succeeded);
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_source() {
        let mut reports = 0;
        let digest = ChecksumEngine::new(DigestAlgorithm::Sha256, Chunksize::Tiny)
            .run_source(MemorySource::new(Bytes::new()), |_| reports += 1)
            .unwrap();

        assert_eq!(
            digest,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(reports, 0);
    }
}
