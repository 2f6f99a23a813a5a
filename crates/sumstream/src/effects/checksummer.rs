use std::sync::Arc;

use sumstream_source::{HttpClient, HttpSourceOptions, Resolver, SourceResolver, Subject};
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use super::delivery::DeliveryQueue;
use crate::core::ChecksumEngine;
use crate::data::{ChecksumOptions, ChecksumResult, Progress, ProgressSnapshot};
use crate::error::ChecksumError;

/// Computes checksums in the background and delivers results on a
/// [`DeliveryQueue`].
///
/// Each computation runs its read loop on the runtime's blocking pool.
/// Progress callbacks for one computation arrive in order, with
/// non-decreasing completed units, and always before its completion.
///
/// # Examples
///
/// ```no_run
/// use sumstream::{ChecksumOptions, Checksummer, DigestAlgorithm, ReqwestClient, Subject};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let checksummer = Checksummer::new(ReqwestClient::new()?);
/// let options = ChecksumOptions::default().algorithm(DigestAlgorithm::Sha256);
///
/// let result = checksummer
///     .checksum(Subject::parse_url("https://example.com/archive.tar.gz")?, &options)
///     .await;
/// println!("{:?}", result.checksum());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Checksummer {
    pub(crate) resolver: Arc<dyn Resolver>,
    pub(crate) handle:   Handle,
    pub(crate) queue:    DeliveryQueue,
}

impl Checksummer {
    /// Creates a checksummer on the current runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn new<C: HttpClient>(client: C) -> Self {
        Self::with_handle(client, Handle::current(), HttpSourceOptions::default())
    }

    pub fn with_handle<C: HttpClient>(client: C, handle: Handle, http: HttpSourceOptions) -> Self {
        let resolver = SourceResolver::new(Arc::new(client), handle.clone()).with_options(http);
        Self::with_resolver(Arc::new(resolver), handle)
    }

    pub fn with_resolver(resolver: Arc<dyn Resolver>, handle: Handle) -> Self {
        let queue = DeliveryQueue::spawn(&handle);
        Self {
            resolver,
            handle,
            queue,
        }
    }

    /// The queue callbacks run on unless options name another one.
    pub fn delivery(&self) -> &DeliveryQueue { &self.queue }

    /// Computes the checksum of `subject` and hands the result to
    /// `completion` on the delivery queue.
    pub fn checksum_with(
        &self,
        subject: Subject,
        options: &ChecksumOptions,
        completion: impl FnOnce(ChecksumResult) + Send + 'static,
    ) {
        let queue = self.delivery_for(options);
        let engine = ChecksumEngine::new(options.algorithm, options.chunksize);
        let report = progress_reporter(queue.clone(), options);
        let resolver = Arc::clone(&self.resolver);

        debug!(%subject, algorithm = %options.algorithm, "dispatching checksum");
        self.handle.spawn(async move {
            let result = run_engine(resolver, subject, engine, report).await;
            queue.post(move || completion(result));
        });
    }

    /// Computes the checksum of `subject`.
    ///
    /// Resolves after every progress callback for this computation ran.
    pub async fn checksum(&self, subject: Subject, options: &ChecksumOptions) -> ChecksumResult {
        let (tx, rx) = oneshot::channel();
        self.checksum_with(subject.clone(), options, move |result| {
            let _ = tx.send(result);
        });
        rx.await
            .unwrap_or_else(|_| ChecksumResult::failed(subject, ChecksumError::Unknown))
    }

    pub(crate) fn delivery_for(&self, options: &ChecksumOptions) -> DeliveryQueue {
        options
            .delivery
            .clone()
            .unwrap_or_else(|| self.queue.clone())
    }
}

impl std::fmt::Debug for Checksummer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Checksummer")
            .field("resolver", &"{ ... }")
            .field("queue", &self.queue)
            .finish()
    }
}

/// Posts each snapshot to the observer in `options`, if any.
fn progress_reporter(
    queue: DeliveryQueue,
    options: &ChecksumOptions,
) -> impl FnMut(ProgressSnapshot) + Send + 'static {
    let observer = options.on_progress.clone();
    move |snapshot| {
        if let Some(observer) = &observer {
            let observer = Arc::clone(observer);
            queue.post(move || observer(&snapshot));
        }
    }
}

/// Runs `engine` over `subject` on the blocking pool.
pub(crate) async fn run_engine(
    resolver: Arc<dyn Resolver>,
    subject: Subject,
    mut engine: ChecksumEngine,
    report: impl FnMut(ProgressSnapshot) + Send + 'static,
) -> ChecksumResult {
    let worker_subject = subject.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        engine.run(resolver.as_ref(), &worker_subject, report)
    })
    .await
    .unwrap_or_else(|err| {
        warn!(%err, "checksum worker did not complete");
        Err(ChecksumError::Unknown)
    });

    match &outcome {
        Ok(digest) => debug!(%subject, %digest, "checksum succeeded"),
        Err(err) => debug!(%subject, %err, "checksum failed"),
    }
    ChecksumResult::new(subject, outcome)
}

/// Leaf progress for an engine that reports into a batch.
pub(crate) fn engine_for_child(options: &ChecksumOptions, child: Progress) -> ChecksumEngine {
    ChecksumEngine::new(options.algorithm, options.chunksize).with_progress(child)
}
