//! Concurrent checksums over an ordered collection of subjects.

use std::sync::{Arc, Mutex};

use sumstream_source::Subject;
use tokio::sync::{Semaphore, oneshot};
use tracing::{debug, warn};

use super::checksummer::{Checksummer, engine_for_child, run_engine};
use super::delivery::DeliveryQueue;
use crate::data::{BatchOptions, ChecksumOptions, ChecksumResult, Progress, ProgressCallback};
use crate::error::ChecksumError;

type BatchCompletion = Box<dyn FnOnce(Vec<ChecksumResult>) + Send + 'static>;

/// Positional result slots with exactly-once completion.
struct Accumulator {
    state: Mutex<Slots>,
}

struct Slots {
    results:    Vec<Option<ChecksumResult>>,
    remaining:  usize,
    completion: Option<BatchCompletion>,
}

impl Accumulator {
    fn new(len: usize, completion: BatchCompletion) -> Self {
        Self {
            state: Mutex::new(Slots {
                results: (0..len).map(|_| None).collect(),
                remaining: len,
                completion: Some(completion),
            }),
        }
    }

    /// Stores the result for `index`. The call that fills the last slot
    /// receives every result, in input order, with the completion.
    fn record(
        &self,
        index: usize,
        result: ChecksumResult,
    ) -> Option<(Vec<ChecksumResult>, BatchCompletion)> {
        let mut slots = self.state.lock().unwrap_or_else(|e| e.into_inner());

        let slot = slots.results.get_mut(index)?;
        if slot.replace(result).is_some() {
            warn!(index, "batch slot recorded twice");
            return None;
        }
        slots.remaining -= 1;
        if slots.remaining > 0 {
            return None;
        }

        let completion = slots.completion.take()?;
        let results = slots.results.drain(..).flatten().collect();
        Some((results, completion))
    }
}

impl Checksummer {
    /// Computes checksums for every subject concurrently and hands all
    /// results, in input order, to `completion` on the delivery queue.
    ///
    /// One subject failing never affects the others; its entry carries the
    /// error. The observer in `options` receives the batch's aggregate
    /// progress, where every subject weighs one unit.
    pub fn checksum_batch_with(
        &self,
        subjects: Vec<Subject>,
        options: &ChecksumOptions,
        batch: &BatchOptions,
        completion: impl FnOnce(Vec<ChecksumResult>) + Send + 'static,
    ) {
        let queue = self.delivery_for(options);
        let count = subjects.len();
        if count == 0 {
            debug!("empty checksum batch");
            queue.post(move || completion(Vec::new()));
            return;
        }

        let parent = Progress::new(count as u64);
        let permits = Arc::new(Semaphore::new(batch.permits(count)));
        let accumulator = Arc::new(Accumulator::new(count, Box::new(completion)));
        debug!(count, permits = batch.permits(count), "dispatching checksum batch");

        for (index, subject) in subjects.into_iter().enumerate() {
            let child = parent.add_child(1);
            let engine = engine_for_child(options, child.clone());
            let publisher = Publisher::new(queue.clone(), parent.clone(), options.on_progress.clone());
            let resolver = Arc::clone(&self.resolver);
            let permits = Arc::clone(&permits);
            let accumulator = Arc::clone(&accumulator);
            let queue = queue.clone();

            self.handle.spawn(async move {
                let report_to = publisher.clone();
                let result = match permits.acquire_owned().await {
                    Ok(_permit) => {
                        run_engine(resolver, subject, engine, move |_| report_to.publish()).await
                    }
                    Err(_) => ChecksumResult::failed(subject, ChecksumError::Unknown),
                };

                child.finish();
                publisher.publish();

                if let Some((results, completion)) = accumulator.record(index, result) {
                    debug!(count = results.len(), "checksum batch complete");
                    queue.post(move || completion(results));
                }
            });
        }
    }

    /// Computes checksums for every subject and returns them in input order.
    pub async fn checksum_batch(
        &self,
        subjects: Vec<Subject>,
        options: &ChecksumOptions,
        batch: &BatchOptions,
    ) -> Vec<ChecksumResult> {
        let fallback = subjects.clone();
        let (tx, rx) = oneshot::channel();
        self.checksum_batch_with(subjects, options, batch, move |results| {
            let _ = tx.send(results);
        });
        rx.await.unwrap_or_else(|_| {
            fallback
                .into_iter()
                .map(|subject| ChecksumResult::failed(subject, ChecksumError::Unknown))
                .collect()
        })
    }
}

/// Re-publishes the batch's parent progress to the observer.
///
/// The snapshot is taken when the job runs on the delivery queue, so the
/// observer sees parent values in the order the serial queue runs them.
#[derive(Clone)]
struct Publisher {
    queue:    DeliveryQueue,
    parent:   Progress,
    observer: Option<ProgressCallback>,
}

impl Publisher {
    fn new(queue: DeliveryQueue, parent: Progress, observer: Option<ProgressCallback>) -> Self {
        Self {
            queue,
            parent,
            observer,
        }
    }

    fn publish(&self) {
        let Some(observer) = &self.observer else {
            return;
        };
        let observer = Arc::clone(observer);
        let parent = self.parent.clone();
        self.queue.post(move || observer(&parent.snapshot()));
    }
}
