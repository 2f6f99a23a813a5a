use std::panic::{AssertUnwindSafe, catch_unwind};

use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tracing::warn;

type Job = Box<dyn FnOnce() + Send + 'static>;

enum Message {
    Run(Job),
    Flush(oneshot::Sender<()>),
}

/// Serial executor for progress and completion callbacks.
///
/// Jobs run one at a time, in posting order, on a single task of the runtime
/// the queue was spawned on. Clones share the same queue. The queue stops
/// once every clone is dropped and the backlog has drained.
///
/// Callbacks should return quickly: a blocked callback stalls every later
/// delivery on this queue.
#[derive(Debug, Clone)]
pub struct DeliveryQueue {
    tx: mpsc::UnboundedSender<Message>,
}

impl DeliveryQueue {
    pub fn spawn(handle: &Handle) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
        handle.spawn(async move {
            while let Some(message) = rx.recv().await {
                match message {
                    Message::Run(job) => {
                        if catch_unwind(AssertUnwindSafe(job)).is_err() {
                            warn!("delivery callback panicked");
                        }
                    }
                    Message::Flush(done) => {
                        let _ = done.send(());
                    }
                }
            }
        });
        Self { tx }
    }

    /// Enqueues `job`. Jobs posted after the queue shut down are dropped.
    pub fn post(&self, job: impl FnOnce() + Send + 'static) {
        if self.tx.send(Message::Run(Box::new(job))).is_err() {
            warn!("delivery queue is closed; dropping callback");
        }
    }

    /// Waits until every job posted before this call has run.
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.tx.send(Message::Flush(done)).is_ok() {
            let _ = wait.await;
        }
    }
}
