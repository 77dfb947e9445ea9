use std::future::Future;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::client::ApiError;

struct Delivery<T> {
    generation: u64,
    outcome: Result<T, ApiError>,
}

/// Fetch-on-mount task owned by a panel.
///
/// Starting a new fetch aborts the one in flight and bumps the generation, so
/// a response from an earlier mount or key is discarded instead of applied.
/// Dropping the scope aborts whatever is still running.
pub struct FetchScope<T> {
    label: &'static str,
    generation: u64,
    pending: bool,
    task: Option<JoinHandle<()>>,
    sender: UnboundedSender<Delivery<T>>,
    receiver: UnboundedReceiver<Delivery<T>>,
}

impl<T: Send + 'static> FetchScope<T> {
    pub fn new(label: &'static str) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            label,
            generation: 0,
            pending: false,
            task: None,
            sender,
            receiver,
        }
    }

    /// Spawns `request` on the current tokio runtime.
    pub fn start<F>(&mut self, request: F)
    where
        F: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        self.abort_task();
        self.generation += 1;
        self.pending = true;

        let generation = self.generation;
        let sender = self.sender.clone();
        self.task = Some(tokio::spawn(async move {
            let outcome = request.await;
            let _ = sender.send(Delivery {
                generation,
                outcome,
            });
        }));
    }

    pub fn cancel(&mut self) {
        self.abort_task();
        if self.pending {
            self.generation += 1;
            self.pending = false;
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Waits for the current fetch. Returns `None` when nothing is in flight.
    pub async fn settle(&mut self) -> Option<Result<T, ApiError>> {
        while self.pending {
            let delivery = self.receiver.recv().await?;
            if let Some(outcome) = self.accept(delivery) {
                return Some(outcome);
            }
        }
        None
    }

    /// Non-blocking variant of [`settle`](Self::settle).
    pub fn try_settle(&mut self) -> Option<Result<T, ApiError>> {
        while self.pending {
            let delivery = self.receiver.try_recv().ok()?;
            if let Some(outcome) = self.accept(delivery) {
                return Some(outcome);
            }
        }
        None
    }

    fn accept(&mut self, delivery: Delivery<T>) -> Option<Result<T, ApiError>> {
        if delivery.generation != self.generation {
            debug!(
                scope = self.label,
                stale = delivery.generation,
                current = self.generation,
                "discarding stale response"
            );
            return None;
        }
        self.pending = false;
        self.task = None;
        Some(delivery.outcome)
    }
}

impl<T> FetchScope<T> {
    fn abort_task(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl<T> Drop for FetchScope<T> {
    fn drop(&mut self) {
        self.abort_task();
    }
}

impl<T> std::fmt::Debug for FetchScope<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchScope")
            .field("label", &self.label)
            .field("generation", &self.generation)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}
