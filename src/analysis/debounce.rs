// src/analysis/debounce.rs — Cancellable timers and per-viewer selection debouncing

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::BoxFuture;

use super::service::AnalysisService;
use crate::roster::Employee;

/// Cancels a scheduled callback. Dropping the handle does not cancel.
pub struct TimerHandle {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl TimerHandle {
    pub fn new(cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

/// Runs a callback after a delay unless its handle is cancelled first.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, delay: Duration, callback: BoxFuture<'static, ()>) -> TimerHandle;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, callback: BoxFuture<'static, ()>) -> TimerHandle {
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            callback.await;
        });
        let abort = task.abort_handle();
        TimerHandle::new(move || abort.abort())
    }
}

/// One viewer's selection stream. Each selection cancels the previous
/// pending timer, so only the last selection in a burst fires.
pub struct SelectionDebouncer<S: Scheduler = TokioScheduler> {
    scheduler: S,
    delay: Duration,
    pending: Mutex<Option<TimerHandle>>,
}

impl SelectionDebouncer<TokioScheduler> {
    pub fn new(delay: Duration) -> Self {
        Self::with_scheduler(TokioScheduler, delay)
    }
}

impl<S: Scheduler> SelectionDebouncer<S> {
    pub fn with_scheduler(scheduler: S, delay: Duration) -> Self {
        Self {
            scheduler,
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn select(&self, callback: BoxFuture<'static, ()>) {
        let mut pending = self
            .pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(previous) = pending.take() {
            previous.cancel();
        }
        *pending = Some(self.scheduler.schedule(self.delay, callback));
    }

    /// Select an employee; their gap analysis is requested once the stream
    /// has been quiet for the debounce window.
    pub fn select_employee(&self, service: Arc<AnalysisService>, employee: Employee) {
        tracing::debug!("Selection changed to employee {}", employee.id);
        self.select(Box::pin(async move {
            if let Err(e) = service.fetch_individual(&employee).await {
                tracing::warn!("Prefetch for employee {} failed: {}", employee.id, e);
            }
        }));
    }

    pub fn cancel(&self) {
        let pending = self
            .pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(handle) = pending {
            handle.cancel();
        }
    }
}
