//! Deferred-task scheduler
//!
//! Owns the scheduled-but-unfired emissions of one execution generation.
//! `cancel_all` must be atomic with respect to scheduling a new timeline:
//! the generation counter is bumped before the handles are aborted, so a
//! task racing with its own abort still observes the stale generation and
//! refuses to fire. Without this, two rapid `execute` calls could
//! interleave ghost messages from both generations.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

/// A set of deferred one-shot tasks sharing a cancellation generation.
#[derive(Debug, Default)]
pub struct Timeline {
    handles: Vec<JoinHandle<()>>,
    generation: Arc<AtomicU64>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `task` to run after `delay`, unless the timeline is
    /// cancelled first. Tasks fire in increasing delay order.
    pub fn schedule<F>(&mut self, delay: Duration, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let scheduled_gen = self.generation.load(Ordering::SeqCst);
        let generation = Arc::clone(&self.generation);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if generation.load(Ordering::SeqCst) == scheduled_gen {
                task();
            }
        });
        self.handles.push(handle);
    }

    /// Invalidate every scheduled-but-unfired task. Idempotent.
    pub fn cancel_all(&mut self) {
        // Generation first: a task past its sleep but not yet fired sees
        // the bump even if abort arrives late.
        self.generation.fetch_add(1, Ordering::SeqCst);
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }

    /// Number of tasks scheduled in the current generation.
    pub fn pending(&self) -> usize {
        self.handles.len()
    }
}

impl Drop for Timeline {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
