use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Handle to a callback scheduled with [`schedule`].
pub struct TimerHandle {
    task: JoinHandle<()>,
}

impl TimerHandle {
    /// Stop the callback from running if it hasn't fired yet.
    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Run `f` once after `delay`. Must be called from within a tokio runtime.
pub fn schedule<F>(delay: Duration, f: F) -> TimerHandle
where
    F: FnOnce() + Send + 'static,
{
    let task = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        f();
    });
    TimerHandle { task }
}

/// Coalesces bursts of calls: only the last one within `delay` runs.
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<TimerHandle>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancel whatever is pending and schedule `f` after the full delay.
    pub fn call<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut pending = self.pending.lock().unwrap();
        if let Some(previous) = pending.take() {
            previous.cancel();
        }
        *pending = Some(schedule(self.delay, f));
    }

    /// Drop the pending call, if any. Returns whether one was still waiting.
    pub fn cancel(&self) -> bool {
        match self.pending.lock().unwrap().take() {
            Some(handle) => {
                let was_pending = !handle.is_finished();
                handle.cancel();
                was_pending
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Ok(mut pending) = self.pending.lock() {
            if let Some(handle) = pending.take() {
                handle.cancel();
            }
        }
    }
}
