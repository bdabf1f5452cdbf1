//! Host services the view needs: task spawning, timers, animation frames.

use std::future::Future;
use std::time::Duration;

use futures::future::{abortable, AbortHandle, LocalBoxFuture};

/// Single-threaded task and timer host.
///
/// The browser implementation lives in `web`; tests drive a manual clock.
pub trait Scheduler {
    /// Run `task` to completion in the background.
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);

    /// Resolve after `duration`. Dropping the future cancels the timer.
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;

    /// Resolve at the next animation frame with the frame timestamp.
    fn next_frame(&self) -> LocalBoxFuture<'static, f64>;

    /// Monotonic clock in milliseconds, same timebase as `next_frame`.
    fn now_ms(&self) -> f64;
}

/// A spawned task that is aborted when the guard is dropped.
///
/// Abort takes effect before the task is next polled, so whatever it was
/// awaiting (a debounce timer, a remote request) is dropped with it.
#[derive(Debug)]
pub struct TaskGuard {
    handle: AbortHandle,
}

impl TaskGuard {
    pub fn spawn<F>(scheduler: &dyn Scheduler, task: F) -> Self
    where
        F: Future<Output = ()> + 'static,
    {
        let (task, handle) = abortable(task);
        scheduler.spawn(Box::pin(async move {
            let _ = task.await;
        }));
        Self { handle }
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
