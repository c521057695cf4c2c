//! Delay-then-commit scheduling for bursty input such as search keystrokes.
//!
//! Every [`Debouncer::push`] replaces the pending value and restarts the quiet
//! period. A value reaches the receiver only once the quiet period elapses
//! without a newer push.

use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(300);

pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
    commit: UnboundedSender<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Creates a debouncer and the receiver committed values arrive on
    pub fn new(delay: Duration) -> (Self, UnboundedReceiver<T>) {
        let (commit, committed) = mpsc::unbounded_channel();
        let debouncer = Self {
            delay,
            pending: None,
            commit,
        };
        (debouncer, committed)
    }

    /// Schedules `value`, superseding whatever was pending. Must be called from
    /// within a tokio runtime.
    pub fn push(&mut self, value: T) {
        self.cancel();
        let commit = self.commit.clone();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if commit.send(value).is_err() {
                log::debug!("debounced value dropped, receiver is gone");
            }
        }));
    }

    /// Drops the pending value, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .map_or(false, |handle| !handle.is_finished())
    }

    /// Stops accepting input but lets the pending value commit. The receiver
    /// closes once that value has been delivered.
    pub fn finish(mut self) {
        self.pending.take();
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn burst_commits_only_last_value() {
        let (mut debouncer, mut committed) = Debouncer::new(DEFAULT_QUIET_PERIOD);
        debouncer.push("j");
        debouncer.push("ja");
        debouncer.push("jazz");

        assert_eq!(committed.recv().await, Some("jazz"));
        assert!(committed.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn spaced_pushes_each_commit() {
        let (mut debouncer, mut committed) = Debouncer::new(Duration::from_millis(100));
        debouncer.push(1);
        tokio::time::sleep(Duration::from_millis(150)).await;
        debouncer.push(2);

        assert_eq!(committed.recv().await, Some(1));
        assert_eq!(committed.recv().await, Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn push_within_quiet_period_restarts_it() {
        let (mut debouncer, mut committed) = Debouncer::new(Duration::from_millis(100));
        debouncer.push("rock");
        tokio::time::sleep(Duration::from_millis(60)).await;
        debouncer.push("rocksteady");
        tokio::time::sleep(Duration::from_millis(60)).await;

        assert!(committed.try_recv().is_err());
        assert_eq!(committed.recv().await, Some("rocksteady"));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_and_drop_commit_nothing() {
        let (mut debouncer, mut committed) = Debouncer::new(DEFAULT_QUIET_PERIOD);
        debouncer.push("house");
        assert!(debouncer.is_pending());
        debouncer.cancel();
        assert!(!debouncer.is_pending());

        debouncer.push("techno");
        drop(debouncer);

        assert_eq!(committed.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn finish_delivers_pending_value_then_closes() {
        let (mut debouncer, mut committed) = Debouncer::new(DEFAULT_QUIET_PERIOD);
        debouncer.push("salsa");
        debouncer.finish();

        assert_eq!(committed.recv().await, Some("salsa"));
        assert_eq!(committed.recv().await, None);
    }
}
