//! Cancellable, coalescing delayed events.
//!
//! A [`Debouncer`] delivers an event on a channel once its delay has elapsed
//! without a newer event being scheduled. Every event is stamped with a
//! generation number; the owner applies an event only if
//! [`Debouncer::is_current`] still holds for it, which also discards an event
//! that was already queued when the timer got cancelled.
//!
//! Timers run as tokio tasks, so scheduling requires a running runtime.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
pub struct Debouncer<E> {
    delay: Duration,
    generation: u64,
    pending: Option<JoinHandle<()>>,
    shutdown: CancellationToken,
    tx: mpsc::UnboundedSender<E>,
}

impl<E: Send + 'static> Debouncer<E> {
    /// Create a debouncer sending into `tx`.
    ///
    /// Cancelling `shutdown` stops any pending timer for good.
    pub fn new(delay: Duration, tx: mpsc::UnboundedSender<E>, shutdown: &CancellationToken) -> Self {
        Self {
            delay,
            generation: 0,
            pending: None,
            shutdown: shutdown.child_token(),
            tx,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace any pending event with a new one built from its generation.
    pub fn schedule(&mut self, make: impl FnOnce(u64) -> E) -> u64 {
        self.cancel();
        let generation = self.generation;
        if self.shutdown.is_cancelled() {
            return generation;
        }
        let event = make(generation);

        let tx = self.tx.clone();
        let shutdown = self.shutdown.clone();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::select! {
                _ = shutdown.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let _ = tx.send(event);
                }
            }
        }));
        generation
    }

    /// Drop the pending event, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        self.generation += 1;
    }

    /// Whether an event with `generation` should still take effect.
    pub fn is_current(&self, generation: u64) -> bool {
        self.pending.is_some() && self.generation == generation
    }

    /// Mark the event with `generation` as applied.
    pub fn complete(&mut self, generation: u64) {
        if self.is_current(generation) {
            self.pending = None;
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl<E> Drop for Debouncer<E> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Fired(u64, &'static str);

    fn debouncer(ms: u64) -> (Debouncer<Fired>, mpsc::UnboundedReceiver<Fired>, CancellationToken) {
        let (tx, rx) = mpsc::unbounded_channel();
        let token = CancellationToken::new();
        (Debouncer::new(Duration::from_millis(ms), tx, &token), rx, token)
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay() {
        let (mut debouncer, mut rx, _token) = debouncer(1000);
        let generation = debouncer.schedule(|g| Fired(g, "a"));

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert!(rx.try_recv().is_err());

        let fired = rx.recv().await.unwrap();
        assert_eq!(fired, Fired(generation, "a"));
        assert!(debouncer.is_current(generation));
        debouncer.complete(generation);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_last_event_in_window_fires() {
        let (mut debouncer, mut rx, _token) = debouncer(1000);
        debouncer.schedule(|g| Fired(g, "first"));
        tokio::time::sleep(Duration::from_millis(500)).await;
        debouncer.schedule(|g| Fired(g, "second"));
        tokio::time::sleep(Duration::from_millis(500)).await;
        let last = debouncer.schedule(|g| Fired(g, "third"));

        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert_eq!(rx.try_recv().unwrap(), Fired(last, "third"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_invalidates_queued_event() {
        let (mut debouncer, mut rx, _token) = debouncer(10);
        let generation = debouncer.schedule(|g| Fired(g, "late"));
        tokio::time::sleep(Duration::from_millis(20)).await;

        debouncer.cancel();
        let queued = rx.try_recv().unwrap();
        assert_eq!(queued.0, generation);
        assert!(!debouncer.is_current(generation));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_pending_timer() {
        let (mut debouncer, mut rx, _token) = debouncer(100);
        debouncer.schedule(|g| Fired(g, "dropped"));
        drop(debouncer);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_pending_timer() {
        let (mut debouncer, mut rx, token) = debouncer(100);
        debouncer.schedule(|g| Fired(g, "never"));
        token.cancel();

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(rx.try_recv().is_err());
    }
}
