//! Periodic refresh of a visible screen.
//!
//! `Stopped -> Armed -> Firing -> Armed -> ... -> Stopped`. Ticks that land
//! while the screen is hidden are skipped; the timer keeps running. Stopping
//! is final and abandons a refresh that is still running.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::session::SyncSession;

#[async_trait]
pub trait RefreshTarget: Send + Sync {
    async fn refresh(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Stopped,
    Armed,
    Firing,
}

pub struct AutoRefresh {
    period: Duration,
    session: SyncSession,
    state: Arc<Mutex<SchedulerState>>,
    visible: Arc<AtomicBool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl AutoRefresh {
    /// The scheduler lives inside `session`: cancelling the session stops it.
    pub fn new(period: Duration, session: &SyncSession) -> Self {
        debug_assert!(!period.is_zero(), "refresh period must be positive");
        Self {
            period,
            session: SyncSession::child_of(session),
            state: Arc::new(Mutex::new(SchedulerState::Stopped)),
            visible: Arc::new(AtomicBool::new(false)),
            task: Mutex::new(None),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn state(&self) -> SchedulerState {
        *self.state.lock()
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    pub fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::SeqCst);
    }

    /// Arms the timer. No-op if already armed or once stopped.
    pub fn start(&self, target: Arc<dyn RefreshTarget>) {
        let mut task = self.task.lock();
        if task.is_some() || self.session.is_cancelled() {
            return;
        }
        *self.state.lock() = SchedulerState::Armed;
        tracing::debug!(session = %self.session.id(), period = ?self.period, "Auto-refresh armed");

        let period = self.period;
        let start = Instant::now() + period;
        let token = self.session.token().clone();
        let state = self.state.clone();
        let visible = self.visible.clone();
        let session_id = self.session.id();

        *task = Some(tokio::spawn(async move {
            let mut ticker = interval_at(start, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                if !visible.load(Ordering::SeqCst) {
                    tracing::trace!(session = %session_id, "Screen hidden, skipping refresh tick");
                    continue;
                }

                *state.lock() = SchedulerState::Firing;
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = target.refresh() => {}
                }
                {
                    let mut current = state.lock();
                    if *current == SchedulerState::Firing {
                        *current = SchedulerState::Armed;
                    }
                }
            }
            *state.lock() = SchedulerState::Stopped;
            tracing::debug!(session = %session_id, "Auto-refresh stopped");
        }));
    }

    /// Stops the timer and abandons any refresh in progress.
    pub fn stop(&self) {
        self.session.cancel();
        *self.state.lock() = SchedulerState::Stopped;
        if let Some(task) = self.task.lock().take() {
            task.abort();
        }
    }
}

impl Drop for AutoRefresh {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    #[derive(Default)]
    struct Counter {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RefreshTarget for Counter {
        async fn refresh(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Blocking {
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl RefreshTarget for Blocking {
        async fn refresh(&self) {
            self.entered.notify_one();
            self.release.notified().await;
        }
    }

    const PERIOD: Duration = Duration::from_secs(10);

    #[tokio::test(start_paused = true)]
    async fn test_fires_each_period_while_visible() {
        let session = SyncSession::new();
        let scheduler = AutoRefresh::new(PERIOD, &session);
        let counter = Arc::new(Counter::default());
        scheduler.set_visible(true);

        scheduler.start(counter.clone());
        assert_eq!(scheduler.state(), SchedulerState::Armed);

        tokio::time::sleep(PERIOD * 3 + Duration::from_millis(1)).await;
        assert_eq!(counter.calls.load(Ordering::SeqCst), 3);
        assert_eq!(scheduler.state(), SchedulerState::Armed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_skips_ticks_while_hidden() {
        let session = SyncSession::new();
        let scheduler = AutoRefresh::new(PERIOD, &session);
        let counter = Arc::new(Counter::default());

        scheduler.start(counter.clone());
        tokio::time::sleep(PERIOD * 2 + Duration::from_millis(1)).await;
        assert_eq!(counter.calls.load(Ordering::SeqCst), 0);
        assert_eq!(scheduler.state(), SchedulerState::Armed);

        scheduler.set_visible(true);
        tokio::time::sleep(PERIOD).await;
        assert_eq!(counter.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_abandons_running_refresh() {
        let session = SyncSession::new();
        let scheduler = AutoRefresh::new(PERIOD, &session);
        let target = Arc::new(Blocking {
            entered: Notify::new(),
            release: Notify::new(),
        });
        scheduler.set_visible(true);
        scheduler.start(target.clone());

        target.entered.notified().await;
        assert_eq!(scheduler.state(), SchedulerState::Firing);

        scheduler.stop();
        assert_eq!(scheduler.state(), SchedulerState::Stopped);

        scheduler.start(target.clone());
        assert_eq!(scheduler.state(), SchedulerState::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_cancel_stops_timer() {
        let session = SyncSession::new();
        let scheduler = AutoRefresh::new(PERIOD, &session);
        let counter = Arc::new(Counter::default());
        scheduler.set_visible(true);
        scheduler.start(counter.clone());

        session.cancel();
        tokio::time::sleep(PERIOD * 2).await;

        assert_eq!(counter.calls.load(Ordering::SeqCst), 0);
        assert_eq!(scheduler.state(), SchedulerState::Stopped);
    }
}
