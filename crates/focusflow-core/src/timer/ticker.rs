//! Periodic tick sources.
//!
//! A [`Ticker`] creates at most one live [`TickHandle`] per focus session.
//! Every tick carries the generation it was spawned for, so a tick that was
//! already queued when its handle got cancelled can be recognised and dropped.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Cadence of countdown ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// One periodic wake-up for the focus session identified by `generation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub generation: u64,
}

/// Cancellable handle to a running periodic source.
pub trait TickHandle: Send {
    /// Stop the source. Cancelling twice is a no-op.
    fn cancel(&mut self);
    fn is_active(&self) -> bool;
}

pub trait Ticker: Send {
    fn spawn(&mut self, generation: u64, period: Duration) -> Box<dyn TickHandle>;
}

// ── Tokio ────────────────────────────────────────────────────────────

/// Drives ticks from a tokio interval task into an mpsc channel.
pub struct TokioTicker {
    runtime: tokio::runtime::Handle,
    tx: UnboundedSender<Tick>,
}

impl TokioTicker {
    pub fn new(runtime: tokio::runtime::Handle, tx: UnboundedSender<Tick>) -> Self {
        Self { runtime, tx }
    }

    /// Bind to the runtime of the calling task.
    pub fn from_current(
        tx: UnboundedSender<Tick>,
    ) -> Result<Self, tokio::runtime::TryCurrentError> {
        Ok(Self::new(tokio::runtime::Handle::try_current()?, tx))
    }
}

impl Ticker for TokioTicker {
    fn spawn(&mut self, generation: u64, period: Duration) -> Box<dyn TickHandle> {
        let tx = self.tx.clone();
        let task = self.runtime.spawn(async move {
            let first = tokio::time::Instant::now() + period;
            let mut interval = tokio::time::interval_at(first, period);
            // Missed ticks are dropped; the engine recomputes from its deadline.
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if tx.send(Tick { generation }).is_err() {
                    break;
                }
            }
        });
        tracing::debug!(generation, "tick source spawned");
        Box::new(TokioTickHandle { task: Some(task), generation })
    }
}

pub struct TokioTickHandle {
    task: Option<JoinHandle<()>>,
    generation: u64,
}

impl TickHandle for TokioTickHandle {
    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            tracing::debug!(generation = self.generation, "tick source cancelled");
        }
    }

    fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for TokioTickHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ── Manual ───────────────────────────────────────────────────────────

/// Counters shared between a [`ManualTicker`] and its handles.
#[derive(Debug, Default)]
pub struct TickerStats {
    spawned: AtomicUsize,
    cancelled: AtomicUsize,
    live: AtomicUsize,
}

impl TickerStats {
    pub fn spawned(&self) -> usize {
        self.spawned.load(Ordering::SeqCst)
    }

    pub fn cancelled(&self) -> usize {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Handles spawned and not yet cancelled.
    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

/// Ticker that schedules nothing; the caller delivers ticks by hand.
/// Used by tests and by non-interactive drivers.
#[derive(Debug, Clone, Default)]
pub struct ManualTicker {
    stats: Arc<TickerStats>,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> Arc<TickerStats> {
        Arc::clone(&self.stats)
    }
}

impl Ticker for ManualTicker {
    fn spawn(&mut self, _generation: u64, _period: Duration) -> Box<dyn TickHandle> {
        self.stats.spawned.fetch_add(1, Ordering::SeqCst);
        self.stats.live.fetch_add(1, Ordering::SeqCst);
        Box::new(ManualTickHandle {
            stats: Arc::clone(&self.stats),
            active: true,
        })
    }
}

struct ManualTickHandle {
    stats: Arc<TickerStats>,
    active: bool,
}

impl TickHandle for ManualTickHandle {
    fn cancel(&mut self) {
        if self.active {
            self.active = false;
            self.stats.cancelled.fetch_add(1, Ordering::SeqCst);
            self.stats.live.fetch_sub(1, Ordering::SeqCst);
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

impl Drop for ManualTickHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_cancel_is_idempotent() {
        let mut ticker = ManualTicker::new();
        let stats = ticker.stats();
        let mut handle = ticker.spawn(1, TICK_PERIOD);
        assert!(handle.is_active());
        assert_eq!(stats.live(), 1);

        handle.cancel();
        handle.cancel();
        assert!(!handle.is_active());
        assert_eq!(stats.cancelled(), 1);
        assert_eq!(stats.live(), 0);

        drop(handle);
        assert_eq!(stats.cancelled(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_ticker_delivers_tagged_ticks_until_cancelled() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut ticker = TokioTicker::from_current(tx).unwrap();
        let mut handle = ticker.spawn(7, TICK_PERIOD);

        let tick = rx.recv().await.unwrap();
        assert_eq!(tick, Tick { generation: 7 });
        let tick = rx.recv().await.unwrap();
        assert_eq!(tick.generation, 7);

        handle.cancel();
        handle.cancel();
        assert!(!handle.is_active());

        tokio::time::sleep(Duration::from_secs(5)).await;
        // At most one tick may have been queued before the abort landed.
        let mut late = 0;
        while rx.try_recv().is_ok() {
            late += 1;
        }
        assert!(late <= 1);
    }
}
