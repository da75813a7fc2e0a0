//! Timer engine implementation.
//!
//! The timer engine is a deadline-based state machine. It owns no thread and
//! reads no clock: every transition receives the current monotonic instant
//! from its caller, which keeps each transition a plain function of
//! `(state, input, now)`.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Running --tick(deadline reached)--> [Completed] --> Idle
//!                    |
//!                    +--stop--> Idle   (elapsed time discarded)
//! ```
//!
//! `Completed` is never stored: the tick that reaches the deadline folds it
//! back into `Idle` and hands the finished [`StudySession`] to the caller.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(TimerConfig::default());
//! engine.start(Instant::now())?;
//! // Once per second:
//! if let TickOutcome::Completed(session) = engine.tick(Instant::now(), today) {
//!     log.append(session)?;
//! }
//! ```

use std::time::{Duration, Instant};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::config::{clamp_minutes, TimerConfig};
use crate::error::TransitionError;
use crate::stats::StudySession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    /// Not counting; the full focus duration is loaded.
    Idle,
    Running,
}

/// Result of one [`TimerEngine::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The timer was not running; nothing changed.
    Idle,
    /// Still counting down.
    Counting { remaining_secs: u64 },
    /// The deadline was reached on this tick. The engine is already idle
    /// again with the full duration reloaded.
    Completed(StudySession),
}

/// Outcome of a duration change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationChange {
    pub requested: u32,
    /// Value actually stored after clamping.
    pub minutes: u32,
}

impl DurationChange {
    pub fn was_clamped(&self) -> bool {
        self.requested != self.minutes
    }
}

/// Core timer engine.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    config: TimerConfig,
    state: TimerState,
    /// Whole seconds left, rounded up. Updated on every tick.
    remaining_secs: u64,
    /// Monotonic instant at which the running session ends.
    deadline: Option<Instant>,
    /// Incremented on every start; identifies the current focus session.
    generation: u64,
}

impl TimerEngine {
    /// Create an idle engine with the focus duration loaded.
    pub fn new(config: TimerConfig) -> Self {
        let config = TimerConfig::new(config.focus_duration, config.break_duration);
        Self {
            remaining_secs: config.focus_secs(),
            config,
            state: TimerState::Idle,
            deadline: None,
            generation: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> u64 {
        self.config.focus_secs()
    }

    pub fn config(&self) -> TimerConfig {
        self.config
    }

    pub fn focus_duration(&self) -> u32 {
        self.config.focus_duration
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// 0.0 .. 100.0 progress through the current focus session.
    pub fn progress_pct(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        let elapsed = total.saturating_sub(self.remaining_secs);
        (elapsed as f64 * 100.0 / total as f64).min(100.0)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin counting down from the full focus duration.
    ///
    /// Returns the generation number of the new focus session.
    pub fn start(&mut self, now: Instant) -> Result<u64, TransitionError> {
        if self.is_running() {
            return Err(TransitionError::AlreadyRunning);
        }
        self.generation += 1;
        self.remaining_secs = self.total_secs();
        self.deadline = Some(now + Duration::from_secs(self.remaining_secs));
        self.state = TimerState::Running;
        Ok(self.generation)
    }

    /// Recompute the remaining time from the deadline.
    ///
    /// Reaching zero completes the session inside this call: the engine is
    /// idle again before it returns, so `remaining == 0 && running` is never
    /// observable.
    pub fn tick(&mut self, now: Instant, today: NaiveDate) -> TickOutcome {
        let Some(deadline) = self.deadline.filter(|_| self.is_running()) else {
            return TickOutcome::Idle;
        };

        let left = deadline.saturating_duration_since(now);
        let secs = left.as_secs() + u64::from(left.subsec_nanos() > 0);
        // An out-of-order instant must not wind the countdown back up.
        self.remaining_secs = self.remaining_secs.min(secs);

        if self.remaining_secs > 0 {
            return TickOutcome::Counting {
                remaining_secs: self.remaining_secs,
            };
        }

        let session = StudySession {
            date: today,
            minutes: self.config.focus_duration,
        };
        self.reset_idle();
        TickOutcome::Completed(session)
    }

    /// Stop and discard elapsed time. Valid from any state.
    ///
    /// Returns the number of seconds that had elapsed (0 when idle).
    pub fn stop(&mut self) -> u64 {
        let elapsed = if self.is_running() {
            self.total_secs().saturating_sub(self.remaining_secs)
        } else {
            0
        };
        self.reset_idle();
        elapsed
    }

    /// Change the focus length. Values outside `[1, 90]` are clamped.
    pub fn set_focus_duration(&mut self, minutes: u32) -> Result<DurationChange, TransitionError> {
        self.ensure_idle("change the focus duration")?;
        let change = DurationChange {
            requested: minutes,
            minutes: clamp_minutes(minutes),
        };
        self.config.focus_duration = change.minutes;
        self.remaining_secs = self.total_secs();
        Ok(change)
    }

    /// Change the break length. Same rules as the focus length.
    pub fn set_break_duration(&mut self, minutes: u32) -> Result<DurationChange, TransitionError> {
        self.ensure_idle("change the break duration")?;
        let change = DurationChange {
            requested: minutes,
            minutes: clamp_minutes(minutes),
        };
        self.config.break_duration = change.minutes;
        Ok(change)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn ensure_idle(&self, action: &'static str) -> Result<(), TransitionError> {
        if self.is_running() {
            return Err(TransitionError::LockedWhileRunning {
                action,
                state: self.state,
            });
        }
        Ok(())
    }

    fn reset_idle(&mut self) {
        self.state = TimerState::Idle;
        self.deadline = None;
        self.remaining_secs = self.total_secs();
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(TimerConfig::default())
    }
}
