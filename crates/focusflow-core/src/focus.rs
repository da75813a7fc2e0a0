//! The focus core: one owned state object behind the user interface.
//!
//! [`FocusCore`] composes the timer engine, the lock controller, the session
//! log, the task and calendar stores, and the collaborators they need (clock,
//! tick source, notifier). Every user action is a method call on it; every
//! resulting state change is queued as an [`Event`] that the shell drains
//! with [`FocusCore::drain_events`] and renders.
//!
//! The core holds at most one live tick handle. It is spawned by
//! [`FocusCore::start`] and cancelled on every exit from `Running`.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::CalendarStore;
use crate::clock::Clock;
use crate::error::{Result, TransitionError};
use crate::events::{Event, Snapshot, StopReason};
use crate::lock::{FocusLock, GiveUpConfirmation, Tool};
use crate::notify::{self, CompletionAlert, Notifier, DEFAULT_COMPLETION_MESSAGE};
use crate::stats::{DailyMinutes, SessionLog, StudySession};
use crate::task::TaskStore;
use crate::timer::{
    DurationChange, Tick, TickHandle, TickOutcome, Ticker, TimerConfig, TimerEngine, TICK_PERIOD,
};

/// Headline numbers for the overview screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dashboard {
    pub total_study_minutes: u64,
    pub tasks_pending: usize,
    pub tasks_total: usize,
    pub upcoming_targets: usize,
    pub weekly: Vec<DailyMinutes>,
}

/// A user action on the timer or the lock screen.
#[derive(Debug)]
pub enum Command {
    Start,
    Stop,
    SetFocusDuration(u32),
    SetBreakDuration(u32),
    RequestGiveUp,
    ConfirmGiveUp(GiveUpConfirmation),
    CancelGiveUp,
    SelectTool(Option<Tool>),
    ToggleTool(Tool),
    SetNote(String),
}

pub struct FocusCore {
    engine: TimerEngine,
    lock: FocusLock,
    log: SessionLog,
    tasks: TaskStore,
    calendar: CalendarStore,
    clock: Arc<dyn Clock>,
    ticker: Box<dyn Ticker>,
    tick_handle: Option<Box<dyn TickHandle>>,
    notifier: Box<dyn Notifier>,
    completion_message: String,
    events: Vec<Event>,
}

impl FocusCore {
    pub fn new(
        config: TimerConfig,
        clock: Arc<dyn Clock>,
        ticker: Box<dyn Ticker>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            engine: TimerEngine::new(config),
            lock: FocusLock::new(),
            log: SessionLog::new(),
            tasks: TaskStore::new(),
            calendar: CalendarStore::new(),
            clock,
            ticker,
            tick_handle: None,
            notifier,
            completion_message: DEFAULT_COMPLETION_MESSAGE.to_string(),
            events: Vec::new(),
        }
    }

    /// Replace the (empty) session log, e.g. with sample history.
    pub fn with_session_log(mut self, log: SessionLog) -> Self {
        self.log = log;
        self
    }

    pub fn with_completion_message(mut self, message: impl Into<String>) -> Self {
        self.completion_message = message.into();
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn snapshot(&self) -> Snapshot {
        let config = self.engine.config();
        Snapshot {
            state: self.engine.state(),
            remaining_secs: self.engine.remaining_secs(),
            total_secs: self.engine.total_secs(),
            running: self.engine.is_running(),
            locked: self.lock.locked(&self.engine),
            active_tool: self.lock.active_tool(),
            give_up_pending: self.lock.is_give_up_pending(),
            focus_duration: config.focus_duration,
            break_duration: config.break_duration,
            progress_pct: self.engine.progress_pct(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    pub fn locked(&self) -> bool {
        self.lock.locked(&self.engine)
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn session_log(&self) -> &SessionLog {
        &self.log
    }

    pub fn note(&self) -> &str {
        self.lock.note()
    }

    pub fn tasks(&self) -> &TaskStore {
        &self.tasks
    }

    pub fn tasks_mut(&mut self) -> &mut TaskStore {
        &mut self.tasks
    }

    pub fn calendar(&self) -> &CalendarStore {
        &self.calendar
    }

    pub fn calendar_mut(&mut self) -> &mut CalendarStore {
        &mut self.calendar
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Whether a periodic tick source is currently live.
    pub fn tick_source_active(&self) -> bool {
        self.tick_handle.as_ref().is_some_and(|h| h.is_active())
    }

    pub fn dashboard(&self) -> Dashboard {
        let today = self.today();
        Dashboard {
            total_study_minutes: self.log.total_minutes(),
            tasks_pending: self.tasks.pending_count(),
            tasks_total: self.tasks.len(),
            upcoming_targets: self.calendar.upcoming_count(today),
            weekly: self.log.weekly(today),
        }
    }

    /// Take all events queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    // ── Timer commands ───────────────────────────────────────────────

    /// Start a focus session and raise the lock overlay.
    pub fn start(&mut self) -> Result<()> {
        let generation = self.engine.start(self.clock.now())?;
        self.cancel_tick_source();
        self.tick_handle = Some(self.ticker.spawn(generation, TICK_PERIOD));

        let config = self.engine.config();
        tracing::info!(generation, minutes = config.focus_duration, "focus session started");
        self.events.push(Event::TimerStarted {
            generation,
            focus_minutes: config.focus_duration,
            duration_secs: config.focus_secs(),
            at: Utc::now(),
        });
        Ok(())
    }

    /// Deliver a tick from the periodic source. Ticks spawned for an earlier
    /// focus session are ignored.
    pub fn on_tick(&mut self, tick: Tick) {
        if tick.generation != self.engine.generation() || !self.engine.is_running() {
            tracing::debug!(generation = tick.generation, "stale tick dropped");
            return;
        }
        self.tick();
    }

    /// Recompute the countdown now. Completes the session when the deadline
    /// has passed.
    pub fn tick(&mut self) {
        let outcome = self.engine.tick(self.clock.now(), self.clock.today());
        match outcome {
            TickOutcome::Idle => {}
            TickOutcome::Counting { remaining_secs } => {
                tracing::trace!(remaining_secs, "tick");
            }
            TickOutcome::Completed(session) => self.complete(session),
        }
    }

    /// Reset the idle timer to the full duration.
    ///
    /// Refused while the lock overlay is up: a running session can only be
    /// ended early through [`FocusCore::request_give_up`] and
    /// [`FocusCore::confirm_give_up`].
    pub fn stop(&mut self) -> Result<()> {
        if self.engine.is_running() {
            return Err(TransitionError::LockedWhileRunning {
                action: "stop",
                state: self.engine.state(),
            }
            .into());
        }
        let discarded_secs = self.engine.stop();
        self.leave_running();
        self.events.push(Event::TimerStopped {
            reason: StopReason::Reset,
            discarded_secs,
            at: Utc::now(),
        });
        Ok(())
    }

    pub fn set_focus_duration(&mut self, minutes: u32) -> Result<DurationChange> {
        let change = self.engine.set_focus_duration(minutes)?;
        if change.was_clamped() {
            tracing::warn!(
                requested = change.requested,
                minutes = change.minutes,
                "focus duration clamped"
            );
        }
        self.events.push(Event::FocusDurationChanged {
            requested: change.requested,
            minutes: change.minutes,
            at: Utc::now(),
        });
        Ok(change)
    }

    pub fn set_break_duration(&mut self, minutes: u32) -> Result<DurationChange> {
        let change = self.engine.set_break_duration(minutes)?;
        if change.was_clamped() {
            tracing::warn!(
                requested = change.requested,
                minutes = change.minutes,
                "break duration clamped"
            );
        }
        self.events.push(Event::BreakDurationChanged {
            requested: change.requested,
            minutes: change.minutes,
            at: Utc::now(),
        });
        Ok(change)
    }

    // ── Lock screen ──────────────────────────────────────────────────

    /// First step of giving up. The timer keeps running.
    pub fn request_give_up(&mut self) -> Result<GiveUpConfirmation> {
        let confirmation = self.lock.request_give_up(&self.engine)?;
        self.events.push(Event::GiveUpRequested { at: Utc::now() });
        Ok(confirmation)
    }

    /// Second step: end the session early. Nothing is logged.
    pub fn confirm_give_up(&mut self, confirmation: GiveUpConfirmation) -> Result<u64> {
        let discarded_secs = self.lock.confirm_give_up(&mut self.engine, confirmation)?;
        self.leave_running();
        self.events.push(Event::TimerStopped {
            reason: StopReason::GaveUp,
            discarded_secs,
            at: Utc::now(),
        });
        Ok(discarded_secs)
    }

    pub fn cancel_give_up(&mut self) -> bool {
        let cancelled = self.lock.cancel_give_up();
        if cancelled {
            self.events.push(Event::GiveUpCancelled { at: Utc::now() });
        }
        cancelled
    }

    pub fn select_tool(&mut self, tool: Option<Tool>) -> Result<Option<Tool>> {
        let previous = self.lock.select_tool(&self.engine, tool)?;
        self.events.push(Event::ToolSelected { tool, at: Utc::now() });
        Ok(previous)
    }

    pub fn toggle_tool(&mut self, tool: Tool) -> Result<Option<Tool>> {
        let active = self.lock.toggle_tool(&self.engine, tool)?;
        self.events.push(Event::ToolSelected {
            tool: active,
            at: Utc::now(),
        });
        Ok(active)
    }

    pub fn set_note(&mut self, text: &str) -> Result<()> {
        Ok(self.lock.set_note(&self.engine, text)?)
    }

    pub fn calculate(&self, expr: &str) -> Result<f64> {
        self.lock.calculate(&self.engine, expr)
    }

    /// Apply one user action. Only [`Command::RequestGiveUp`] yields a value:
    /// the confirmation needed for the second step.
    pub fn dispatch(&mut self, command: Command) -> Result<Option<GiveUpConfirmation>> {
        tracing::debug!(?command, "dispatch");
        match command {
            Command::Start => self.start()?,
            Command::Stop => self.stop()?,
            Command::SetFocusDuration(minutes) => {
                self.set_focus_duration(minutes)?;
            }
            Command::SetBreakDuration(minutes) => {
                self.set_break_duration(minutes)?;
            }
            Command::RequestGiveUp => return self.request_give_up().map(Some),
            Command::ConfirmGiveUp(confirmation) => {
                self.confirm_give_up(confirmation)?;
            }
            Command::CancelGiveUp => {
                self.cancel_give_up();
            }
            Command::SelectTool(tool) => {
                self.select_tool(tool)?;
            }
            Command::ToggleTool(tool) => {
                self.toggle_tool(tool)?;
            }
            Command::SetNote(text) => self.set_note(&text)?,
        }
        Ok(None)
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Natural completion. The engine is already idle when this runs.
    fn complete(&mut self, session: StudySession) {
        self.leave_running();
        if let Err(e) = self.log.append(session) {
            tracing::warn!(error = %e, "completed session not logged");
        }
        tracing::info!(minutes = session.minutes, date = %session.date, "focus session completed");
        self.events.push(Event::TimerCompleted {
            session,
            at: Utc::now(),
        });

        let alert = CompletionAlert {
            session,
            message: self.completion_message.clone(),
        };
        if let Some(e) = notify::deliver(self.notifier.as_mut(), &alert) {
            self.events.push(Event::NotificationFailed {
                message: e.to_string(),
                at: Utc::now(),
            });
        }
    }

    fn leave_running(&mut self) {
        self.cancel_tick_source();
        self.lock.release();
    }

    fn cancel_tick_source(&mut self) {
        if let Some(mut handle) = self.tick_handle.take() {
            handle.cancel();
        }
    }
}

impl std::fmt::Debug for FocusCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FocusCore")
            .field("engine", &self.engine)
            .field("lock", &self.lock)
            .field("sessions", &self.log.len())
            .field("tasks", &self.tasks.len())
            .field("targets", &self.calendar.len())
            .field("tick_source_active", &self.tick_source_active())
            .finish_non_exhaustive()
    }
}
