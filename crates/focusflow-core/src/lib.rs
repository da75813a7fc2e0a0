//! # FocusFlow Core Library
//!
//! Business logic for FocusFlow, a study companion that pairs a focus timer
//! and its lock overlay with a task list, a calendar of daily targets, and
//! study-time statistics. Every front end (currently the `focusflow` CLI)
//! is a thin shell over this crate.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a deadline-based state machine; the owner feeds it the
//!   current instant on every `tick()`
//! - **Focus Lock**: derives the lock overlay from the engine and gates early
//!   exits behind a two-step give-up
//! - **Session Log**: append-only record of completed focus sessions
//! - **Tasks / Calendar**: independent in-memory collections
//! - **Storage**: TOML configuration only; no other state outlives the process
//!
//! ## Key Components
//!
//! - [`FocusCore`]: the owned state object every UI action goes through
//! - [`TimerEngine`]: core timer state machine
//! - [`FocusLock`]: lock overlay and give-up gate
//! - [`SessionLog`]: completed sessions and their aggregates
//! - [`Config`]: application configuration management

pub mod calendar;
pub mod clock;
pub mod error;
pub mod events;
pub mod focus;
pub mod lock;
pub mod notify;
pub mod stats;
pub mod storage;
pub mod task;
pub mod timer;

pub use calendar::{CalendarStore, CalendarTarget, DayCell, MonthView};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, NotifyError, Result, TransitionError, ValidationError};
pub use events::{Event, Snapshot, StopReason};
pub use focus::{Command, Dashboard, FocusCore};
pub use lock::{FocusLock, GiveUpConfirmation, Tool};
pub use notify::{CompletionAlert, LogNotifier, Notifier};
pub use stats::{DailyMinutes, SessionLog, StudySession};
pub use storage::Config;
pub use task::{Priority, Task, TaskStore};
pub use timer::{
    DurationChange, ManualTicker, Tick, TickHandle, TickOutcome, Ticker, TimerConfig, TimerEngine,
    TimerState, TokioTicker,
};
