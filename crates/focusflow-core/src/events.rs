use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::lock::Tool;
use crate::stats::StudySession;
use crate::timer::TimerState;

/// Why a focus session ended before its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// `stop` while idle: only reloads the duration.
    Reset,
    /// Confirmed give-up from the lock screen.
    GaveUp,
}

/// Every state change in the core produces an Event.
/// The shell renders them; tests assert on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        generation: u64,
        focus_minutes: u32,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    /// Ended early; elapsed time is discarded and nothing is logged.
    TimerStopped {
        reason: StopReason,
        discarded_secs: u64,
        at: DateTime<Utc>,
    },
    /// Natural completion; the session has already been appended.
    TimerCompleted {
        session: StudySession,
        at: DateTime<Utc>,
    },
    FocusDurationChanged {
        requested: u32,
        minutes: u32,
        at: DateTime<Utc>,
    },
    BreakDurationChanged {
        requested: u32,
        minutes: u32,
        at: DateTime<Utc>,
    },
    GiveUpRequested {
        at: DateTime<Utc>,
    },
    GiveUpCancelled {
        at: DateTime<Utc>,
    },
    ToolSelected {
        tool: Option<Tool>,
        at: DateTime<Utc>,
    },
    /// The completion alert could not be delivered. State is unaffected.
    NotificationFailed {
        message: String,
        at: DateTime<Utc>,
    },
}

/// Read-only view of the core for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub state: TimerState,
    pub remaining_secs: u64,
    pub total_secs: u64,
    pub running: bool,
    pub locked: bool,
    pub active_tool: Option<Tool>,
    pub give_up_pending: bool,
    pub focus_duration: u32,
    pub break_duration: u32,
    pub progress_pct: f64,
}

impl Snapshot {
    /// `MM:SS` rendering of the remaining time.
    pub fn clock_face(&self) -> String {
        format!("{:02}:{:02}", self.remaining_secs / 60, self.remaining_secs % 60)
    }
}
