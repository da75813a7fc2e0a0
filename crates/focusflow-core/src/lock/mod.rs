//! Focus lock controller.
//!
//! The lock overlay is up exactly while the timer engine is running; this
//! module never stores its own `locked` flag. What it owns is the give-up
//! gate (the only sanctioned way to end a focus session early) and the
//! single-selection of permitted tools.
//!
//! Giving up takes two explicit steps:
//!
//! 1. [`FocusLock::request_give_up`] mints a [`GiveUpConfirmation`].
//! 2. [`FocusLock::confirm_give_up`] consumes it and stops the engine.
//!
//! The confirmation cannot be built anywhere else and is bound to the focus
//! session (engine generation) and to the request it came from, so a
//! cancelled or superseded request can never stop the timer.
//!
//! The lock is cosmetic: nothing here blocks other processes.

mod tools;

pub use tools::{calculate, Tool};

use crate::error::TransitionError;
use crate::timer::TimerEngine;

/// Proof that the user asked to give up. Consumed by
/// [`FocusLock::confirm_give_up`].
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a give-up request does nothing until it is confirmed"]
pub struct GiveUpConfirmation {
    generation: u64,
    nonce: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingGiveUp {
    generation: u64,
    nonce: u64,
}

#[derive(Debug, Default)]
pub struct FocusLock {
    active_tool: Option<Tool>,
    pending: Option<PendingGiveUp>,
    nonce: u64,
    scratchpad: String,
}

impl FocusLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// The overlay is presented exactly while the engine runs.
    pub fn locked(&self, engine: &TimerEngine) -> bool {
        engine.is_running()
    }

    pub fn active_tool(&self) -> Option<Tool> {
        self.active_tool
    }

    pub fn is_give_up_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn note(&self) -> &str {
        &self.scratchpad
    }

    // ── Give-up gate ─────────────────────────────────────────────────

    /// First step of giving up. Does not touch the timer.
    ///
    /// A second request replaces the first; the older confirmation becomes
    /// stale.
    pub fn request_give_up(
        &mut self,
        engine: &TimerEngine,
    ) -> Result<GiveUpConfirmation, TransitionError> {
        if !self.locked(engine) {
            return Err(TransitionError::NotRunning);
        }
        self.nonce += 1;
        let pending = PendingGiveUp {
            generation: engine.generation(),
            nonce: self.nonce,
        };
        self.pending = Some(pending);
        tracing::info!(generation = pending.generation, "give-up requested");
        Ok(GiveUpConfirmation {
            generation: pending.generation,
            nonce: pending.nonce,
        })
    }

    /// Second step: stop the engine, discarding the elapsed time.
    ///
    /// Returns the number of focus seconds thrown away.
    pub fn confirm_give_up(
        &mut self,
        engine: &mut TimerEngine,
        confirmation: GiveUpConfirmation,
    ) -> Result<u64, TransitionError> {
        let pending = self.pending.ok_or(TransitionError::NoPendingGiveUp)?;
        if pending.nonce != confirmation.nonce
            || pending.generation != confirmation.generation
            || pending.generation != engine.generation()
            || !engine.is_running()
        {
            return Err(TransitionError::StaleConfirmation);
        }
        let discarded = engine.stop();
        self.release();
        tracing::info!(discarded_secs = discarded, "gave up focus session");
        Ok(discarded)
    }

    /// Drop a pending request. Returns whether one was pending.
    pub fn cancel_give_up(&mut self) -> bool {
        let was_pending = self.pending.take().is_some();
        if was_pending {
            tracing::debug!("give-up cancelled");
        }
        was_pending
    }

    // ── Tools ────────────────────────────────────────────────────────

    /// Make `tool` the active one (or clear with `None`). Any previously
    /// active tool is deselected. Returns the previous selection.
    pub fn select_tool(
        &mut self,
        engine: &TimerEngine,
        tool: Option<Tool>,
    ) -> Result<Option<Tool>, TransitionError> {
        if !self.locked(engine) {
            return Err(TransitionError::NotRunning);
        }
        let previous = std::mem::replace(&mut self.active_tool, tool);
        tracing::debug!(?previous, ?tool, "tool selected");
        Ok(previous)
    }

    /// Select `tool`, or deselect it when it is already active. Returns the
    /// new selection.
    pub fn toggle_tool(
        &mut self,
        engine: &TimerEngine,
        tool: Tool,
    ) -> Result<Option<Tool>, TransitionError> {
        let next = if self.active_tool == Some(tool) {
            None
        } else {
            Some(tool)
        };
        self.select_tool(engine, next)?;
        Ok(next)
    }

    /// Replace the scratchpad text. The notes tool must be active.
    pub fn set_note(&mut self, engine: &TimerEngine, text: &str) -> Result<(), TransitionError> {
        self.require_tool(engine, Tool::Notes)?;
        self.scratchpad.clear();
        self.scratchpad.push_str(text);
        Ok(())
    }

    /// Evaluate an expression. The calculator must be active.
    pub fn calculate(&self, engine: &TimerEngine, expr: &str) -> crate::Result<f64> {
        self.require_tool(engine, Tool::Calculator)?;
        Ok(calculate(expr)?)
    }

    /// Called whenever the engine leaves `Running`: clears the tool selection
    /// and any pending give-up. The scratchpad text is kept.
    pub fn release(&mut self) {
        self.active_tool = None;
        self.pending = None;
    }

    fn require_tool(&self, engine: &TimerEngine, tool: Tool) -> Result<(), TransitionError> {
        if !self.locked(engine) {
            return Err(TransitionError::NotRunning);
        }
        if self.active_tool != Some(tool) {
            return Err(TransitionError::ToolNotSelected(tool));
        }
        Ok(())
    }
}
