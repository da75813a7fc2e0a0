//! Completion notification boundary.
//!
//! Notifications are fire-and-forget. They are sent after the completion
//! transition has committed, and a delivery failure is logged and otherwise
//! ignored.

use serde::{Deserialize, Serialize};

use crate::error::NotifyError;
use crate::stats::StudySession;

pub const DEFAULT_COMPLETION_MESSAGE: &str = "Focus session complete! Great job!";

/// What the user is told when a focus session finishes naturally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionAlert {
    pub session: StudySession,
    pub message: String,
}

pub trait Notifier: Send {
    fn notify(&mut self, alert: &CompletionAlert) -> Result<(), NotifyError>;
}

/// Writes the alert to the tracing log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, alert: &CompletionAlert) -> Result<(), NotifyError> {
        tracing::info!(
            minutes = alert.session.minutes,
            date = %alert.session.date,
            "{}",
            alert.message
        );
        Ok(())
    }
}

/// Deliver `alert`, swallowing failures. Returns the failure for reporting.
pub(crate) fn deliver(
    notifier: &mut dyn Notifier,
    alert: &CompletionAlert,
) -> Option<NotifyError> {
    match notifier.notify(alert) {
        Ok(()) => None,
        Err(e) => {
            tracing::warn!(error = %e, "completion notification not delivered");
            Some(e)
        }
    }
}
