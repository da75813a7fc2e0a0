//! Completion alert for the terminal: an optional bell plus the message.

use std::io::Write;

use focusflow_core::storage::NotificationsConfig;
use focusflow_core::{CompletionAlert, Notifier, NotifyError};

pub struct TerminalNotifier {
    enabled: bool,
    bell: bool,
}

impl TerminalNotifier {
    pub fn from_config(config: &NotificationsConfig) -> Self {
        Self {
            enabled: config.enabled,
            bell: config.bell,
        }
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&mut self, alert: &CompletionAlert) -> Result<(), NotifyError> {
        if !self.enabled {
            tracing::debug!("completion alert disabled");
            return Ok(());
        }
        let bell = if self.bell { "\x07" } else { "" };
        let mut out = std::io::stdout().lock();
        writeln!(out, "{bell}{}", alert.message)
            .and_then(|()| out.flush())
            .map_err(|e| NotifyError {
                channel: "terminal",
                message: e.to_string(),
            })
    }
}
