mod config;

pub use config::{Config, NotificationsConfig, TimerSettings, UiConfig};

use std::path::PathBuf;

/// Returns the configuration directory.
///
/// `FOCUSFLOW_CONFIG_DIR` wins when set. Otherwise `~/.config/focusflow[-dev]/`,
/// where FOCUSFLOW_ENV=dev selects the development directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("FOCUSFLOW_CONFIG_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("FOCUSFLOW_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("focusflow-dev")
            } else {
                base_dir.join("focusflow")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
