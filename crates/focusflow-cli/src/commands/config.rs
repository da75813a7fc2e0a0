use clap::Subcommand;
use focusflow_core::timer::{clamp_minutes, MAX_DURATION_MIN, MIN_DURATION_MIN};
use focusflow_core::Config;

const DURATION_KEYS: [&str; 2] = ["timer.focus_duration", "timer.break_duration"];

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "timer.focus_duration", "notifications.bell")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => match clamp_note(&key, &value) {
                    Some(note) => println!("{value} ({note})"),
                    None => println!("{value}"),
                },
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            match clamp_note(&key, &value) {
                Some(note) => println!("ok ({note})"),
                None => println!("ok"),
            }
        }
        ConfigAction::List => {
            let config = Config::load()?;
            let json = serde_json::to_string_pretty(&config)?;
            println!("{json}");
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}

/// Durations outside the accepted range are stored as typed but clamped
/// when a session starts. Returns the note to show for such a value.
fn clamp_note(key: &str, value: &str) -> Option<String> {
    if !DURATION_KEYS.contains(&key) {
        return None;
    }
    let raw: u32 = value.trim().parse().ok()?;
    let used = clamp_minutes(raw);
    (used != raw).then(|| {
        format!("used as {used}; allowed range is {MIN_DURATION_MIN}-{MAX_DURATION_MIN}")
    })
}
