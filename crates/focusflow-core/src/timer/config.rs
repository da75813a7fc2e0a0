use serde::{Deserialize, Serialize};

/// Shortest accepted focus or break length, in minutes.
pub const MIN_DURATION_MIN: u32 = 1;
/// Longest accepted focus or break length, in minutes.
pub const MAX_DURATION_MIN: u32 = 90;

pub const DEFAULT_FOCUS_MIN: u32 = 25;
pub const DEFAULT_BREAK_MIN: u32 = 5;

/// Clamp a requested duration into `[MIN_DURATION_MIN, MAX_DURATION_MIN]`.
pub fn clamp_minutes(minutes: u32) -> u32 {
    minutes.clamp(MIN_DURATION_MIN, MAX_DURATION_MIN)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Focus length in minutes.
    pub focus_duration: u32,
    /// Break length in minutes.
    pub break_duration: u32,
}

impl TimerConfig {
    /// Build a config, clamping both durations.
    pub fn new(focus_duration: u32, break_duration: u32) -> Self {
        Self {
            focus_duration: clamp_minutes(focus_duration),
            break_duration: clamp_minutes(break_duration),
        }
    }

    /// Focus length in seconds.
    pub fn focus_secs(&self) -> u64 {
        u64::from(self.focus_duration) * 60
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            focus_duration: DEFAULT_FOCUS_MIN,
            break_duration: DEFAULT_BREAK_MIN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_classic_pomodoro() {
        let c = TimerConfig::default();
        assert_eq!(c.focus_duration, 25);
        assert_eq!(c.break_duration, 5);
        assert_eq!(c.focus_secs(), 1500);
    }

    #[test]
    fn new_clamps_both_ends() {
        let c = TimerConfig::new(0, 200);
        assert_eq!(c.focus_duration, MIN_DURATION_MIN);
        assert_eq!(c.break_duration, MAX_DURATION_MIN);
    }

    #[test]
    fn countdown_length_ignores_break() {
        assert_eq!(TimerConfig::new(25, 90).focus_secs(), 1500);
        assert_eq!(TimerConfig::new(25, 1).focus_secs(), 1500);
    }
}
