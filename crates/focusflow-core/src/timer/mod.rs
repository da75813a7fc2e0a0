mod config;
mod engine;
mod ticker;

pub use config::{
    clamp_minutes, TimerConfig, DEFAULT_BREAK_MIN, DEFAULT_FOCUS_MIN, MAX_DURATION_MIN,
    MIN_DURATION_MIN,
};
pub use engine::{DurationChange, TickOutcome, TimerEngine, TimerState};
pub use ticker::{
    ManualTicker, Tick, TickHandle, Ticker, TickerStats, TokioTickHandle, TokioTicker, TICK_PERIOD,
};
