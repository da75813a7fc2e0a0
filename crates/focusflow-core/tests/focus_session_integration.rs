//! Integration tests for a full focus session.
//!
//! Drives [`FocusCore`] with a hand-advanced clock and a manual tick source,
//! covering natural completion, give-up, duration changes and the tick
//! source lifecycle.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use focusflow_core::{
    CompletionAlert, CoreError, Event, FocusCore, ManualClock, ManualTicker, Notifier,
    NotifyError, StopReason, TickOutcome, TimerConfig, TimerEngine, TimerState, Tool,
    TransitionError,
};

#[derive(Clone, Default)]
struct RecordingNotifier {
    alerts: Arc<Mutex<Vec<CompletionAlert>>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, alert: &CompletionAlert) -> Result<(), NotifyError> {
        self.alerts.lock().unwrap().push(alert.clone());
        Ok(())
    }
}

struct Harness {
    core: FocusCore,
    clock: ManualClock,
    ticker: ManualTicker,
    notifier: RecordingNotifier,
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
}

fn harness(focus_minutes: u32) -> Harness {
    let clock = ManualClock::new(today());
    let ticker = ManualTicker::new();
    let notifier = RecordingNotifier::default();
    let core = FocusCore::new(
        TimerConfig::new(focus_minutes, 5),
        Arc::new(clock.clone()),
        Box::new(ticker.clone()),
        Box::new(notifier.clone()),
    );
    Harness {
        core,
        clock,
        ticker,
        notifier,
    }
}

impl Harness {
    /// Advance one second and deliver one tick from the live source.
    fn tick(&mut self) {
        self.clock.advance(Duration::from_secs(1));
        let generation = self.core.engine().generation();
        self.core.on_tick(focusflow_core::Tick { generation });
    }
}

#[test]
fn test_full_session_completes_once_and_logs_it() {
    let mut h = harness(25);
    h.core.start().unwrap();
    assert!(h.core.locked());

    let mut completions = 0;
    for i in 1..=1500 {
        h.tick();
        let snap = h.core.snapshot();
        assert_eq!(snap.locked, snap.running);
        for event in h.core.drain_events() {
            if let Event::TimerCompleted { session, .. } = event {
                completions += 1;
                assert_eq!(i, 1500, "completed early at tick {i}");
                assert_eq!(session.minutes, 25);
                assert_eq!(session.date, today());
            }
        }
        if i < 1500 {
            assert_eq!(snap.remaining_secs, 1500 - i);
            assert!(snap.running);
        }
    }

    assert_eq!(completions, 1);
    let snap = h.core.snapshot();
    assert!(!snap.running);
    assert!(!snap.locked);
    // Countdown reloaded for the next session.
    assert_eq!(snap.remaining_secs, 1500);

    let log = h.core.session_log();
    assert_eq!(log.len(), 1);
    assert_eq!(log.all()[0].minutes, 25);

    assert_eq!(h.notifier.alerts.lock().unwrap().len(), 1);
    assert!(!h.core.tick_source_active());
    assert_eq!(h.ticker.stats().live(), 0);

    // Extra ticks after completion change nothing.
    h.tick();
    assert_eq!(h.core.session_log().len(), 1);
    assert!(h.core.drain_events().is_empty());
}

#[test]
fn test_engine_stop_after_partial_session_discards_progress() {
    let t0 = Instant::now();
    let mut engine = TimerEngine::new(TimerConfig::new(25, 5));
    engine.start(t0).unwrap();
    for i in 1..=100 {
        let out = engine.tick(t0 + Duration::from_secs(i), today());
        assert!(matches!(out, TickOutcome::Counting { .. }));
    }
    assert_eq!(engine.remaining_secs(), 1400);

    assert_eq!(engine.stop(), 100);
    assert_eq!(engine.remaining_secs(), 1500);
    assert_eq!(engine.state(), TimerState::Idle);
}

#[test]
fn test_give_up_after_partial_session_discards_progress() {
    let mut h = harness(25);
    h.core.start().unwrap();
    for _ in 0..100 {
        h.tick();
    }
    assert_eq!(h.core.snapshot().remaining_secs, 1400);
    h.core.drain_events();

    let confirmation = h.core.request_give_up().unwrap();
    // Asking alone changes nothing about the timer.
    let snap = h.core.snapshot();
    assert!(snap.running);
    assert!(snap.give_up_pending);
    assert_eq!(snap.remaining_secs, 1400);

    let discarded = h.core.confirm_give_up(confirmation).unwrap();
    assert_eq!(discarded, 100);

    let snap = h.core.snapshot();
    assert!(!snap.running);
    assert!(!snap.locked);
    assert_eq!(snap.remaining_secs, 1500);
    assert!(h.core.session_log().is_empty());
    assert!(h.notifier.alerts.lock().unwrap().is_empty());

    let events = h.core.drain_events();
    assert!(events.iter().any(|e| matches!(
        e,
        Event::TimerStopped {
            reason: StopReason::GaveUp,
            discarded_secs: 100,
            ..
        }
    )));
}

#[test]
fn test_unconfirmed_give_up_leaves_timer_untouched() {
    let mut h = harness(25);
    h.core.start().unwrap();
    for _ in 0..10 {
        h.tick();
    }
    let before = h.core.snapshot();

    let _confirmation = h.core.request_give_up().unwrap();
    assert!(h.core.cancel_give_up());

    let after = h.core.snapshot();
    assert_eq!(after.remaining_secs, before.remaining_secs);
    assert!(after.running);
    assert!(after.locked);
    assert!(!after.give_up_pending);
    assert!(h.core.tick_source_active());
}

#[test]
fn test_focus_duration_clamped_and_rejected_while_running() {
    let mut h = harness(25);

    let change = h.core.set_focus_duration(200).unwrap();
    assert_eq!(change.minutes, 90);
    assert_eq!(h.core.snapshot().remaining_secs, 90 * 60);

    // Idempotent while idle.
    h.core.set_focus_duration(40).unwrap();
    h.core.set_focus_duration(40).unwrap();
    assert_eq!(h.core.snapshot().focus_duration, 40);
    assert_eq!(h.core.snapshot().remaining_secs, 2400);

    h.core.start().unwrap();
    h.tick();
    let err = h.core.set_focus_duration(10).unwrap_err();
    assert!(matches!(
        err,
        CoreError::InvalidTransition(TransitionError::LockedWhileRunning { .. })
    ));
    let snap = h.core.snapshot();
    assert_eq!(snap.focus_duration, 40);
    assert_eq!(snap.remaining_secs, 2399);
}

#[test]
fn test_completion_logs_duration_in_effect() {
    let mut h = harness(25);
    h.core.set_focus_duration(2).unwrap();
    h.core.start().unwrap();
    for _ in 0..120 {
        h.tick();
    }
    h.core.set_focus_duration(3).unwrap();
    h.core.start().unwrap();
    for _ in 0..180 {
        h.tick();
    }

    let minutes: Vec<u32> = h.core.session_log().all().iter().map(|s| s.minutes).collect();
    assert_eq!(minutes, vec![2, 3]);
    assert_eq!(h.core.session_log().total_minutes(), 5);
}

#[test]
fn test_backgrounded_process_completes_on_first_late_tick() {
    let mut h = harness(1);
    h.core.start().unwrap();

    // No ticks delivered for five minutes, then one arrives.
    h.clock.advance(Duration::from_secs(300));
    let generation = h.core.engine().generation();
    h.core.on_tick(focusflow_core::Tick { generation });

    assert!(!h.core.is_running());
    assert_eq!(h.core.session_log().len(), 1);
}

#[test]
fn test_each_session_owns_one_tick_source() {
    let mut h = harness(1);
    for _ in 0..3 {
        h.core.start().unwrap();
        assert_eq!(h.ticker.stats().live(), 1);
        let confirmation = h.core.request_give_up().unwrap();
        h.core.confirm_give_up(confirmation).unwrap();
        assert_eq!(h.ticker.stats().live(), 0);
    }
    h.core.start().unwrap();
    for _ in 0..60 {
        h.tick();
    }
    let stats = h.ticker.stats();
    assert_eq!(stats.spawned(), 4);
    assert_eq!(stats.cancelled(), 4);
    assert_eq!(stats.live(), 0);
}

#[test]
fn test_tools_reset_when_session_ends() {
    let mut h = harness(1);
    assert!(h.core.select_tool(Some(Tool::Notes)).is_err());

    h.core.start().unwrap();
    h.core.select_tool(Some(Tool::Notes)).unwrap();
    h.core.set_note("integrate by parts").unwrap();
    h.core.select_tool(Some(Tool::Calculator)).unwrap();
    assert_eq!(h.core.snapshot().active_tool, Some(Tool::Calculator));
    assert_eq!(h.core.calculate("12 x 45").unwrap(), 540.0);

    for _ in 0..60 {
        h.tick();
    }
    let snap = h.core.snapshot();
    assert_eq!(snap.active_tool, None);
    assert!(!snap.locked);
    assert_eq!(h.core.note(), "integrate by parts");
}
