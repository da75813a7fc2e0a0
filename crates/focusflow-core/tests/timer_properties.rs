//! Property tests over arbitrary command sequences.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use focusflow_core::{
    Event, FocusCore, GiveUpConfirmation, LogNotifier, ManualClock, ManualTicker, Tick,
    TimerConfig, Tool,
};
use proptest::prelude::*;
use proptest::test_runner::Config;

#[derive(Debug, Clone)]
enum Op {
    Start,
    Advance(u64),
    Stop,
    RequestGiveUp,
    ConfirmGiveUp,
    CancelGiveUp,
    SetFocus(u32),
    SelectTool(Option<Tool>),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Start),
        (1_u64..400).prop_map(Op::Advance),
        Just(Op::Stop),
        Just(Op::RequestGiveUp),
        Just(Op::ConfirmGiveUp),
        Just(Op::CancelGiveUp),
        (0_u32..200).prop_map(Op::SetFocus),
        prop_oneof![
            Just(None),
            Just(Some(Tool::Calculator)),
            Just(Some(Tool::Notes)),
        ]
        .prop_map(Op::SelectTool),
    ]
}

fn core(focus: u32) -> (FocusCore, ManualClock, ManualTicker) {
    let clock = ManualClock::new(NaiveDate::from_ymd_opt(2026, 10, 15).unwrap());
    let ticker = ManualTicker::new();
    let core = FocusCore::new(
        TimerConfig::new(focus, 5),
        Arc::new(clock.clone()),
        Box::new(ticker.clone()),
        Box::new(LogNotifier),
    );
    (core, clock, ticker)
}

fn live_tick(core: &mut FocusCore) {
    let generation = core.engine().generation();
    core.on_tick(Tick { generation });
}

proptest! {
    #![proptest_config(Config::with_cases(48))]

    #[test]
    fn every_duration_completes_exactly_once(focus in 1_u32..=90) {
        let (mut core, clock, _ticker) = core(focus);
        core.start().unwrap();

        let total = u64::from(focus) * 60;
        let mut completed_at = Vec::new();
        for i in 1..=total + 5 {
            clock.advance(Duration::from_secs(1));
            live_tick(&mut core);
            let snap = core.snapshot();
            prop_assert_eq!(snap.locked, snap.running);
            prop_assert!(snap.remaining_secs > 0);
            for event in core.drain_events() {
                if let Event::TimerCompleted { session, .. } = event {
                    prop_assert_eq!(session.minutes, focus);
                    completed_at.push(i);
                }
            }
        }

        prop_assert_eq!(completed_at, vec![total]);
        prop_assert_eq!(core.session_log().len(), 1);
    }

    #[test]
    fn lock_follows_timer_under_any_command_sequence(
        focus in 1_u32..=5,
        ops in prop::collection::vec(op(), 1..80),
    ) {
        let (mut core, clock, ticker) = core(focus);
        let stats = ticker.stats();
        let mut pending: Option<GiveUpConfirmation> = None;
        let mut completions = 0;

        for op in ops {
            match op {
                Op::Start => {
                    let was_running = core.is_running();
                    prop_assert_eq!(core.start().is_err(), was_running);
                }
                Op::Advance(secs) => {
                    for _ in 0..secs {
                        clock.advance(Duration::from_secs(1));
                        live_tick(&mut core);
                    }
                }
                Op::Stop => {
                    let was_running = core.is_running();
                    prop_assert_eq!(core.stop().is_err(), was_running);
                    prop_assert_eq!(core.is_running(), was_running);
                }
                Op::RequestGiveUp => {
                    if let Ok(token) = core.request_give_up() {
                        pending = Some(token);
                    }
                }
                Op::ConfirmGiveUp => {
                    if let Some(token) = pending.take() {
                        let _ = core.confirm_give_up(token);
                    }
                }
                Op::CancelGiveUp => {
                    let running = core.is_running();
                    let remaining = core.snapshot().remaining_secs;
                    core.cancel_give_up();
                    prop_assert_eq!(core.is_running(), running);
                    prop_assert_eq!(core.snapshot().remaining_secs, remaining);
                }
                Op::SetFocus(minutes) => {
                    let result = core.set_focus_duration(minutes);
                    prop_assert_eq!(result.is_err(), core.is_running());
                }
                Op::SelectTool(tool) => {
                    let result = core.select_tool(tool);
                    prop_assert_eq!(result.is_ok(), core.is_running());
                }
            }

            completions += core
                .drain_events()
                .iter()
                .filter(|e| matches!(e, Event::TimerCompleted { .. }))
                .count();

            let snap = core.snapshot();
            prop_assert_eq!(snap.locked, snap.running);
            prop_assert!((1..=90).contains(&snap.focus_duration));
            prop_assert!(snap.remaining_secs <= snap.total_secs);
            prop_assert!(snap.remaining_secs > 0);
            prop_assert_eq!(stats.live(), usize::from(snap.running));
            prop_assert_eq!(core.tick_source_active(), snap.running);
            if !snap.running {
                prop_assert_eq!(snap.active_tool, None);
                prop_assert!(!snap.give_up_pending);
            }
            prop_assert_eq!(core.session_log().len(), completions);
        }
    }
}
