//! Plain-text rendering of core state for the interactive shell.

use std::collections::BTreeMap;
use std::fmt::Write;

use chrono::NaiveDate;
use focusflow_core::{
    CalendarTarget, DailyMinutes, Dashboard, Event, MonthView, Snapshot, StopReason, Task,
    TimerState,
};

const BAR_WIDTH: usize = 30;
const GIVE_UP_PROMPT: &str =
    "Are you sure you want to give up? Your streak will be lost. Type 'confirm' or 'cancel'.";
const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// `2h 45m`, `45m`, `0m`.
pub fn minutes_label(minutes: u64) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

fn secs_label(secs: u64) -> String {
    if secs < 60 {
        return format!("{secs}s");
    }
    format!("{}m{:02}s", secs / 60, secs % 60)
}

fn progress_bar(pct: f64) -> String {
    let filled = ((pct / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// One line of feedback for a core event.
pub fn event(event: &Event) -> String {
    match event {
        Event::TimerStarted { focus_minutes, .. } => {
            format!("Focus mode locked for {focus_minutes} min. Type 'give-up' to end early.")
        }
        Event::TimerStopped {
            reason: StopReason::GaveUp,
            discarded_secs,
            ..
        } => format!(
            "Gave up. {} of focus discarded; nothing was logged.",
            secs_label(*discarded_secs)
        ),
        Event::TimerStopped {
            reason: StopReason::Reset,
            ..
        } => "Timer reset.".to_string(),
        Event::TimerCompleted { session, .. } => {
            format!("Logged {} min on {}.", session.minutes, session.date)
        }
        Event::FocusDurationChanged {
            requested, minutes, ..
        } => clamped_line("Focus", *requested, *minutes),
        Event::BreakDurationChanged {
            requested, minutes, ..
        } => clamped_line("Break", *requested, *minutes),
        Event::GiveUpRequested { .. } => GIVE_UP_PROMPT.to_string(),
        Event::GiveUpCancelled { .. } => "Back to work.".to_string(),
        Event::ToolSelected { tool: Some(tool), .. } => format!("Opened {tool}."),
        Event::ToolSelected { tool: None, .. } => "Tools closed.".to_string(),
        Event::NotificationFailed { message, .. } => {
            format!("(completion alert failed: {message})")
        }
    }
}

fn clamped_line(what: &str, requested: u32, minutes: u32) -> String {
    if requested == minutes {
        format!("{what} duration set to {minutes} min.")
    } else {
        format!(
            "{what} duration set to {minutes} min (asked for {requested}; allowed range is 1-90)."
        )
    }
}

pub fn timer(snap: &Snapshot) -> String {
    let mut out = String::new();
    if snap.locked {
        let _ = writeln!(out, "*** FOCUS MODE LOCKED ***");
    }
    let state = match snap.state {
        TimerState::Idle => "idle",
        TimerState::Running => "running",
    };
    let _ = writeln!(
        out,
        "{}  {}  {:.0}%  ({state})",
        snap.clock_face(),
        progress_bar(snap.progress_pct),
        snap.progress_pct
    );
    let _ = write!(
        out,
        "focus {} min / break {} min",
        snap.focus_duration, snap.break_duration
    );
    if snap.locked {
        let tool = snap
            .active_tool
            .map_or_else(|| "none".to_string(), |t| t.to_string());
        let _ = write!(out, "\ntool: {tool}");
        if snap.give_up_pending {
            let _ = write!(out, "\ngive-up pending: 'confirm' or 'cancel'");
        }
    }
    out
}

pub fn dashboard(dash: &Dashboard) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Total study time: {}",
        minutes_label(dash.total_study_minutes)
    );
    let _ = writeln!(
        out,
        "Tasks pending:    {} of {}",
        dash.tasks_pending, dash.tasks_total
    );
    let _ = writeln!(out, "Upcoming targets: {}", dash.upcoming_targets);
    out.push_str(&weekly(&dash.weekly));
    out
}

pub fn weekly(days: &[DailyMinutes]) -> String {
    let mut out = String::from("Last 7 days:");
    for day in days {
        let bar = "#".repeat((day.minutes / 10) as usize);
        let _ = write!(out, "\n  {} {:>4} min {bar}", day.label, day.minutes);
    }
    out
}

/// Weekly chart followed by every logged date and its total.
pub fn stats(days: &[DailyMinutes], by_date: &BTreeMap<NaiveDate, u64>, total: u64) -> String {
    let mut out = weekly(days);
    let _ = write!(out, "\nAll days:");
    for (date, minutes) in by_date.iter().filter(|(_, m)| **m > 0) {
        let _ = write!(out, "\n  {date}  {}", minutes_label(*minutes));
    }
    let _ = write!(out, "\nTotal: {}", minutes_label(total));
    out
}

/// Numbered task list; the numbers are what `task done|rm` take.
pub fn tasks(tasks: &[Task], today: NaiveDate) -> String {
    if tasks.is_empty() {
        return "No tasks yet. Add one with 'task add <title>'.".to_string();
    }
    let mut out = String::new();
    for (i, task) in tasks.iter().enumerate() {
        let mark = if task.completed { "x" } else { " " };
        let _ = write!(out, "{:>3}. [{mark}] {} ({})", i + 1, task.title, task.priority);
        if let Some(due) = task.due_date {
            let overdue = !task.completed && due < today;
            let _ = write!(out, " due {due}{}", if overdue { " OVERDUE" } else { "" });
        }
        out.push('\n');
    }
    out.pop();
    out
}

pub fn targets(targets: &[CalendarTarget]) -> String {
    if targets.is_empty() {
        return "No targets set.".to_string();
    }
    targets
        .iter()
        .map(|t| format!("  {}  {}", t.date, t.target))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Sunday-first month grid. Days with a target carry a `*`; today is
/// bracketed instead.
pub fn month(view: &MonthView, today: NaiveDate) -> String {
    let name = MONTH_NAMES
        .get(view.month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("?");
    let mut out = format!("{name} {}\n Su  Mo  Tu  We  Th  Fr  Sa\n", view.year);

    let mut column = view.leading_blanks as usize;
    out.push_str(&"    ".repeat(column));
    for cell in &view.days {
        let day = cell.date.format("%e");
        let _ = if cell.date == today {
            write!(out, "[{day}]")
        } else if cell.target.is_some() {
            write!(out, " {day}*")
        } else {
            write!(out, " {day} ")
        };
        column += 1;
        if column == 7 {
            out.push('\n');
            column = 0;
        }
    }

    let with_targets: Vec<_> = view
        .days
        .iter()
        .filter_map(|c| c.target.as_ref().map(|t| (c.date, t)))
        .collect();
    let mut out = out.trim_end().to_string();
    for (date, target) in with_targets {
        let _ = write!(out, "\n  {date}: {target}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use focusflow_core::{CalendarStore, Priority, StudySession, TaskStore};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn minutes_label_formats_hours() {
        assert_eq!(minutes_label(0), "0m");
        assert_eq!(minutes_label(45), "45m");
        assert_eq!(minutes_label(120), "2h");
        assert_eq!(minutes_label(165), "2h 45m");
    }

    #[test]
    fn progress_bar_is_fixed_width() {
        assert_eq!(progress_bar(0.0).len(), BAR_WIDTH + 2);
        assert_eq!(progress_bar(100.0), format!("[{}]", "#".repeat(BAR_WIDTH)));
        assert_eq!(progress_bar(250.0).len(), BAR_WIDTH + 2);
    }

    #[test]
    fn clamped_duration_mentions_range() {
        let line = event(&Event::FocusDurationChanged {
            requested: 200,
            minutes: 90,
            at: Utc::now(),
        });
        assert!(line.contains("90 min"));
        assert!(line.contains("1-90"));

        let line = event(&Event::FocusDurationChanged {
            requested: 40,
            minutes: 40,
            at: Utc::now(),
        });
        assert_eq!(line, "Focus duration set to 40 min.");
    }

    #[test]
    fn completion_line_names_minutes_and_date() {
        let line = event(&Event::TimerCompleted {
            session: StudySession {
                date: day(2026, 10, 15),
                minutes: 25,
            },
            at: Utc::now(),
        });
        assert_eq!(line, "Logged 25 min on 2026-10-15.");
    }

    #[test]
    fn task_list_is_numbered_and_flags_overdue() {
        let mut store = TaskStore::new();
        store
            .add("Read chapter 4", Priority::High, Some(day(2026, 10, 1)))
            .unwrap();
        let id = store.add("Email tutor", Priority::Low, None).unwrap().id;
        store.toggle(id).unwrap();

        let text = tasks(store.all(), day(2026, 10, 15));
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("  1. [ ] Read chapter 4 (high)"));
        assert!(lines[0].ends_with("OVERDUE"));
        assert!(lines[1].starts_with("  2. [x] Email tutor (low)"));
    }

    #[test]
    fn month_grid_starts_on_the_right_weekday() {
        let mut cal = CalendarStore::new();
        cal.set_target(day(2026, 10, 20), "Mock exam");
        let view = cal.month(2026, 10).unwrap();

        let text = month(&view, day(2026, 10, 15));
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "October 2026");
        // 1 October 2026 is a Thursday: four blank cells first.
        assert!(lines[2].starts_with(&" ".repeat(16)));
        assert!(lines[2].contains(" 1 "));
        assert!(text.contains("[15]"));
        assert!(text.contains("20*"));
        assert!(text.ends_with("2026-10-20: Mock exam"));
    }

    #[test]
    fn locked_timer_shows_overlay_and_tool() {
        let snap = Snapshot {
            state: TimerState::Running,
            remaining_secs: 1400,
            total_secs: 1500,
            running: true,
            locked: true,
            active_tool: None,
            give_up_pending: true,
            focus_duration: 25,
            break_duration: 5,
            progress_pct: 100.0 / 15.0,
        };
        let text = timer(&snap);
        assert!(text.starts_with("*** FOCUS MODE LOCKED ***"));
        assert!(text.contains("23:20"));
        assert!(text.contains("tool: none"));
        assert!(text.contains("give-up pending"));
    }
}
