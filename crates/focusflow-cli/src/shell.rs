//! Line-oriented command shell over [`FocusCore`].
//!
//! Each stdin line is split on whitespace and parsed with clap (multicall,
//! so the first word is the command). While focus mode is locked only the
//! timer and lock-screen commands are accepted.

use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use focusflow_core::{Command, CoreError, FocusCore, GiveUpConfirmation, Priority, Tool};

use crate::render;

pub const HELP: &str = "\
Timer:     start | stop | focus <min> | break <min> | status
Lock:      give-up | confirm | cancel | tool <calculator|notes|none>
           note [text...] | calc <a> <op> <b>
Views:     view [dashboard|tasks|calendar|timer] | stats | month [YYYY-MM]
Tasks:     task add <title...> [--priority low|medium|high] [--due YYYY-MM-DD]
           task done <n> | task rm <n> | task list
Targets:   target set <YYYY-MM-DD> <text...> | target clear <YYYY-MM-DD>
           target show <YYYY-MM-DD> | target list
Other:     help | quit";

const LOCKED: &str = "Focus mode is locked. Finish the session or give up first.";

#[derive(Parser)]
#[command(multicall = true, disable_help_subcommand = true)]
struct Line {
    #[command(subcommand)]
    command: ShellCommand,
}

#[derive(Subcommand)]
enum ShellCommand {
    /// Start a focus session and lock the screen
    Start,
    /// Reset the idle timer
    Stop,
    /// Ask to end the running session early
    #[command(name = "give-up", alias = "giveup")]
    GiveUp,
    /// Confirm giving up; the session is not logged
    Confirm,
    /// Keep going
    Cancel,
    /// Set the focus length in minutes
    Focus { minutes: u32 },
    /// Set the break length in minutes
    Break { minutes: u32 },
    /// Open a lock-screen tool, or `none` to close it
    Tool { tool: String },
    /// Show or replace the scratchpad text
    Note {
        #[arg(allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Evaluate `a op b` with the calculator
    Calc {
        #[arg(required = true, allow_hyphen_values = true)]
        expr: Vec<String>,
    },
    /// Show the timer
    Status,
    /// Switch view
    View { view: Option<View> },
    /// Manage tasks
    Task {
        #[command(subcommand)]
        action: TaskCommand,
    },
    /// Manage daily targets
    Target {
        #[command(subcommand)]
        action: TargetCommand,
    },
    /// Show a month grid
    Month { month: Option<String> },
    /// Show study statistics
    Stats,
    Help,
    #[command(alias = "exit")]
    Quit,
}

#[derive(Subcommand)]
enum TaskCommand {
    Add {
        #[arg(required = true)]
        title: Vec<String>,
        #[arg(long, short, default_value_t = Priority::Medium)]
        priority: Priority,
        /// Due date, today when omitted
        #[arg(long)]
        due: Option<NaiveDate>,
    },
    /// Toggle completion of task number `n`
    Done { n: usize },
    Rm { n: usize },
    List,
}

#[derive(Subcommand)]
enum TargetCommand {
    Set {
        date: NaiveDate,
        #[arg(required = true)]
        text: Vec<String>,
    },
    Clear { date: NaiveDate },
    /// Target for one date
    Show { date: NaiveDate },
    List,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum View {
    #[default]
    Dashboard,
    Tasks,
    Calendar,
    Timer,
}

impl View {
    pub fn parse(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name, true).ok()
    }
}

impl ShellCommand {
    /// Commands that stay available under the lock overlay.
    fn allowed_while_locked(&self) -> bool {
        matches!(
            self,
            ShellCommand::Start
                | ShellCommand::Stop
                | ShellCommand::GiveUp
                | ShellCommand::Confirm
                | ShellCommand::Cancel
                | ShellCommand::Focus { .. }
                | ShellCommand::Break { .. }
                | ShellCommand::Tool { .. }
                | ShellCommand::Note { .. }
                | ShellCommand::Calc { .. }
                | ShellCommand::Status
                | ShellCommand::Help
        )
    }
}

/// Text to print after a line, and whether the shell should exit.
#[derive(Debug, Default)]
pub struct Reply {
    pub text: String,
    pub quit: bool,
}

pub struct Shell {
    core: FocusCore,
    pending: Option<GiveUpConfirmation>,
    view: View,
}

impl Shell {
    pub fn new(core: FocusCore, view: View) -> Self {
        Self {
            core,
            pending: None,
            view,
        }
    }

    pub fn core_mut(&mut self) -> &mut FocusCore {
        &mut self.core
    }

    pub fn render_view(&self) -> String {
        match self.view {
            View::Dashboard => render::dashboard(&self.core.dashboard()),
            View::Tasks => render::tasks(self.core.tasks().all(), self.core.today()),
            View::Calendar => {
                let today = self.core.today();
                self.render_month(today.year(), today.month())
                    .unwrap_or_else(|e| format!("error: {e}"))
            }
            View::Timer => render::timer(&self.core.snapshot()),
        }
    }

    /// Render and clear the queued core events.
    pub fn drain_events(&mut self) -> String {
        let events = self.core.drain_events();
        if !self.core.is_running() {
            self.pending = None;
        }
        events
            .iter()
            .map(render::event)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn handle_line(&mut self, line: &str) -> Reply {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            return Reply::default();
        }

        let command = match Line::try_parse_from(words) {
            Ok(line) => line.command,
            Err(e) => {
                return Reply {
                    text: e.to_string().trim_end().to_string(),
                    quit: false,
                }
            }
        };

        if self.core.locked() && !command.allowed_while_locked() {
            let text = if matches!(command, ShellCommand::Quit) {
                "Give up first to quit.".to_string()
            } else {
                LOCKED.to_string()
            };
            return Reply { text, quit: false };
        }

        let quit = matches!(command, ShellCommand::Quit);
        let mut text = match self.execute(command) {
            Ok(text) => text,
            Err(e) => format!("error: {e}"),
        };
        let events = self.drain_events();
        if !events.is_empty() {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(&events);
        }
        Reply { text, quit }
    }

    fn execute(&mut self, command: ShellCommand) -> Result<String, CoreError> {
        let text = match command {
            ShellCommand::Start => self.dispatch(Command::Start)?,
            ShellCommand::Stop => self.dispatch(Command::Stop)?,
            ShellCommand::GiveUp => self.dispatch(Command::RequestGiveUp)?,
            ShellCommand::Confirm => match self.pending.take() {
                Some(confirmation) => self.dispatch(Command::ConfirmGiveUp(confirmation))?,
                None => "Nothing to confirm. Type 'give-up' first.".to_string(),
            },
            ShellCommand::Cancel => {
                self.pending = None;
                if self.core.cancel_give_up() {
                    String::new()
                } else {
                    "Nothing to cancel.".to_string()
                }
            }
            ShellCommand::Focus { minutes } => self.dispatch(Command::SetFocusDuration(minutes))?,
            ShellCommand::Break { minutes } => self.dispatch(Command::SetBreakDuration(minutes))?,
            ShellCommand::Tool { tool } => {
                let tool = match tool.as_str() {
                    "none" | "off" | "close" => None,
                    name => Some(name.parse::<Tool>()?),
                };
                self.dispatch(Command::SelectTool(tool))?
            }
            ShellCommand::Note { text } if text.is_empty() => {
                let note = self.core.note();
                if note.is_empty() {
                    "(scratchpad is empty)".to_string()
                } else {
                    note.to_string()
                }
            }
            ShellCommand::Note { text } => {
                self.dispatch(Command::SetNote(text.join(" ")))?;
                "Saved.".to_string()
            }
            ShellCommand::Calc { expr } => {
                let value = self.core.calculate(&expr.join(" "))?;
                format!("= {value}")
            }
            ShellCommand::Status => render::timer(&self.core.snapshot()),
            ShellCommand::View { view } => {
                if let Some(view) = view {
                    self.view = view;
                }
                self.render_view()
            }
            ShellCommand::Task { action } => self.task(action)?,
            ShellCommand::Target { action } => self.target(action),
            ShellCommand::Month { month } => {
                let (year, month) = match month {
                    Some(raw) => parse_month(&raw)?,
                    None => {
                        let today = self.core.today();
                        (today.year(), today.month())
                    }
                };
                self.render_month(year, month)?
            }
            ShellCommand::Stats => {
                let today = self.core.today();
                let log = self.core.session_log();
                render::stats(
                    &log.weekly(today),
                    &log.minutes_by_date(today),
                    log.total_minutes(),
                )
            }
            ShellCommand::Help => HELP.to_string(),
            ShellCommand::Quit => "Bye.".to_string(),
        };
        Ok(text)
    }

    /// Forward a timer or lock-screen action, keeping any give-up
    /// confirmation for the next `confirm`.
    fn dispatch(&mut self, command: Command) -> Result<String, CoreError> {
        if let Some(confirmation) = self.core.dispatch(command)? {
            self.pending = Some(confirmation);
        }
        Ok(String::new())
    }

    fn task(&mut self, action: TaskCommand) -> Result<String, CoreError> {
        let text = match action {
            TaskCommand::Add {
                title,
                priority,
                due,
            } => {
                let due = due.unwrap_or_else(|| self.core.today());
                let task = self
                    .core
                    .tasks_mut()
                    .add(&title.join(" "), priority, Some(due))?;
                format!("Added: {}", task.title)
            }
            TaskCommand::Done { n } => {
                let id = self.task_id(n)?;
                let done = self.core.tasks_mut().toggle(id)?;
                let label = if done { "done" } else { "not done" };
                let title = self.core.tasks().get(id).map_or("", |t| t.title.as_str());
                format!("Task {n} ({title}) marked {label}.")
            }
            TaskCommand::Rm { n } => {
                let id = self.task_id(n)?;
                let task = self.core.tasks_mut().remove(id)?;
                format!("Removed: {}", task.title)
            }
            TaskCommand::List => render::tasks(self.core.tasks().all(), self.core.today()),
        };
        Ok(text)
    }

    fn target(&mut self, action: TargetCommand) -> String {
        match action {
            TargetCommand::Set { date, text } => {
                let text = text.join(" ");
                match self.core.calendar_mut().set_target(date, &text) {
                    Some(previous) => format!("Target for {date} replaced (was: {previous})."),
                    None => format!("Target for {date} set."),
                }
            }
            TargetCommand::Clear { date } => match self.core.calendar_mut().remove(date) {
                Some(_) => format!("Target for {date} cleared."),
                None => format!("No target on {date}."),
            },
            TargetCommand::Show { date } => match self.core.calendar().target_on(date) {
                Some(target) => format!("{date}: {target}"),
                None => format!("No target on {date}."),
            },
            TargetCommand::List => render::targets(&self.core.calendar().all()),
        }
    }

    /// Resolve a 1-based task number.
    fn task_id(&self, n: usize) -> Result<uuid::Uuid, CoreError> {
        n.checked_sub(1)
            .and_then(|i| self.core.tasks().all().get(i))
            .map(|t| t.id)
            .ok_or_else(|| invalid("task", format!("no task number {n}")))
    }

    fn render_month(&self, year: i32, month: u32) -> Result<String, CoreError> {
        let view = self.core.calendar().month(year, month)?;
        Ok(render::month(&view, self.core.today()))
    }
}

fn invalid(field: &str, message: String) -> CoreError {
    focusflow_core::ValidationError::InvalidValue {
        field: field.into(),
        message,
    }
    .into()
}

/// `YYYY-MM` to (year, month).
fn parse_month(raw: &str) -> Result<(i32, u32), CoreError> {
    let first = NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d")
        .map_err(|_| invalid("month", format!("expected YYYY-MM, got '{raw}'")))?;
    Ok((first.year(), first.month()))
}
