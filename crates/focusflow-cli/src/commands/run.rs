use std::sync::Arc;

use clap::Args;
use focusflow_core::{Config, FocusCore, SessionLog, SystemClock, TimerConfig, TokioTicker};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::shell::{Shell, View};
use crate::terminal::TerminalNotifier;

#[derive(Args)]
pub struct RunArgs {
    /// Focus length in minutes (overrides config)
    #[arg(long)]
    focus: Option<u32>,
    /// Break length in minutes (overrides config)
    #[arg(long = "break")]
    break_minutes: Option<u32>,
    /// Seed the statistics with a couple of sample sessions
    #[arg(long)]
    demo: bool,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_time()
        .build()?;
    let result = runtime.block_on(session(args));
    // The stdin reader sits on a blocking thread; don't wait for it.
    runtime.shutdown_background();
    result
}

async fn session(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let defaults = config.timer_config();
    let timer = TimerConfig::new(
        args.focus.unwrap_or(defaults.focus_duration),
        args.break_minutes.unwrap_or(defaults.break_duration),
    );

    let (tx, mut ticks) = mpsc::unbounded_channel();
    let ticker = TokioTicker::from_current(tx)?;
    let notifier = TerminalNotifier::from_config(&config.notifications);
    let mut core = FocusCore::new(
        timer,
        Arc::new(SystemClock),
        Box::new(ticker),
        Box::new(notifier),
    )
    .with_completion_message(config.notifications.message.clone());
    if args.demo || config.ui.demo_history {
        let log = SessionLog::with_sample_history(core.today());
        core = core.with_session_log(log);
    }

    let view = View::parse(&config.ui.start_view).unwrap_or_else(|| {
        tracing::warn!(view = %config.ui.start_view, "unknown start view, using dashboard");
        View::default()
    });
    let mut shell = Shell::new(core, view);
    tracing::info!(
        focus = timer.focus_duration,
        break_minutes = timer.break_duration,
        "interactive session started"
    );

    println!("FocusFlow. Type 'help' for commands.");
    println!("{}", shell.render_view());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            Some(tick) = ticks.recv() => {
                let core = shell.core_mut();
                core.on_tick(tick);
                let remaining = core.snapshot().remaining_secs;
                let running = core.is_running();
                let text = shell.drain_events();
                if !text.is_empty() {
                    println!("{text}");
                } else if running && remaining % 60 == 0 {
                    println!("{} min left", remaining / 60);
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let reply = shell.handle_line(&line);
                if !reply.text.is_empty() {
                    println!("{}", reply.text);
                }
                if reply.quit {
                    break;
                }
            }
        }
    }

    tracing::debug!("interactive session ended");
    Ok(())
}

