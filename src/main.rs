use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture};
use crossterm::style::ResetColor;
use crossterm::terminal::{
    self, BeginSynchronizedUpdate, DisableLineWrap, EnableLineWrap, EndSynchronizedUpdate,
    EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{cursor, execute};
use log::{info, warn};

use skyline3d::config::Args;
use skyline3d::logging::init_logging;
use skyline3d::state::SceneState;
use skyline3d::widget::{Control, SkylineWidget};

/// Puts the terminal back the way it was found, also on error and panic unwinding
struct TerminalGuard;

impl TerminalGuard {
    fn enter(out: &mut Stdout) -> Result<Self> {
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        let guard = TerminalGuard;
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            EnableMouseCapture
        )
        .context("failed to set up the terminal")?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = io::stdout();
        let restored = execute!(
            out,
            EndSynchronizedUpdate,
            DisableMouseCapture,
            ResetColor,
            cursor::Show,
            EnableLineWrap,
            LeaveAlternateScreen
        );
        if let Err(err) = restored.and_then(|_| terminal::disable_raw_mode()) {
            warn!("failed to restore the terminal: {err}");
        }
    }
}

/// Terminal size in cells
fn terminal_size() -> Result<(u16, u16)> {
    if let Some(size) = termsize::get() {
        return Ok((size.cols, size.rows));
    }
    terminal::size().context("failed to query the terminal size")
}

fn run(out: &mut Stdout, widget: &mut SkylineWidget, tick: Duration) -> Result<()> {
    let mut next_tick = Instant::now();
    loop {
        // Input until the next tick is due
        loop {
            let timeout = next_tick.saturating_duration_since(Instant::now());
            if !event::poll(timeout).context("failed to poll for input")? {
                break;
            }
            let event = event::read().context("failed to read input")?;
            if widget.event(&event) == Control::Quit {
                return Ok(());
            }
        }

        widget.tick();
        next_tick += tick;
        // Skip ticks lost to a stall instead of replaying them all at once
        let now = Instant::now();
        if next_tick < now {
            next_tick = now + tick;
        }

        execute!(out, BeginSynchronizedUpdate)?;
        widget.paint(out).context("failed to draw the frame")?;
        execute!(out, EndSynchronizedUpdate)?;
        out.flush()?;
    }
}

/// Main function
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.logging_config()).context("failed to open the log file")?;

    let state = SceneState::new(&args.scene_config());
    let (cols, rows) = terminal_size()?;
    info!("terminal {cols}x{rows}, {} fps", args.fps);
    let mut widget = SkylineWidget::new(state, cols, rows);

    let mut out = io::stdout();
    let guard = TerminalGuard::enter(&mut out)?;
    let result = run(&mut out, &mut widget, args.tick_interval());
    drop(guard);

    info!("bye");
    result
}
