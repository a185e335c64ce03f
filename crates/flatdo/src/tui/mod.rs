use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event as CrosstermEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use flatdo_app::{TaskService, TaskStore};

mod app;
mod view;

use self::app::App;

const TICK_RATE_MS: u64 = 250;

/// Launch the interactive TUI.
pub fn run<S: TaskStore>(service: TaskService<S>, show_done: bool) -> Result<()> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let result = run_event_loop(&mut terminal, service, show_done);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result
}

fn run_event_loop<S: TaskStore>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    service: TaskService<S>,
    show_done: bool,
) -> Result<()> {
    let mut app = App::new(service, show_done)?;

    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(TICK_RATE_MS);

    loop {
        terminal.draw(|f| app.draw(f))?;
        if app.should_quit {
            break;
        }

        let timeout = tick_rate.checked_sub(last_tick.elapsed()).unwrap_or_default();

        if event::poll(timeout)? {
            match event::read()? {
                CrosstermEvent::Key(key) => app.handle_key(key),
                // A resize only needs the next draw; task state and any
                // in-flight operation are untouched.
                CrosstermEvent::Resize(_, _) => {}
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}
