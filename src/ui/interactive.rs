use std::{io, panic, sync::Arc};

use crate::{
    browse::Enumerate,
    config::Config,
    ui::{
        picker::{Outcome, Picker},
        render,
    },
};
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};

/// Runs the picker on the terminal until the user confirms or cancels.
///
/// The UI is drawn on stderr so stdout stays free for the chosen path.
pub fn pick_path(config: &Config) -> Result<Outcome> {
    // Setup panic hook to restore terminal state on panic
    let default_hook: Arc<dyn Fn(&panic::PanicHookInfo<'_>) + Send + Sync> =
        Arc::from(panic::take_hook());
    let hook = Arc::clone(&default_hook);
    panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        hook(info);
    }));

    let mut picker = Picker::from_config(config);

    let result = enable_raw_mode()
        .and_then(|()| execute!(io::stderr(), EnterAlternateScreen, EnableMouseCapture))
        .map_err(anyhow::Error::from)
        .and_then(|()| {
            let backend = CrosstermBackend::new(io::stderr());
            let mut terminal = Terminal::new(backend)?;
            let outcome = run(&mut terminal, &mut picker, || Ok(event::read()?));
            terminal.show_cursor()?;
            outcome
        });

    // Always leave the alternate screen before anything is written to stdout
    let restored = restore_terminal();
    let _ = panic::take_hook();
    panic::set_hook(Box::new(move |info| default_hook(info)));

    let outcome = result?;
    restored?;
    Ok(outcome)
}

/// The event loop: draw, run deferred work, then wait for the next event.
pub fn run<B, E, F>(
    terminal: &mut Terminal<B>,
    picker: &mut Picker<E>,
    mut next_event: F,
) -> Result<Outcome>
where
    B: Backend,
    E: Enumerate,
    F: FnMut() -> Result<Event>,
{
    loop {
        terminal.draw(|f| render::render(f, picker))?;

        // changes made here must be drawn before blocking on input
        if picker.run_deferred() {
            continue;
        }

        let evt = next_event()?;
        if let Some(outcome) = picker.handle_event(evt) {
            return Ok(outcome);
        }
    }
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stderr(), LeaveAlternateScreen, DisableMouseCapture)
}
