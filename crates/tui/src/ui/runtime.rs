//! Runtime: terminal lifecycle and the event loop for the results viewer.
//!
//! - A dedicated input thread blocks on `crossterm::event::read()` and
//!   forwards events over a channel, so `poll()` and `read()` never race
//!   across threads.
//! - Background work (classification) reports back over a `Msg` channel.
//! - Ticks are fast (100 ms) only while the throbber spins and slow (5 s)
//!   otherwise. Frames are drawn only after something changed.
use std::io::Write;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use exoscope_util::UserPreferences;
use ratatui::{Terminal, prelude::*};
use tokio::{
    signal,
    sync::mpsc,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, warn};

use crate::app::{App, Effect, Msg, Startup};
use crate::cmd;
use crate::ui::components::ResultsComponent;
use crate::ui::components::component::Component;

const FAST_TICK: Duration = Duration::from_millis(100);
const IDLE_TICK: Duration = Duration::from_millis(5000);

type CrosstermTerminal = Terminal<CrosstermBackend<std::io::Stdout>>;

/// Spawn the input thread. It exits once the receiver is dropped or the
/// terminal stops producing events.
fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(256);
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(event) => {
                    if sender.blocking_send(event).is_err() {
                        break;
                    }
                }
                Err(error) => {
                    warn!("Failed to read event: {}", error);
                    break;
                }
            }
        }
    });
    receiver
}

/// Put the terminal into raw mode and enter the alternate screen. Raw mode
/// is switched back off if anything after it fails.
fn setup_terminal() -> Result<CrosstermTerminal> {
    enable_raw_mode()?;
    enter_screen(std::io::stdout()).inspect_err(|_| {
        let _ = execute!(std::io::stdout(), LeaveAlternateScreen);
        let _ = disable_raw_mode();
    })
}

fn enter_screen<W: Write>(mut writer: W) -> Result<Terminal<CrosstermBackend<W>>> {
    execute!(writer, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(writer))?)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut CrosstermTerminal) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn render(terminal: &mut CrosstermTerminal, app: &mut App, view: &mut ResultsComponent) -> Result<()> {
    terminal.draw(|frame| view.render(frame, frame.area(), app))?;
    Ok(())
}

fn is_interrupt(event: &Event) -> bool {
    matches!(event, Event::Key(key) if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

fn handle_input_event(app: &mut App, view: &mut ResultsComponent, event: Event) -> Vec<Effect> {
    match event {
        Event::Key(key) if key.is_press() => view.handle_key_events(app, key),
        Event::Resize(width, height) => view.handle_message(app, Msg::Resize(width, height)),
        _ => Vec::new(),
    }
}

/// Sets up the terminal, runs the loop until the user quits, and restores
/// the terminal even when the loop fails.
pub async fn run_app(mut startup: Startup, preferences: Arc<UserPreferences>) -> Result<()> {
    let classify = startup.classify.take();
    let mut app = App::new(startup, &preferences);
    let mut view = ResultsComponent::default();
    let (msg_sender, mut msg_receiver) = mpsc::unbounded_channel::<Msg>();

    let mut input_receiver = spawn_input_thread();
    let mut terminal = setup_terminal()?;

    let mut effects = Vec::new();
    if let Some(request) = classify {
        effects.push(app.start_classification(request));
    }
    cmd::run_effects(&mut app, effects, &msg_sender, &preferences);

    let outcome = event_loop(
        &mut terminal,
        &mut app,
        &mut view,
        &mut input_receiver,
        &mut msg_receiver,
        &msg_sender,
        &preferences,
    )
    .await;
    cleanup_terminal(&mut terminal)?;
    debug!("viewer closed");
    outcome
}

async fn event_loop(
    terminal: &mut CrosstermTerminal,
    app: &mut App,
    view: &mut ResultsComponent,
    input_receiver: &mut mpsc::Receiver<Event>,
    msg_receiver: &mut mpsc::UnboundedReceiver<Msg>,
    msg_sender: &mpsc::UnboundedSender<Msg>,
    preferences: &UserPreferences,
) -> Result<()> {
    let mut current_interval = IDLE_TICK;
    let mut ticker = time::interval(current_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    render(terminal, app, view)?;

    while !app.should_quit {
        let target_interval = if app.classifying.is_some() { FAST_TICK } else { IDLE_TICK };
        if target_interval != current_interval {
            current_interval = target_interval;
            ticker = time::interval(current_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }

        let mut needs_render = false;
        let mut effects = Vec::new();
        tokio::select! {
            maybe_event = input_receiver.recv() => {
                let Some(event) = maybe_event else {
                    // Input thread is gone; nothing more can reach the viewer.
                    break;
                };
                if is_interrupt(&event) {
                    break;
                }
                effects.extend(handle_input_event(app, view, event));
                needs_render = true;
            }
            Some(msg) = msg_receiver.recv() => {
                effects.extend(view.handle_message(app, msg));
                needs_render = true;
            }
            _ = ticker.tick() => {
                needs_render = app.classifying.is_some();
                effects.extend(view.handle_message(app, Msg::Tick));
            }
            _ = signal::ctrl_c() => break,
        }

        if !effects.is_empty() {
            cmd::run_effects(app, effects, msg_sender, preferences);
        }
        if needs_render && !app.should_quit {
            render(terminal, app, view)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn screen_setup_failure_is_returned() {
        let error = enter_screen(ClosedPipe).err().unwrap();
        assert!(error.downcast_ref::<io::Error>().is_some(), "{error}");
    }
}
