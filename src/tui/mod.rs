//! # Interactive Session
//!
//! The ratatui-specific layer. Owns the terminal surface lifecycle, runs the
//! read-eval loop, and coordinates shutdown with the background poller.
//!
//! ## Concurrency
//!
//! Two tasks share two resources. The transcript is a mutex-guarded
//! append-only buffer; the terminal surface is a mutex-guarded [`Screen`].
//! Neither lock is held across a blocking or awaited call: message decoding
//! and wrapping happen before the buffer lock, and keyboard polling happens
//! outside the screen lock. A single atomic halt flag stops the poller.
//!
//! ## Shutdown
//!
//! Cancellation is cooperative: the `exit` command sets the halt flag, the
//! poller observes it at the top of its next iteration, and the session
//! joins the poller task before clearing and releasing the surface. After
//! the join, no background terminal write can occur. Shutdown latency is
//! therefore bounded by one pull + sleep cycle rather than being
//! instantaneous.
//!
//! Terminal restoration is tied to a guard value, so raw mode and the
//! alternate screen are released on every exit path, including errors and
//! user interrupt.

pub mod event;
pub mod poller;
pub mod screen;

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, info, warn};
use ratatui::backend::Backend;

use crate::core::buffer::MessageBuffer;
use crate::core::command::{self, Command};
use crate::messaging::MessageService;
use crate::tui::event::InputEvent;
use crate::tui::screen::{Screen, lock_screen};

/// First transcript line every session starts with.
pub const INTRO: &str = "Type 'USERNAME ...' to send a message and 'exit' to exit.";

/// How long one keyboard poll blocks before the reader loops again.
const INPUT_POLL: Duration = Duration::from_millis(100);

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user issued the exit command.
    Exited,
    /// The user aborted with Ctrl+C.
    Interrupted,
}

/// Restores the terminal on drop so raw mode never outlives the session,
/// whatever the exit path.
struct SurfaceGuard;

impl Drop for SurfaceGuard {
    fn drop(&mut self) {
        ratatui::restore();
    }
}

/// Runs a full interactive session on the real terminal.
///
/// Acquires the surface, starts the poller, processes input until the user
/// exits or interrupts, then stops the poller and restores the terminal.
pub async fn run(service: Arc<dyn MessageService>) -> io::Result<SessionEnd> {
    let terminal = ratatui::init();
    let _surface_guard = SurfaceGuard;

    let title = format!("{} - {}", service.identity(), service.endpoint());
    let prompt = format!("{}> ", service.identity());
    let screen = Arc::new(Mutex::new(Screen::new(terminal, title, prompt)?));

    let buffer = Arc::new(MessageBuffer::with_lines(vec![
        INTRO.to_string(),
        String::new(),
    ]));
    let halt = Arc::new(AtomicBool::new(false));

    info!("Session starting as {}", service.identity());
    let poller = poller::spawn(
        Arc::clone(&service),
        Arc::clone(&buffer),
        Arc::clone(&screen),
        Arc::clone(&halt),
    );

    let outcome = read_eval_loop(service.as_ref(), &buffer, &screen).await;

    // Halting: no surface write may happen after the join below.
    halt.store(true, Ordering::Relaxed);
    if let Err(e) = poller.await {
        warn!("Poller task did not join cleanly: {e}");
    }
    if outcome.is_ok() {
        lock_screen(&screen).clear()?;
    }

    info!("Session stopped");
    outcome
}

/// The foreground loop: render, read one line, interpret it.
async fn read_eval_loop<B: Backend>(
    service: &dyn MessageService,
    buffer: &MessageBuffer,
    screen: &Mutex<Screen<B>>,
) -> io::Result<SessionEnd> {
    loop {
        render(buffer, screen)?;

        let line = match read_line(buffer, screen).await? {
            ReadOutcome::Line(line) => line,
            ReadOutcome::Interrupted => {
                debug!("User interrupt");
                return Ok(SessionEnd::Interrupted);
            }
        };

        if let Some(end) = apply(service, buffer, command::classify(&line)).await {
            return Ok(end);
        }
    }
}

/// Executes one classified command against the session state.
async fn apply(
    service: &dyn MessageService,
    buffer: &MessageBuffer,
    command: Command,
) -> Option<SessionEnd> {
    match command {
        Command::Empty => None,
        Command::Exit => Some(SessionEnd::Exited),
        Command::Send { receiver, message } => {
            debug!("Pushing message to {receiver}");
            if let Err(e) = service.push(&receiver, &message).await {
                buffer.push(format!("Error: {e}"));
            }
            None
        }
        Command::Unknown => {
            buffer.push("Error: Unknown command");
            None
        }
    }
}

enum ReadOutcome {
    Line(String),
    Interrupted,
}

/// Blocks until the user submits one line from the prompt row, echoing
/// keystrokes through redraws. This is the foreground loop's only
/// suspension point.
async fn read_line<B: Backend>(
    buffer: &MessageBuffer,
    screen: &Mutex<Screen<B>>,
) -> io::Result<ReadOutcome> {
    loop {
        let Some(input) = event::next_event(INPUT_POLL)? else {
            tokio::task::yield_now().await;
            continue;
        };
        match input {
            InputEvent::Interrupt => return Ok(ReadOutcome::Interrupted),
            InputEvent::Submit => {
                let line = lock_screen(screen).take_input();
                return Ok(ReadOutcome::Line(line.trim().to_string()));
            }
            InputEvent::Char(c) => lock_screen(screen).push_input(c),
            InputEvent::Backspace => lock_screen(screen).backspace_input(),
        }
        render(buffer, screen)?;
    }
}

fn render<B: Backend>(buffer: &MessageBuffer, screen: &Mutex<Screen<B>>) -> io::Result<()> {
    let window_rows = lock_screen(screen).window_rows();
    let window = buffer.tail(window_rows);
    lock_screen(screen).render(&window)
}
