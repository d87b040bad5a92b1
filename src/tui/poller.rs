//! # Poller
//!
//! Background task that keeps the transcript fed: pull new messages, wrap
//! them to the terminal width, append them as one batch, repaint, sleep,
//! repeat. A failed pull becomes an `Error: <cause>` transcript line and the
//! loop carries on; a single bad iteration never ends the session.
//!
//! The halt flag is checked once per iteration, at the top. An in-flight
//! pull or sleep is never interrupted, so shutdown waits for at most one
//! full cycle (pull latency plus the poll cadence).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, warn};
use ratatui::backend::Backend;
use tokio::task::JoinHandle;

use crate::core::buffer::MessageBuffer;
use crate::core::wrap::wrap_columns;
use crate::messaging::MessageService;
use crate::tui::screen::{Screen, lock_screen};

/// Fixed delay between successive pull attempts. Bounds both message
/// latency and redraw churn.
pub const POLL_CADENCE: Duration = Duration::from_secs(1);

/// Spawns the polling loop. It runs until `halt` is observed set, then
/// finishes; the session joins the returned handle before releasing the
/// terminal surface.
pub fn spawn<B>(
    service: Arc<dyn MessageService>,
    buffer: Arc<MessageBuffer>,
    screen: Arc<Mutex<Screen<B>>>,
    halt: Arc<AtomicBool>,
) -> JoinHandle<()>
where
    B: Backend + Send + 'static,
{
    let (width, window_rows) = {
        let screen = lock_screen(&screen);
        (screen.width(), screen.window_rows())
    };

    tokio::spawn(async move {
        debug!("Poller started (width={width}, window_rows={window_rows})");
        while !halt.load(Ordering::Relaxed) {
            poll_once(service.as_ref(), &buffer, width).await;
            redraw(&buffer, &screen, window_rows);
            tokio::time::sleep(POLL_CADENCE).await;
        }
        debug!("Poller stopped");
    })
}

/// One iteration of the pull half: fetch, decode, wrap, append as a batch.
async fn poll_once(service: &dyn MessageService, buffer: &MessageBuffer, width: usize) {
    match service.pull().await {
        Ok(raw) => {
            let mut batch = Vec::new();
            for data in raw {
                let text = String::from_utf8_lossy(&data);
                batch.extend(wrap_columns(&text, width));
            }
            buffer.extend(batch);
        }
        Err(e) => buffer.push(format!("Error: {e}")),
    }
}

fn redraw<B: Backend>(buffer: &MessageBuffer, screen: &Mutex<Screen<B>>, window_rows: usize) {
    let window = buffer.tail(window_rows);
    if let Err(e) = lock_screen(screen).render(&window) {
        warn!("Redraw from poller failed: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::TransportError;
    use crate::test_support::ScriptedService;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn test_screen() -> Arc<Mutex<Screen<TestBackend>>> {
        let terminal = Terminal::new(TestBackend::new(20, 6)).unwrap();
        let screen =
            Screen::new(terminal, "title".to_string(), "alice> ".to_string()).unwrap();
        Arc::new(Mutex::new(screen))
    }

    #[tokio::test]
    async fn messages_are_wrapped_and_appended_in_order() {
        let service = ScriptedService::new();
        service.queue_pull(Ok(vec![
            b"hi".to_vec(),
            b"a message that wraps".to_vec(),
        ]));
        let buffer = MessageBuffer::new();

        poll_once(&service, &buffer, 10).await;

        assert_eq!(
            buffer.tail(10),
            vec!["hi", "a message ", "that wraps"]
        );
    }

    #[tokio::test]
    async fn pull_failure_appends_exactly_one_error_line() {
        let service = ScriptedService::new();
        service.queue_pull(Err(TransportError::Network("timed out".to_string())));
        let buffer = MessageBuffer::new();

        poll_once(&service, &buffer, 80).await;

        let lines = buffer.tail(10);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0], "Error: network error: timed out");
    }

    #[tokio::test]
    async fn loop_continues_after_a_failed_pull() {
        let service = ScriptedService::new();
        service.queue_pull(Err(TransportError::Network("down".to_string())));
        service.queue_pull(Ok(vec![b"back".to_vec()]));
        let buffer = MessageBuffer::new();

        poll_once(&service, &buffer, 80).await;
        poll_once(&service, &buffer, 80).await;

        assert_eq!(
            buffer.tail(10),
            vec!["Error: network error: down", "back"]
        );
    }

    #[tokio::test]
    async fn empty_pull_leaves_the_buffer_untouched() {
        let service = ScriptedService::new();
        let buffer = MessageBuffer::new();

        poll_once(&service, &buffer, 80).await;

        assert!(buffer.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn halt_set_before_start_stops_the_loop_without_pulling() {
        let service = Arc::new(ScriptedService::new());
        let buffer = Arc::new(MessageBuffer::new());
        let halt = Arc::new(AtomicBool::new(true));

        let handle = spawn(service.clone(), buffer, test_screen(), halt);
        handle.await.unwrap();

        assert_eq!(service.pull_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn halt_is_observed_at_the_next_iteration() {
        let service = Arc::new(ScriptedService::new());
        let buffer = Arc::new(MessageBuffer::new());
        let halt = Arc::new(AtomicBool::new(false));

        let handle = spawn(service.clone(), buffer, test_screen(), halt.clone());
        // Let at least one iteration run, then ask it to stop.
        tokio::time::sleep(POLL_CADENCE * 2).await;
        halt.store(true, Ordering::Relaxed);
        handle.await.unwrap();

        assert!(service.pull_count() >= 1);
    }

    #[tokio::test]
    async fn poller_redraw_paints_the_transcript() {
        let service = ScriptedService::new();
        service.queue_pull(Ok(vec![b"ping".to_vec()]));
        let buffer = MessageBuffer::new();
        let screen = test_screen();

        poll_once(&service, &buffer, 20).await;
        redraw(&buffer, &screen, 4);

        let screen = screen.lock().unwrap();
        assert!(screen.contains_text("ping"));
    }
}
