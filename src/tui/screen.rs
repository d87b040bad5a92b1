//! # Screen
//!
//! Owns the terminal surface and paints the fixed session layout:
//! row 0 is the title bar (reverse-styled), the middle rows hold the
//! transcript tail, and the bottom row is the prompt with the in-progress
//! input line. The cursor always lands right after the typed input, so a
//! redraw triggered by the background poller never disturbs a keystroke
//! in flight.
//!
//! Geometry is captured once when the screen is created and never
//! re-queried; a resize mid-session is out of scope. The full-frame draw
//! clears residual characters on its own, so shrinking content never leaves
//! stale text behind.
//!
//! The screen is generic over the ratatui backend: production uses the
//! crossterm backend, tests use `TestBackend`.

use std::io;
use std::sync::{Mutex, MutexGuard, PoisonError};

use ratatui::Terminal;
use ratatui::backend::Backend;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

/// Terminal dimensions captured at surface-acquisition time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub height: u16,
    pub width: u16,
}

/// The terminal surface plus everything needed to repaint it: title text,
/// prompt text, and the input line being typed.
pub struct Screen<B: Backend> {
    terminal: Terminal<B>,
    geometry: Geometry,
    title: String,
    prompt: String,
    input: String,
}

impl<B: Backend> Screen<B> {
    /// Wraps an acquired terminal, capturing its geometry.
    ///
    /// Fails if the terminal is too small to hold the title bar, at least
    /// one transcript row, and the prompt row.
    pub fn new(terminal: Terminal<B>, title: String, prompt: String) -> io::Result<Self> {
        let size = terminal
            .size()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
        if size.height < 3 || size.width == 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("terminal too small: {}x{}", size.width, size.height),
            ));
        }
        Ok(Self {
            terminal,
            geometry: Geometry {
                height: size.height,
                width: size.width,
            },
            title,
            prompt,
            input: String::new(),
        })
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Terminal column count, for wrapping inbound messages.
    pub fn width(&self) -> usize {
        self.geometry.width as usize
    }

    /// How many transcript lines fit between title bar and prompt row.
    pub fn window_rows(&self) -> usize {
        self.geometry.height.saturating_sub(2) as usize
    }

    /// Appends a character to the input line.
    pub fn push_input(&mut self, c: char) {
        self.input.push(c);
    }

    /// Removes the character before the cursor.
    pub fn backspace_input(&mut self) {
        self.input.pop();
    }

    /// Takes the completed input line, leaving the prompt empty.
    pub fn take_input(&mut self) -> String {
        std::mem::take(&mut self.input)
    }

    /// Paints the full layout: title bar, the given transcript window, and
    /// the prompt row with the in-progress input.
    pub fn render(&mut self, window: &[String]) -> io::Result<()> {
        let Geometry { height, width } = self.geometry;

        let title = Paragraph::new(self.title.as_str())
            .style(Style::default().add_modifier(Modifier::REVERSED));
        let transcript = Paragraph::new(Text::from(
            window.iter().map(|l| Line::from(l.as_str())).collect::<Vec<_>>(),
        ));
        let prompt_row = Paragraph::new(format!("{}{}", self.prompt, self.input));

        let cursor_col =
            ((self.prompt.width() + self.input.width()) as u16).min(width.saturating_sub(1));

        self.terminal.draw(|frame| {
            let area = frame.area();
            let title_area = Rect::new(0, 0, width, 1).intersection(area);
            let window_area = Rect::new(0, 1, width, height.saturating_sub(2)).intersection(area);
            let prompt_area = Rect::new(0, height - 1, width, 1).intersection(area);

            frame.render_widget(title, title_area);
            frame.render_widget(transcript, window_area);
            frame.render_widget(prompt_row, prompt_area);
            frame.set_cursor_position(Position::new(cursor_col, height - 1));
        })
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
        Ok(())
    }

    /// Wipes the surface. Called once during shutdown, after the poller has
    /// been joined.
    pub fn clear(&mut self) -> io::Result<()> {
        self.terminal
            .clear()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
    }
}

/// Acquires the screen lock, riding through poisoning: a panicked writer
/// leaves the surface repaintable, not permanently unusable.
pub fn lock_screen<B: Backend>(screen: &Mutex<Screen<B>>) -> MutexGuard<'_, Screen<B>> {
    screen.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
impl Screen<ratatui::backend::TestBackend> {
    /// Whether the painted buffer contains `text` on any single row.
    pub fn contains_text(&self, text: &str) -> bool {
        let buffer = self.terminal.backend().buffer();
        let width = self.geometry.width as usize;
        buffer
            .content()
            .chunks(width)
            .any(|row| row.iter().map(|c| c.symbol()).collect::<String>().contains(text))
    }
}
