//! Crossterm-based terminal backend
//! Cross-platform terminal operations using crossterm

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute, terminal,
};
use std::io::{stdout, BufWriter, Write};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::key::Key;
use crate::term::{Size, TerminalBackend};

/// Crossterm-based terminal backend implementation
pub struct CrosstermBackend {
    writer: BufWriter<std::io::Stdout>,
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
}

impl CrosstermBackend {
    pub fn new() -> Result<Self> {
        Ok(CrosstermBackend {
            writer: BufWriter::with_capacity(8192, stdout()),
            raw_mode_enabled: false,
            alternate_screen_enabled: false,
        })
    }
}

impl TerminalBackend for CrosstermBackend {
    fn init(&mut self) -> Result<()> {
        // Alternate screen first so the shell's scrollback stays intact
        execute!(self.writer, terminal::EnterAlternateScreen)
            .map_err(|e| Error::terminal(format!("failed to enter alternate screen: {e}")))?;
        self.alternate_screen_enabled = true;

        terminal::enable_raw_mode()
            .map_err(|e| Error::terminal(format!("failed to enable raw mode: {e}")))?;
        self.raw_mode_enabled = true;

        self.writer
            .flush()
            .map_err(|e| Error::terminal(format!("failed to flush: {e}")))?;
        Ok(())
    }

    fn deinit(&mut self) {
        let _ = execute!(self.writer, cursor::Show);
        if self.raw_mode_enabled {
            let _ = terminal::disable_raw_mode();
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            let _ = execute!(self.writer, terminal::LeaveAlternateScreen);
            self.alternate_screen_enabled = false;
        }
        let _ = self.writer.flush();
    }

    fn poll(&mut self, timeout: Duration) -> Result<bool> {
        event::poll(timeout).map_err(|e| Error::terminal(format!("failed to poll event: {e}")))
    }

    fn read_key(&mut self) -> Result<Option<Key>> {
        match event::read().map_err(|e| Error::terminal(format!("failed to read event: {e}")))? {
            Event::Key(key_event) => {
                if key_event.kind == event::KeyEventKind::Press {
                    Ok(Some(translate_key_event(key_event)))
                } else {
                    Ok(None)
                }
            }
            Event::Resize(cols, rows) => Ok(Some(Key::Resize(cols, rows))),
            _ => Ok(None),
        }
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer
            .write_all(bytes)
            .map_err(|e| Error::terminal(format!("write failed: {e}")))
    }

    fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| Error::terminal(format!("flush failed: {e}")))
    }

    fn get_size(&self) -> Result<Size> {
        let (cols, rows) =
            terminal::size().map_err(|e| Error::terminal(format!("failed to get size: {e}")))?;
        Ok(Size { rows, cols })
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        // Raw mode and the alternate screen must not outlive the editor,
        // panics included
        self.deinit();
    }
}

/// Translate crossterm `KeyEvent` to our Key enum
pub(crate) fn translate_key_event(key_event: KeyEvent) -> Key {
    let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);

    match key_event.code {
        KeyCode::Char(ch) => {
            // Some terminals deliver Enter as a character
            if ch == '\r' || ch == '\n' {
                return Key::Enter;
            }
            if ctrl {
                Key::Ctrl(ch.to_ascii_lowercase() as u8)
            } else {
                Key::Char(ch)
            }
        }
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Tab => Key::Tab,
        KeyCode::Up => Key::ArrowUp,
        KeyCode::Down => Key::ArrowDown,
        KeyCode::Left => Key::ArrowLeft,
        KeyCode::Right => Key::ArrowRight,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Delete => Key::Delete,
        _ => Key::Char('\0'), // Unknown key
    }
}
