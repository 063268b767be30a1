//! Terminal backend abstraction
//! Provides a platform-agnostic interface for terminal operations
//!
//! Terminal handling stays behind this boundary: raw mode is enabled
//! before input processing begins and restored on every exit path, and
//! nothing here depends on editor internals.

use crate::error::Result;
use crate::key::Key;
use std::time::Duration;

/// Terminal size information
#[derive(Debug, Clone, Copy)]
pub struct Size {
    pub rows: u16,
    pub cols: u16,
}

/// Terminal backend trait
pub trait TerminalBackend {
    /// Enter the alternate screen and raw mode
    fn init(&mut self) -> Result<()>;

    /// Restore the terminal to its original state (idempotent)
    fn deinit(&mut self);

    /// Wait up to `timeout` for input. Returns true when a key is ready.
    fn poll(&mut self, timeout: Duration) -> Result<bool>;

    /// Read and decode one input event, if any
    fn read_key(&mut self) -> Result<Option<Key>>;

    /// Queue bytes for output
    fn write(&mut self, bytes: &[u8]) -> Result<()>;

    /// Flush queued output to the terminal
    fn flush(&mut self) -> Result<()>;

    /// Current terminal dimensions
    fn get_size(&self) -> Result<Size>;
}

pub mod crossterm;
