//! Status messages
//!
//! One transient message at a time, shown in the message bar until it
//! expires. Expiry is polled by the event loop so a timeout tick can
//! trigger the redraw that clears the bar.

use crate::constants::ui::MESSAGE_TIMEOUT_MS;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Message {
    pub text: String,
    timestamp: Instant,
}

impl Message {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timestamp: Instant::now(),
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.timestamp) > Duration::from_millis(MESSAGE_TIMEOUT_MS)
    }
}

/// Holder for the current transient message
#[derive(Default)]
pub struct MessageBar {
    message: Option<Message>,
}

impl MessageBar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current message and restart its timer
    pub fn set(&mut self, text: impl Into<String>) {
        self.message = Some(Message::new(text));
    }

    /// The message to display, if it has not expired yet
    pub fn current(&self) -> Option<&str> {
        self.message
            .as_ref()
            .filter(|m| !m.is_expired(Instant::now()))
            .map(|m| m.text.as_str())
    }

    /// Drop the message if its timer ran out. Returns true when this call
    /// cleared it, which is the signal to redraw the bar.
    pub fn prune_expired(&mut self) -> bool {
        if self
            .message
            .as_ref()
            .is_some_and(|m| m.is_expired(Instant::now()))
        {
            self.message = None;
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.message = None;
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
