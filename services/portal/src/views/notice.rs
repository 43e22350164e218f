//! Transient success messages.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    message: String,
    shown_at: Instant,
    duration: Duration,
}

impl Notice {
    pub fn new(message: impl Into<String>, duration: Duration) -> Self {
        Self {
            message: message.into(),
            shown_at: Instant::now(),
            duration,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_visible_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) < self.duration
    }

    pub fn is_visible(&self) -> bool {
        self.is_visible_at(Instant::now())
    }
}
