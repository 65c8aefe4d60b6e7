//! Transient error message with a fixed display window.
//!
//! The notice stores its expiry instead of scheduling a timer, so a newer
//! error supersedes an older one simply by overwriting it.

use std::time::Duration;

use tokio::time::Instant;

use crate::error::ErrorKind;

/// How long a raised error stays visible unless superseded.
pub const DEFAULT_ERROR_WINDOW: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Default)]
pub struct Notice {
    current: Option<(ErrorKind, Instant)>,
}

impl Notice {
    pub fn raise(&mut self, kind: ErrorKind, now: Instant, window: Duration) {
        self.current = Some((kind, now + window));
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// The visible error at `now`, if its window has not elapsed.
    pub fn visible(&self, now: Instant) -> Option<ErrorKind> {
        match self.current {
            Some((kind, expires_at)) if now < expires_at => Some(kind),
            _ => None,
        }
    }

    pub fn message(&self, now: Instant) -> &'static str {
        self.visible(now).map(ErrorKind::message).unwrap_or("")
    }
}
