//! Toast notifications
//!
//! Views and the HTTP client report outcomes through a [`Notifier`]. The
//! terminal front end collects them in a [`MemoryNotifier`] and prints them
//! after each command; services without a display log them.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::Serialize;

/// Toast colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Info,
    Error,
}

/// A toast
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub level: Level,
    /// Milliseconds before the toast closes on its own
    pub auto_close_ms: Option<u64>,
}

impl Notification {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            level: Level::Success,
            auto_close_ms: None,
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            level: Level::Error,
            auto_close_ms: None,
        }
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            level: Level::Info,
            auto_close_ms: None,
        }
    }

    pub fn auto_close(mut self, ms: u64) -> Self {
        self.auto_close_ms = Some(ms);
        self
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

/// Sink for toasts
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Logs toasts as structured events
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, n: Notification) {
        match n.level {
            Level::Error => tracing::warn!(title = %n.title, "{}", n.message),
            Level::Success | Level::Info => tracing::info!(title = %n.title, "{}", n.message),
        }
    }
}

/// Keeps toasts in memory until drained
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    shown: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toasts shown so far
    pub fn snapshot(&self) -> Vec<Notification> {
        self.shown.lock().map(|v| v.clone()).unwrap_or_default()
    }

    /// Remove and return everything shown so far
    pub fn drain(&self) -> Vec<Notification> {
        self.shown
            .lock()
            .map(|mut v| std::mem::take(&mut *v))
            .unwrap_or_default()
    }

    pub fn count_titled(&self, title: &str) -> usize {
        self.snapshot().iter().filter(|n| n.title == title).count()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: Notification) {
        tracing::debug!(title = %notification.title, "toast");
        if let Ok(mut shown) = self.shown.lock() {
            shown.push(notification);
        }
    }
}

/// Rate limit for "Unauthorized" toasts: at most one per cooldown window,
/// however many requests fail inside it.
#[derive(Debug)]
pub struct UnauthorizedThrottle {
    cooldown: Duration,
    last_shown: Mutex<Option<Instant>>,
}

impl UnauthorizedThrottle {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_shown: Mutex::new(None),
        }
    }

    pub fn should_show(&self) -> bool {
        self.should_show_at(Instant::now())
    }

    /// Decide at `now`; a `true` answer starts a new window
    pub fn should_show_at(&self, now: Instant) -> bool {
        let Ok(mut last) = self.last_shown.lock() else {
            return false;
        };
        match *last {
            Some(prev) if now.saturating_duration_since(prev) <= self.cooldown => false,
            _ => {
                *last = Some(now);
                true
            }
        }
    }
}

impl Default for UnauthorizedThrottle {
    fn default() -> Self {
        Self::new(Duration::from_millis(5000))
    }
}
