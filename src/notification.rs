//! Toast-style notifications for the presentation layer
//!
//! Notifications are advisory. They never feed back into the engine, they
//! only tell the renderer what to show the player.

use std::time::Duration;

use serde::Serialize;
use serde_with::skip_serializing_none;

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Level {
    /// Neutral information, such as god mode keeping the round alive
    Info,
    /// Good news, such as a correct answer or a lifeline result
    Success,
    /// A rejected action or a lost round
    Error,
}

/// A message to show to the player
#[serde_with::serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Severity of the notification
    pub level: Level,
    /// Text to display
    pub text: String,
    /// How long to display it for (renderer default when absent)
    #[serde_as(as = "Option<serde_with::DurationMilliSeconds<u64>>")]
    pub duration: Option<Duration>,
}

impl Notification {
    fn new(level: Level, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
            duration: None,
        }
    }

    /// Creates an informational notification
    pub fn info(text: impl Into<String>) -> Self {
        Self::new(Level::Info, text)
    }

    /// Creates a success notification
    pub fn success(text: impl Into<String>) -> Self {
        Self::new(Level::Success, text)
    }

    /// Creates an error notification
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(Level::Error, text)
    }

    /// Sets an explicit display duration
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }
}
