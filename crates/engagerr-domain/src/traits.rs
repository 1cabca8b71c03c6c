//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and whatever
//! presents results to a person. Implementations live in other crates.

use std::fmt;

/// Severity of a user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationLevel {
    /// An operation completed
    Success,
    /// Neutral information
    Info,
    /// An operation failed
    Error,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NotificationLevel::Success => "success",
            NotificationLevel::Info => "info",
            NotificationLevel::Error => "error",
        };
        f.write_str(s)
    }
}

/// A toast-style message with a title and a descriptive body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity
    pub level: NotificationLevel,
    /// Short title
    pub title: String,
    /// Descriptive body
    pub description: String,
}

impl Notification {
    /// A success notification
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            title: title.into(),
            description: description.into(),
        }
    }

    /// An informational notification
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            title: title.into(),
            description: description.into(),
        }
    }

    /// An error notification
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Whether this reports a failure
    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

/// Sink for user-facing notifications
///
/// Implemented by the SDK (logging, in-memory) and the CLI (console).
pub trait Notifier: Send + Sync {
    /// Deliver one notification
    fn notify(&self, notification: Notification);
}
