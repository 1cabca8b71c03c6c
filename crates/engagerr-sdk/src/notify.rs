//! Notification sinks.

use engagerr_domain::{Notification, NotificationLevel, Notifier};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{error, info};

/// Sends notifications to the tracing subscriber
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Error => {
                error!(title = %notification.title, "{}", notification.description)
            }
            NotificationLevel::Success | NotificationLevel::Info => {
                info!(title = %notification.title, "{}", notification.description)
            }
        }
    }
}

/// Keeps notifications in memory, for tests and for frontends that
/// render them after a command finishes
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Notification>> {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Everything received so far
    pub fn notifications(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    /// Error notifications received so far
    pub fn errors(&self) -> Vec<Notification> {
        self.lock().iter().filter(|n| n.is_error()).cloned().collect()
    }

    /// Remove and return everything received so far
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.lock())
    }

    /// Forget everything received so far
    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, notification: Notification) {
        self.lock().push(notification);
    }
}
