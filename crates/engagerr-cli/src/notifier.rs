//! Console notification sink.

use crate::output::Formatter;
use engagerr_domain::{Notification, Notifier};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Prints notifications to stderr and counts failures so the process can
/// exit non-zero after a lenient read failed.
#[derive(Debug)]
pub struct ConsoleNotifier {
    formatter: Formatter,
    errors: AtomicUsize,
}

impl ConsoleNotifier {
    /// Create a notifier printing with the given formatter.
    pub fn new(formatter: Formatter) -> Self {
        Self {
            formatter,
            errors: AtomicUsize::new(0),
        }
    }

    /// Number of error notifications printed so far.
    pub fn error_count(&self) -> usize {
        self.errors.load(Ordering::Relaxed)
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        if notification.is_error() {
            self.errors.fetch_add(1, Ordering::Relaxed);
        }
        eprintln!("{}", self.formatter.notification(&notification));
    }
}
