//! User-facing notifications.
//!
//! The locator never shows anything itself. It hands [`Notification`]s to a
//! [`Notifier`], which a front end turns into toasts, status lines or logs.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// How prominently a notification should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational
    Info,
    /// Something failed
    Destructive,
}

/// A short message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Headline
    pub title: String,
    /// Supporting sentence
    pub description: String,
    /// Display severity
    pub severity: Severity,
}

impl Notification {
    /// Informational notification.
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Info,
        }
    }

    /// Failure notification.
    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Destructive,
        }
    }

    /// True for failure notifications.
    pub fn is_destructive(&self) -> bool {
        self.severity == Severity::Destructive
    }
}

/// Sink for notifications.
pub trait Notifier: Send + Sync {
    /// Deliver one notification.
    fn notify(&self, notification: Notification);
}

/// Keeps every notification in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    recorded: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything delivered so far, oldest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.recorded
            .lock()
            .map(|n| n.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Titles delivered so far, oldest first.
    pub fn titles(&self) -> Vec<String> {
        self.notifications().into_iter().map(|n| n.title).collect()
    }

    /// Number of notifications with the given title.
    pub fn count_titled(&self, title: &str) -> usize {
        self.notifications().iter().filter(|n| n.title == title).count()
    }

    /// Forget everything recorded.
    pub fn clear(&self) {
        self.recorded
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.recorded
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(notification);
    }
}

/// Writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Info => tracing::info!(
                title = %notification.title,
                "{}", notification.description
            ),
            Severity::Destructive => tracing::warn!(
                title = %notification.title,
                "{}", notification.description
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier_keeps_order() {
        let notifier = RecordingNotifier::new();
        notifier.notify(Notification::info("First", "a"));
        notifier.notify(Notification::destructive("Second", "b"));
        notifier.notify(Notification::info("First", "c"));

        assert_eq!(notifier.titles(), vec!["First", "Second", "First"]);
        assert_eq!(notifier.count_titled("First"), 2);
        assert!(notifier.notifications()[1].is_destructive());

        notifier.clear();
        assert!(notifier.notifications().is_empty());
    }
}
