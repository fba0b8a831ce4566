//! Notifications printed to the terminal.

use bookshare_cli::output::Status;
use bookshare_locator::notify::{Notification, Notifier};

/// Prints notifications to stderr so stdout stays clean for `--json`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier {
    quiet: bool,
}

impl TerminalNotifier {
    /// Notifier that only prints destructive notifications when `quiet`.
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        let line = format!("{}: {}", notification.title, notification.description);
        if notification.is_destructive() {
            Status::warning(&line);
        } else if !self.quiet {
            Status::notice(&line);
        }
    }
}
