// User-outcome notifications

use colored::Colorize;

/// Visual flavor of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyKind {
    Success,
    Destructive,
}

/// Fire-and-forget outcome reporting. How (or whether) the message reaches
/// the user is the implementation's business; the store never consumes a
/// return value.
pub trait Notifier {
    fn notify(&self, kind: NotifyKind, title: &str, description: &str);
}

/// Prints notifications to the terminal.
pub struct TermNotifier;

impl Notifier for TermNotifier {
    fn notify(&self, kind: NotifyKind, title: &str, description: &str) {
        let title = match kind {
            NotifyKind::Success => title.green().bold(),
            NotifyKind::Destructive => title.red().bold(),
        };
        println!("{}: {}", title, description);
    }
}

/// Swallows notifications. For tests and headless embedding.
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, _kind: NotifyKind, _title: &str, _description: &str) {}
}
