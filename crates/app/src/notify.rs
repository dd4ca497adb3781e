//! User notifications.

use mockall::automock;
use posy::prelude::*;

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    /// Neutral information
    Info,

    /// Something completed
    Success,

    /// Something needs attention
    Warning,

    /// Something failed
    Error,
}

impl ToastLevel {
    fn tag(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "ok",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Shows messages to the user.
#[automock]
pub trait Notifier: Send + Sync {
    /// Show a short message.
    fn toast(&self, level: ToastLevel, message: &str);

    /// Show a blocking summary of stock changes.
    fn stock_summary(&self, report: &StockReport);
}

/// Writes notifications to standard error.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn toast(&self, level: ToastLevel, message: &str) {
        eprintln!("[{}] {message}", level.tag());
    }

    fn stock_summary(&self, report: &StockReport) {
        eprint!("{}", report.summary());
    }
}
