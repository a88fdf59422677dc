//! Amount input handling
//!
//! Validates draft amount text, normalizes committed values, and debounces
//! propagation of accepted edits.

use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Keystroke filter: digits with at most one decimal point. Intermediate
/// drafts like "", "12." and ".5" pass so typing is never interrupted.
static AMOUNT_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d*\.?\d*$").unwrap());

/// Quiet period between the last accepted keystroke and propagation
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(500);

/// Whether an edited draft may replace the current amount text
pub fn accepts_amount(text: &str) -> bool {
    AMOUNT_PATTERN.is_match(text)
}

/// Normalize a committed draft to two decimal places.
///
/// Drafts that do not parse as a finite number ("", ".") return `None`
/// and the field keeps its typed text.
pub fn format_on_commit(text: &str) -> Option<String> {
    let value: f64 = text.parse().ok().filter(|v: &f64| v.is_finite())?;
    Some(format!("{:.2}", (value * 100.0).round() / 100.0))
}

/// Debounce timer for propagating amount edits.
///
/// Arming replaces any pending timer, so only the last edit in a burst
/// fires. Cancelling discards the pending edit entirely.
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Start (or restart) the timer; `message` is sent on `tx` once the
    /// delay elapses without another arm or cancel
    pub fn arm<T: Send + 'static>(&mut self, tx: &mpsc::Sender<T>, message: T) {
        self.cancel();
        let tx = tx.clone();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(message).await;
        }));
    }

    /// Discard the pending timer, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
