pub mod console;

use std::time::Duration;

/// Handle identifying a scheduled timer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u64);

/// Repeating timer primitive offered by the host
pub trait Timer {
    /// Calls 'callback' every 'interval' until the timer is cancelled
    ///
    /// # Arguments
    ///
    /// * 'interval' - time between calls
    /// * 'callback' - function to call
    fn schedule_repeating(&mut self, interval: Duration, callback: Box<dyn FnMut() + Send>) -> TimerHandle;

    fn cancel(&mut self, handle: TimerHandle);
}

/// Panel surface showing a short label with a tooltip
///
/// Labels may be set from the thread a refresh completes on.
pub trait Panel: Send + Sync {
    fn set_label(&self, text: &str);
    fn set_tooltip(&self, text: &str);
}

/// Popup menu holding non-interactive text items
pub trait PopupMenu {
    fn add_text_item(&mut self, text: &str);
    fn remove_all(&mut self);
    fn toggle(&mut self);
    fn destroy(&mut self);
}
