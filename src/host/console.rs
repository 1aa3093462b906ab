use std::collections::HashMap;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;
use log::{debug, info};
use crate::host::{Panel, PopupMenu, Timer, TimerHandle};

/// Panel printing its label to stdout
pub struct ConsolePanel;

impl Panel for ConsolePanel {
    fn set_label(&self, text: &str) {
        info!("label: {}", text);
        println!("[ {} ]", text);
    }

    fn set_tooltip(&self, text: &str) {
        debug!("tooltip: {}", text);
    }
}

/// Menu printing its items to stdout whenever it is opened
#[derive(Default)]
pub struct ConsoleMenu {
    items: Vec<String>,
    open: bool,
}

impl PopupMenu for ConsoleMenu {
    fn add_text_item(&mut self, text: &str) {
        self.items.push(text.to_string());
    }

    fn remove_all(&mut self) {
        self.items.clear();
    }

    fn toggle(&mut self) {
        self.open = !self.open;
        if self.open {
            for item in &self.items {
                println!("  {}", item);
            }
        }
    }

    fn destroy(&mut self) {
        self.items.clear();
        self.open = false;
    }
}

/// Timer running each schedule on its own thread
///
/// Cancelling drops the channel the thread is waiting on, which ends it.
#[derive(Default)]
pub struct ThreadTimer {
    next_id: u64,
    timers: HashMap<TimerHandle, Sender<()>>,
}

impl Timer for ThreadTimer {
    fn schedule_repeating(&mut self, interval: Duration, mut callback: Box<dyn FnMut() + Send>) -> TimerHandle {
        let (tx, rx) = mpsc::channel::<()>();
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;

        thread::spawn(move || loop {
            match rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => callback(),
                _ => break,
            }
        });

        self.timers.insert(handle, tx);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if self.timers.remove(&handle).is_some() {
            debug!("timer {} cancelled", handle.0);
        }
    }
}
