use crossterm::event::KeyCode;
use std::{
    collections::VecDeque,
    sync::{Condvar, Mutex},
    time::Duration,
};

/// A thread-safe buffer of keypresses waiting to be punched onto the tape.
/// Wrap it in an `std::sync::Arc` to share it between the listener and the main loop.
pub struct KeyBuffer {
    buffer: Mutex<VecDeque<KeyCode>>,
    condvar: Condvar,
}

impl KeyBuffer {
    pub fn new() -> KeyBuffer {
        KeyBuffer {
            buffer: Mutex::new(VecDeque::new()),
            condvar: Condvar::new(),
        }
    }

    /// Push a new keypress to the buffer.
    pub fn push(&self, key_code: KeyCode) {
        let mut guard = self.buffer.lock().unwrap();
        guard.push_back(key_code);
        self.condvar.notify_one();
    }

    /// Take every buffered keypress, waiting at most `timeout` for the first one.
    pub fn drain(&self, timeout: Duration) -> Vec<KeyCode> {
        let mut guard = self.buffer.lock().unwrap();
        if guard.is_empty() {
            guard = self.condvar.wait_timeout(guard, timeout).unwrap().0;
        }
        guard.drain(..).collect()
    }
}
