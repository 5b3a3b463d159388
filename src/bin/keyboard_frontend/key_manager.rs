use super::key_buffer::KeyBuffer;
use crossterm::event::{poll, read, Event, KeyCode};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

const LISTEN_INTERVAL: Duration = Duration::from_millis(100);

/// Owns the thread that collects keypresses for the tape.
pub struct KeyManager {
    stop: Arc<Mutex<bool>>,
    key_buffer: Arc<KeyBuffer>,
    event_listener: Option<JoinHandle<()>>,
}

impl KeyManager {
    // Start event listener thread
    pub fn new() -> KeyManager {
        let stop = Arc::new(Mutex::new(false));
        let key_buffer = Arc::new(KeyBuffer::new());
        let event_listener = event_listener(stop.clone(), key_buffer.clone());
        KeyManager {
            stop,
            key_buffer,
            event_listener: Some(event_listener),
        }
    }

    /// Keys pressed since the last call, waiting at most `timeout` for one.
    pub fn keys(&self, timeout: Duration) -> Vec<KeyCode> {
        self.key_buffer.drain(timeout)
    }
}

impl Drop for KeyManager {
    fn drop(&mut self) {
        *self.stop.lock().unwrap() = true;
        if let Some(listener) = self.event_listener.take() {
            if listener.join().is_err() {
                log::error!("Key listener panicked");
            }
        }
    }
}

/// Starts a thread that listens for key events and pushes them to the key buffer.
fn event_listener(stop: Arc<Mutex<bool>>, key_buffer: Arc<KeyBuffer>) -> JoinHandle<()> {
    thread::spawn(move || loop {
        if *stop.lock().unwrap() {
            break;
        }

        // Poll so the stop flag is seen even when nobody types
        match poll(LISTEN_INTERVAL) {
            Ok(false) => continue,
            Ok(true) => {}
            Err(e) => {
                log::error!("Could not poll for events: {}", e);
                break;
            }
        }

        match read() {
            Ok(Event::Key(key_event)) => {
                log::debug!("Got key {:?}", key_event.code);
                key_buffer.push(key_event.code);
            }
            Ok(_) => {}
            Err(e) => {
                log::error!("Could not read event: {}", e);
                break;
            }
        }
    })
}
