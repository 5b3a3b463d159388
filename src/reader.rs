//! The tape reader as seen by the processor: a device that answers each read
//! request with one pulse, some time later.

pub mod decoder;
pub mod delivery;
pub mod scheduler;
pub mod shutdown;
pub mod tape_buffer;

use crate::config::{ReaderConfig, Speed};
use decoder::{decode, Decoded, Pulse};
use delivery::{Callback, Delivery, TimedDelivery};
use scheduler::{ManualScheduler, Scheduler};
use shutdown::ShutdownController;
use tape_buffer::TapeBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    /// No tape loaded.
    Empty,
    /// Tape loaded, no read in flight.
    Ready,
    /// A pulse is on its way to the processor.
    Busy,
}

/// A read that arrived while no tape was loaded.
struct PendingRead {
    speed: Speed,
    callback: Callback,
}

pub struct Reader<S: Scheduler> {
    tape: TapeBuffer,
    state: ReaderState,
    pending: Option<PendingRead>,
    delivery: TimedDelivery,
    scheduler: S,
    shutdown: ShutdownController,
}

impl Reader<ManualScheduler> {
    /// Create a reader on a virtual clock with default timing.
    pub fn new() -> Reader<ManualScheduler> {
        Reader::with_scheduler(ManualScheduler::new(), ReaderConfig::default())
    }

    /// Advance the virtual clock until nothing is left to deliver.
    /// Returns the number of pulses delivered.
    pub fn run_until_idle(&mut self) -> usize {
        let mut delivered = 0;
        while self.scheduler.advance_to_next() {
            delivered += self.tick();
        }
        delivered
    }
}

impl<S: Scheduler> Reader<S> {
    pub fn with_scheduler(scheduler: S, config: ReaderConfig) -> Reader<S> {
        Reader {
            tape: TapeBuffer::new(),
            state: ReaderState::Empty,
            pending: None,
            delivery: TimedDelivery::new(config),
            scheduler,
            shutdown: ShutdownController::new(),
        }
    }

    pub fn state(&self) -> ReaderState {
        self.state
    }

    pub fn has_pending_read(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_done()
    }

    /// Characters loaded but not yet read.
    pub fn remaining(&self) -> usize {
        self.tape.remaining()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Release `resource` when the reader shuts down.
    pub fn on_shutdown<F: FnOnce() + 'static>(&mut self, resource: F) {
        self.shutdown.attach(resource);
    }

    /// Ask for the next pulse. `callback` is called exactly once, from `tick`.
    ///
    /// If no tape is loaded the request waits until `append` supplies some.
    /// Only one read may be outstanding at a time.
    pub fn read<F>(&mut self, speed: Speed, callback: F)
    where
        F: FnOnce(Pulse) + 'static,
    {
        if self.shutdown.is_done() {
            log::warn!("Ignoring read after shutdown");
            return;
        }

        match self.state {
            ReaderState::Busy => overlapping_read(),
            ReaderState::Empty if self.pending.is_some() => overlapping_read(),
            ReaderState::Empty => {
                log::debug!("No tape loaded, holding {:?} read", speed);
                self.pending = Some(PendingRead {
                    speed,
                    callback: Box::new(callback),
                });
            }
            ReaderState::Ready => self.start(speed, Box::new(callback)),
        }
    }

    /// Load more tape. A held read is resumed at once.
    pub fn append(&mut self, text: &str) {
        if self.shutdown.is_done() {
            log::warn!("Ignoring tape loaded after shutdown");
            return;
        }

        self.tape.append(text);
        log::info!("Loaded {} characters", text.chars().count());

        if self.state == ReaderState::Empty && self.tape.remaining() > 0 {
            match self.pending.take() {
                Some(read) => {
                    log::debug!("Resuming held read");
                    self.start(read.speed, read.callback);
                }
                None => self.set_state(ReaderState::Ready),
            }
        }
    }

    /// Throw away the tape. A pulse already in flight is still delivered.
    pub fn clear(&mut self) {
        self.tape.clear();
        if self.state == ReaderState::Ready {
            self.set_state(ReaderState::Empty);
        }
        log::info!("Tape cleared");
    }

    /// Deliver every pulse whose timer has expired. Returns how many.
    pub fn tick(&mut self) -> usize {
        let mut delivered = 0;
        while let Some(handle) = self.scheduler.next_expired() {
            let delivery = match self.delivery.fire(handle) {
                Some(delivery) => delivery,
                None => {
                    log::trace!("Ignoring stale timer {:?}", handle);
                    continue;
                }
            };

            if delivery.exhausted {
                log::debug!("End of tape after {} reads", delivered + 1);
            }

            // An exhausted tape was already cleared when it was decoded.
            if self.tape.is_empty() {
                self.set_state(ReaderState::Empty);
            } else {
                self.set_state(ReaderState::Ready);
            }

            log::trace!("Pulse {}", delivery.pulse);
            (delivery.callback)(delivery.pulse);
            delivered += 1;
        }
        delivered
    }

    /// Stop the reader for good. Calling it again does nothing.
    pub fn shut_down(&mut self) {
        if self.shutdown.is_done() {
            return;
        }
        self.delivery.cancel(&mut self.scheduler);
        if self.pending.take().is_some() {
            log::debug!("Discarded held read");
        }
        self.shutdown.release();
        log::info!("Reader shut down");
    }

    fn start(&mut self, speed: Speed, callback: Callback) {
        let (decoded, consumed) = decode(self.tape.unread(), 0);
        self.tape.advance(consumed);
        log::trace!("Decoded {:?} at position {}", decoded, self.tape.position());

        let exhausted = decoded == Decoded::Exhausted;
        if exhausted {
            self.tape.clear();
        }

        self.set_state(ReaderState::Busy);
        let delivery = Delivery {
            pulse: decoded.pulse(),
            exhausted,
            callback,
        };
        self.delivery.schedule(&mut self.scheduler, speed, delivery);
    }

    fn set_state(&mut self, state: ReaderState) {
        if self.state != state {
            log::debug!("{:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }
}

impl<S: Scheduler> Drop for Reader<S> {
    fn drop(&mut self) {
        self.shut_down();
    }
}

fn overlapping_read() -> ! {
    log::error!("Read requested while another read is outstanding");
    panic!("overlapping read request");
}
