use super::decoder::Pulse;
use super::scheduler::{DeliveryHandle, Scheduler};
use crate::config::{ReaderConfig, Speed};

/// The processor's continuation for one read.
pub type Callback = Box<dyn FnOnce(Pulse)>;

/// A pulse waiting for its timer.
pub struct Delivery {
    pub pulse: Pulse,
    /// Set when the pulse reports the end of the tape rather than a line.
    pub exhausted: bool,
    pub callback: Callback,
}

/// Holds at most one delivery until the scheduler says it is due.
pub struct TimedDelivery {
    config: ReaderConfig,
    pending: Option<(DeliveryHandle, Delivery)>,
}

impl TimedDelivery {
    pub fn new(config: ReaderConfig) -> TimedDelivery {
        TimedDelivery {
            config,
            pending: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Arm a timer for `delivery` according to `speed`.
    pub fn schedule<S: Scheduler>(&mut self, scheduler: &mut S, speed: Speed, delivery: Delivery) {
        assert!(
            self.pending.is_none(),
            "a pulse is already waiting to be delivered"
        );
        let delay = self.config.delay(speed);
        let handle = scheduler.schedule(delay);
        log::trace!("Delivering {} in {:?}", delivery.pulse, delay);
        self.pending = Some((handle, delivery));
    }

    /// Take the delivery belonging to an expired timer.
    pub fn fire(&mut self, handle: DeliveryHandle) -> Option<Delivery> {
        match self.pending.take() {
            Some((armed, delivery)) if armed == handle => Some(delivery),
            other => {
                self.pending = other;
                None
            }
        }
    }

    /// Disarm the pending delivery without calling it.
    pub fn cancel<S: Scheduler>(&mut self, scheduler: &mut S) {
        if let Some((handle, delivery)) = self.pending.take() {
            log::debug!("Cancelled delivery of {}", delivery.pulse);
            scheduler.cancel(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::scheduler::ManualScheduler;
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::Duration;

    fn delivery(pulse: Pulse, calls: &Rc<Cell<u32>>) -> Delivery {
        let calls = calls.clone();
        Delivery {
            pulse,
            exhausted: false,
            callback: Box::new(move |_| calls.set(calls.get() + 1)),
        }
    }

    #[test]
    fn fires_only_for_its_own_handle() {
        let mut scheduler = ManualScheduler::new();
        let mut timed = TimedDelivery::new(ReaderConfig::default());
        let calls = Rc::new(Cell::new(0));

        timed.schedule(&mut scheduler, Speed::Optical, delivery(Pulse::Digit(3), &calls));
        assert!(timed.fire(DeliveryHandle::from_raw(99)).is_none());
        assert!(timed.is_pending());

        scheduler.advance(Duration::from_millis(2));
        let handle = scheduler.next_expired().unwrap();
        let fired = timed.fire(handle).unwrap();
        assert_eq!(fired.pulse, Pulse::Digit(3));
        (fired.callback)(fired.pulse);
        assert_eq!(calls.get(), 1);
        assert!(!timed.is_pending());
    }

    #[test]
    fn cancel_disarms_the_timer() {
        let mut scheduler = ManualScheduler::new();
        let mut timed = TimedDelivery::new(ReaderConfig::default());
        let calls = Rc::new(Cell::new(0));

        timed.cancel(&mut scheduler);
        timed.schedule(&mut scheduler, Speed::Mechanical, delivery(Pulse::Finish, &calls));
        timed.cancel(&mut scheduler);
        timed.cancel(&mut scheduler);

        scheduler.advance(Duration::from_secs(1));
        assert_eq!(scheduler.next_expired(), None);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    #[should_panic(expected = "already waiting")]
    fn second_schedule_is_refused() {
        let mut scheduler = ManualScheduler::new();
        let mut timed = TimedDelivery::new(ReaderConfig::default());
        let calls = Rc::new(Cell::new(0));
        timed.schedule(&mut scheduler, Speed::Optical, delivery(Pulse::Digit(1), &calls));
        timed.schedule(&mut scheduler, Speed::Optical, delivery(Pulse::Digit(2), &calls));
    }
}
