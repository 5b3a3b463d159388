//! Timer services the reader uses to deliver pulses later.

use std::time::{Duration, Instant};

/// Identifies one armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeliveryHandle(u64);

impl DeliveryHandle {
    pub fn from_raw(id: u64) -> DeliveryHandle {
        DeliveryHandle(id)
    }
}

/// Something that can tell the reader when a delay has passed.
pub trait Scheduler {
    /// Arm a timer that expires `delay` from now.
    fn schedule(&mut self, delay: Duration) -> DeliveryHandle;

    /// Disarm a timer. Unknown or expired handles are ignored.
    fn cancel(&mut self, handle: DeliveryHandle);

    /// Remove and return the earliest timer that has expired.
    fn next_expired(&mut self) -> Option<DeliveryHandle>;
}

/// Armed timers ordered by deadline, then by arming order.
#[derive(Debug)]
struct Timers<T> {
    next_id: u64,
    armed: Vec<(T, DeliveryHandle)>,
}

impl<T: Ord + Copy> Timers<T> {
    fn new() -> Self {
        Timers {
            next_id: 0,
            armed: Vec::new(),
        }
    }

    fn arm(&mut self, deadline: T) -> DeliveryHandle {
        let handle = DeliveryHandle(self.next_id);
        self.next_id += 1;
        self.armed.push((deadline, handle));
        handle
    }

    fn cancel(&mut self, handle: DeliveryHandle) {
        self.armed.retain(|&(_, h)| h != handle);
    }

    fn take_expired(&mut self, now: T) -> Option<DeliveryHandle> {
        let (index, _) = self
            .armed
            .iter()
            .enumerate()
            .filter(|(_, (deadline, _))| *deadline <= now)
            .min_by_key(|(_, entry)| *entry)?;
        Some(self.armed.remove(index).1)
    }

    fn next_deadline(&self) -> Option<T> {
        self.armed.iter().map(|&(deadline, _)| deadline).min()
    }
}

/// A scheduler whose clock only moves when told to.
///
/// Used to drive the reader deterministically in tests and simulations.
#[derive(Debug)]
pub struct ManualScheduler {
    now: Duration,
    timers: Timers<Duration>,
}

impl ManualScheduler {
    pub fn new() -> ManualScheduler {
        ManualScheduler {
            now: Duration::from_secs(0),
            timers: Timers::new(),
        }
    }

    /// Time elapsed since creation.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    /// Jump straight to the next deadline, if one is armed.
    pub fn advance_to_next(&mut self) -> bool {
        match self.timers.next_deadline() {
            Some(deadline) => {
                self.now = self.now.max(deadline);
                true
            }
            None => false,
        }
    }

    pub fn armed(&self) -> usize {
        self.timers.armed.len()
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration) -> DeliveryHandle {
        self.timers.arm(self.now + delay)
    }

    fn cancel(&mut self, handle: DeliveryHandle) {
        self.timers.cancel(handle);
    }

    fn next_expired(&mut self) -> Option<DeliveryHandle> {
        self.timers.take_expired(self.now)
    }
}

/// A scheduler following the wall clock.
#[derive(Debug)]
pub struct RealTimeScheduler {
    timers: Timers<Instant>,
}

impl RealTimeScheduler {
    pub fn new() -> RealTimeScheduler {
        RealTimeScheduler {
            timers: Timers::new(),
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Sleep until the next deadline, but no longer than `limit`.
    pub fn wait(&self, limit: Duration) {
        let now = Instant::now();
        let until = match self.next_deadline() {
            Some(deadline) => deadline.saturating_duration_since(now).min(limit),
            None => limit,
        };
        std::thread::sleep(until);
    }
}

impl Default for RealTimeScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for RealTimeScheduler {
    fn schedule(&mut self, delay: Duration) -> DeliveryHandle {
        self.timers.arm(Instant::now() + delay)
    }

    fn cancel(&mut self, handle: DeliveryHandle) {
        self.timers.cancel(handle);
    }

    fn next_expired(&mut self) -> Option<DeliveryHandle> {
        self.timers.take_expired(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn nothing_expires_before_its_deadline() {
        let mut scheduler = ManualScheduler::new();
        let handle = scheduler.schedule(10 * MS);
        scheduler.advance(9 * MS);
        assert_eq!(scheduler.next_expired(), None);
        scheduler.advance(MS);
        assert_eq!(scheduler.next_expired(), Some(handle));
        assert_eq!(scheduler.next_expired(), None);
    }

    #[test]
    fn earliest_deadline_expires_first() {
        let mut scheduler = ManualScheduler::new();
        let slow = scheduler.schedule(100 * MS);
        let fast = scheduler.schedule(2 * MS);
        scheduler.advance(100 * MS);
        assert_eq!(scheduler.next_expired(), Some(fast));
        assert_eq!(scheduler.next_expired(), Some(slow));
    }

    #[test]
    fn cancelled_timer_never_expires() {
        let mut scheduler = ManualScheduler::new();
        let handle = scheduler.schedule(MS);
        scheduler.cancel(handle);
        scheduler.cancel(handle);
        scheduler.advance(10 * MS);
        assert_eq!(scheduler.next_expired(), None);
        assert_eq!(scheduler.armed(), 0);
    }

    #[test]
    fn advance_to_next_reaches_deadline() {
        let mut scheduler = ManualScheduler::new();
        assert!(!scheduler.advance_to_next());
        let handle = scheduler.schedule(7 * MS);
        assert!(scheduler.advance_to_next());
        assert_eq!(scheduler.now(), 7 * MS);
        assert_eq!(scheduler.next_expired(), Some(handle));
    }

    #[test]
    fn real_time_timer_expires_after_wait() {
        let mut scheduler = RealTimeScheduler::new();
        let handle = scheduler.schedule(MS);
        scheduler.wait(Duration::from_secs(1));
        assert_eq!(scheduler.next_expired(), Some(handle));
    }
}
