// Frame clock and periodic tick subscriptions
//
// The clock is advanced once per host frame. Every registered callback is
// invoked with the clock's current time on each advance, until it reports
// that it has finished or it is deregistered. All dispatch happens on the
// thread that owns the clock.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Frame deltas larger than this are logged as a stall
const LONG_FRAME: Duration = Duration::from_millis(250);

/// Identifies one registration on a tick source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Returned by a tick callback to keep or drop its subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Finished,
}

/// Callback invoked once per tick with the clock time
pub type TickCallback = Box<dyn FnMut(Duration) -> TickControl>;

/// Anything that can drive periodic callbacks
pub trait TickSource {
    /// Current clock time, measured from the clock's start
    fn now(&self) -> Duration;

    /// Register a callback, invoked from the next tick onward
    fn register(&self, callback: TickCallback) -> SubscriptionId;

    /// Remove a registration. Returns false if it was already gone.
    fn deregister(&self, id: SubscriptionId) -> bool;

    /// Check whether a registration is still live
    fn is_registered(&self, id: SubscriptionId) -> bool;
}

struct Subscriber {
    id: SubscriptionId,
    callback: Rc<RefCell<TickCallback>>,
}

struct ClockState {
    /// Accumulated clock time
    now: Duration,

    /// Next subscription id to hand out
    next_id: u64,

    /// Live subscriptions in registration order
    subscribers: Vec<Subscriber>,

    /// Wall time of the last `begin_frame`
    last_frame_time: Option<Instant>,

    /// Number of ticks dispatched
    frame_count: u64,
}

/// Host-loop clock, cloned as a cheap shared handle
#[derive(Clone)]
pub struct FrameClock {
    inner: Rc<RefCell<ClockState>>,
}

impl FrameClock {
    /// Create a new clock at time zero
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ClockState {
                now: Duration::ZERO,
                next_id: 0,
                subscribers: Vec::new(),
                last_frame_time: None,
                frame_count: 0,
            })),
        }
    }

    /// Advance by the wall time elapsed since the previous frame and tick.
    /// The first call only records the start instant.
    pub fn begin_frame(&self) -> usize {
        let now = Instant::now();
        let last = self.inner.borrow_mut().last_frame_time.replace(now);

        let frame_time = match last {
            Some(last) => now.duration_since(last),
            None => Duration::ZERO,
        };

        if frame_time > LONG_FRAME {
            log::debug!("Long frame of {:?}", frame_time);
        }

        self.advance(frame_time)
    }

    /// Advance the clock by `dt` and dispatch one tick.
    /// Returns the number of callbacks invoked.
    pub fn advance(&self, dt: Duration) -> usize {
        // Snapshot so callbacks can register/deregister without a borrow conflict
        let (now, snapshot) = {
            let mut state = self.inner.borrow_mut();
            state.now += dt;
            state.frame_count += 1;
            let snapshot: Vec<(SubscriptionId, Rc<RefCell<TickCallback>>)> = state
                .subscribers
                .iter()
                .map(|s| (s.id, Rc::clone(&s.callback)))
                .collect();
            (state.now, snapshot)
        };

        let mut invoked = 0;
        for (id, callback) in snapshot {
            // Superseded earlier in this same tick
            if !self.is_registered(id) {
                continue;
            }

            let control = {
                let mut callback = callback.borrow_mut();
                (*callback)(now)
            };
            invoked += 1;

            if control == TickControl::Finished {
                self.deregister(id);
            }
        }

        invoked
    }

    /// Get the number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Get total number of ticks dispatched
    pub fn frame_count(&self) -> u64 {
        self.inner.borrow().frame_count
    }
}

impl TickSource for FrameClock {
    fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    fn register(&self, callback: TickCallback) -> SubscriptionId {
        let mut state = self.inner.borrow_mut();
        let id = SubscriptionId(state.next_id);
        state.next_id += 1;
        state.subscribers.push(Subscriber {
            id,
            callback: Rc::new(RefCell::new(callback)),
        });
        id
    }

    fn deregister(&self, id: SubscriptionId) -> bool {
        let mut state = self.inner.borrow_mut();
        let before = state.subscribers.len();
        state.subscribers.retain(|s| s.id != id);
        state.subscribers.len() != before
    }

    fn is_registered(&self, id: SubscriptionId) -> bool {
        self.inner.borrow().subscribers.iter().any(|s| s.id == id)
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
