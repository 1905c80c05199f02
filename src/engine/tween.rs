// Time-based tween driver
//
// Drives a progress callback with a value rising from 0.0 to 1.0 over a fixed
// duration, one invocation per clock tick. Progress comes from elapsed clock
// time, so uneven tick intervals do not skew the timeline.

use super::clock::{SubscriptionId, TickControl, TickSource};
use std::rc::Rc;
use std::time::Duration;

/// Tween construction errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TweenError {
    #[error("Tween duration must be positive, got {millis} ms")]
    NonPositiveDuration { millis: i64 },
}

/// Normalized progress for `elapsed` time into a timeline of `duration`
pub fn progress_at(elapsed: Duration, duration: Duration) -> f32 {
    (elapsed.as_secs_f64() / duration.as_secs_f64()).min(1.0) as f32
}

/// A restartable, duration-bounded timeline
///
/// At most one timeline is live per tween: `play()` deregisters the previous
/// subscription before registering the next one.
pub struct TimeBasedTween {
    /// Length of one timeline
    duration: Duration,
    /// Clock providing the ticks
    clock: Box<dyn TickSource>,
    /// Progress callback shared with the live subscription
    on_progress: Rc<dyn Fn(f32)>,
    /// Subscription of the current timeline, if any
    subscription: Option<SubscriptionId>,
    /// Number of times `play()` was called
    generation: u64,
}

impl TimeBasedTween {
    /// Create a new tween. Zero duration is rejected.
    pub fn new(
        duration: Duration,
        clock: impl TickSource + 'static,
        on_progress: impl Fn(f32) + 'static,
    ) -> Result<Self, TweenError> {
        if duration.is_zero() {
            return Err(TweenError::NonPositiveDuration { millis: 0 });
        }

        Ok(Self {
            duration,
            clock: Box::new(clock),
            on_progress: Rc::new(on_progress),
            subscription: None,
            generation: 0,
        })
    }

    /// Create a tween from a signed millisecond count
    pub fn from_millis(
        millis: i64,
        clock: impl TickSource + 'static,
        on_progress: impl Fn(f32) + 'static,
    ) -> Result<Self, TweenError> {
        if millis <= 0 {
            return Err(TweenError::NonPositiveDuration { millis });
        }
        Self::new(Duration::from_millis(millis as u64), clock, on_progress)
    }

    /// Start the timeline from the clock's current time, superseding any
    /// timeline still in flight
    pub fn play(&mut self) {
        if let Some(previous) = self.subscription.take() {
            if self.clock.deregister(previous) {
                log::trace!("Tween generation {} superseded", self.generation);
            }
        }

        let start = self.clock.now();
        let duration = self.duration;
        let on_progress = Rc::clone(&self.on_progress);

        let id = self.clock.register(Box::new(move |now: Duration| {
            let progress = progress_at(now.saturating_sub(start), duration);
            on_progress(progress);
            if progress >= 1.0 {
                TickControl::Finished
            } else {
                TickControl::Continue
            }
        }));

        self.subscription = Some(id);
        self.generation += 1;
    }

    /// Check whether a timeline is still being driven
    pub fn is_active(&self) -> bool {
        self.subscription
            .is_some_and(|id| self.clock.is_registered(id))
    }

    /// Get the timeline duration
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Drop for TimeBasedTween {
    fn drop(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.clock.deregister(id);
        }
    }
}

impl std::fmt::Debug for TimeBasedTween {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeBasedTween")
            .field("duration", &self.duration)
            .field("subscription", &self.subscription)
            .field("generation", &self.generation)
            .finish()
    }
}
