//! Frame loop driver
//!
//! Owns the pending frame handle and the frame clock so that pause, resume
//! and teardown are plain method calls. The host supplies a [`FrameScheduler`]
//! (`requestAnimationFrame` in the browser).

use crate::sim::frame_dt;

/// Schedules one callback on the next display refresh
pub trait FrameScheduler {
    type Handle;

    /// Queue the next frame callback
    fn schedule(&mut self) -> Self::Handle;

    /// Cancel a queued frame. Cancelling an already fired frame must be harmless.
    fn cancel(&mut self, handle: Self::Handle);
}

/// Whether the loop advances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    #[default]
    Running,
    Paused,
}

/// Tracks the previous frame timestamp (milliseconds)
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    /// Start measuring from `now`
    pub fn reset(&mut self, now: f64) {
        self.last = Some(now);
    }

    /// Normalized delta since the previous tick (or since `reset`).
    /// The very first tick without a baseline yields zero.
    pub fn tick(&mut self, timestamp: f64) -> f32 {
        let delta = self.last.map_or(0.0, |last| timestamp - last);
        self.last = Some(timestamp);
        frame_dt(delta)
    }
}

/// Running/Paused frame loop with at most one pending frame
pub struct AnimationDriver<S: FrameScheduler> {
    scheduler: S,
    pending: Option<S::Handle>,
    state: LoopState,
    clock: FrameClock,
    torn_down: bool,
}

impl<S: FrameScheduler> AnimationDriver<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            pending: None,
            state: LoopState::Running,
            clock: FrameClock::default(),
            torn_down: false,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running && !self.torn_down
    }

    pub fn has_pending_frame(&self) -> bool {
        self.pending.is_some()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Begin the loop from timestamp `now`
    pub fn start(&mut self, now: f64) {
        self.clock.reset(now);
        self.request_frame();
    }

    /// Handle a fired frame callback.
    ///
    /// Runs `f` with the normalized delta and then queues the next frame.
    /// Returns false when the frame was skipped (paused or torn down).
    pub fn frame(&mut self, timestamp: f64, f: impl FnOnce(f32)) -> bool {
        // The handle that fired is spent
        self.pending = None;
        if !self.is_running() {
            return false;
        }

        let dt = self.clock.tick(timestamp);
        f(dt);
        self.request_frame();
        true
    }

    /// Stop advancing and drop the queued frame
    pub fn pause(&mut self) {
        if self.state == LoopState::Paused {
            return;
        }
        self.state = LoopState::Paused;
        self.cancel_pending();
        log::info!("Animation paused");
    }

    /// Re-enter the loop with a fresh timestamp baseline
    pub fn resume(&mut self, now: f64) {
        if self.torn_down || self.state == LoopState::Running {
            return;
        }
        self.state = LoopState::Running;
        self.clock.reset(now);
        self.request_frame();
        log::info!("Animation resumed");
    }

    /// Flip between running and paused. Returns true if now running.
    pub fn toggle(&mut self, now: f64) -> bool {
        if self.torn_down {
            return false;
        }
        match self.state {
            LoopState::Running => self.pause(),
            LoopState::Paused => self.resume(now),
        }
        self.is_running()
    }

    /// Cancel any queued frame and refuse further scheduling. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        self.cancel_pending();
        self.torn_down = true;
    }

    fn request_frame(&mut self) {
        if self.pending.is_none() && self.is_running() {
            self.pending = Some(self.scheduler.schedule());
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records schedule/cancel calls instead of touching a display
    #[derive(Default)]
    struct ManualScheduler {
        next: u32,
        queued: Vec<u32>,
        cancelled: Vec<u32>,
    }

    impl FrameScheduler for ManualScheduler {
        type Handle = u32;

        fn schedule(&mut self) -> u32 {
            self.next += 1;
            self.queued.push(self.next);
            self.next
        }

        fn cancel(&mut self, handle: u32) {
            self.queued.retain(|h| *h != handle);
            self.cancelled.push(handle);
        }
    }

    fn running_driver() -> AnimationDriver<ManualScheduler> {
        let mut driver = AnimationDriver::new(ManualScheduler::default());
        driver.start(1000.0);
        driver
    }

    #[test]
    fn test_start_schedules_one_frame() {
        let driver = running_driver();
        assert!(driver.is_running());
        assert!(driver.has_pending_frame());
        assert_eq!(driver.scheduler().queued.len(), 1);
    }

    #[test]
    fn test_frame_runs_then_reschedules() {
        let mut driver = running_driver();
        let mut seen = None;
        let ran = driver.frame(1016.6667, |dt| seen = Some(dt));
        assert!(ran);
        let dt = seen.unwrap_or_default();
        assert!((dt - 1.0).abs() < 1e-4);
        assert!(driver.has_pending_frame());
        assert_eq!(driver.scheduler().next, 2);
    }

    #[test]
    fn test_stall_is_capped() {
        let mut driver = running_driver();
        let mut seen = 0.0;
        driver.frame(6000.0, |dt| seen = dt);
        assert_eq!(seen, frame_dt(32.0));
    }

    #[test]
    fn test_pause_cancels_and_skips() {
        let mut driver = running_driver();
        driver.pause();
        assert_eq!(driver.state(), LoopState::Paused);
        assert!(!driver.has_pending_frame());
        assert_eq!(driver.scheduler().cancelled, vec![1]);

        // A callback that was already in flight does nothing
        let mut called = false;
        assert!(!driver.frame(1016.0, |_| called = true));
        assert!(!called);
        assert!(!driver.has_pending_frame());
    }

    #[test]
    fn test_resume_uses_fresh_baseline() {
        let mut driver = running_driver();
        driver.frame(1016.0, |_| {});
        driver.pause();

        // Long pause; resume samples a new timestamp
        driver.resume(60_000.0);
        assert!(driver.has_pending_frame());

        let mut seen = f32::MAX;
        driver.frame(60_008.0, |dt| seen = dt);
        assert!((seen - frame_dt(8.0)).abs() < 1e-6);
    }

    #[test]
    fn test_toggle() {
        let mut driver = running_driver();
        assert!(!driver.toggle(2000.0));
        assert!(driver.toggle(3000.0));
        assert_eq!(driver.scheduler().queued.len(), 1);
    }

    #[test]
    fn test_never_more_than_one_pending() {
        let mut driver = running_driver();
        driver.resume(1200.0);
        driver.start(1300.0);
        assert_eq!(driver.scheduler().queued.len(), 1);
    }

    #[test]
    fn test_teardown_idempotent() {
        let mut driver = running_driver();
        driver.teardown();
        driver.teardown();
        assert!(!driver.has_pending_frame());
        assert_eq!(driver.scheduler().cancelled, vec![1]);
        assert!(driver.scheduler().queued.is_empty());

        // Nothing restarts after teardown
        driver.resume(5000.0);
        assert!(!driver.frame(5016.0, |_| {}));
        assert!(driver.scheduler().queued.is_empty());
    }

    #[test]
    fn test_toggle_after_teardown_is_inert() {
        let mut driver = running_driver();
        driver.teardown();
        assert!(!driver.toggle(10.0));
        assert_eq!(driver.state(), LoopState::Running);
        assert!(!driver.toggle(20.0));
        assert!(driver.scheduler().queued.is_empty());
    }

    #[test]
    fn test_teardown_without_pending_frame() {
        let mut driver = running_driver();
        driver.pause();
        driver.teardown();
        assert_eq!(driver.scheduler().cancelled, vec![1]);
    }

    #[test]
    fn test_clock_without_baseline() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.tick(500.0), 0.0);
        assert!(clock.tick(516.6667) > 0.99);
    }
}
