//! Frame-driven texture animation.
//!
//! The driver is a two-state machine (`Playing`, `Stopped`) fed by an
//! external [`FrameScheduler`]. Each delivered frame advances the clock by a
//! fixed step and slides the two ribbon textures in opposite directions.
//! Stopping is cooperative: the next delivered frame sees the flag and does
//! not reschedule. At most one frame request is outstanding at a time.

use super::material::MaterialPair;

/// Clock increment per displayed frame.
pub const TIME_STEP: f64 = 0.001;

/// Asks the host to deliver one more frame, typically through
/// `requestAnimationFrame`.
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

/// Monotonic animation clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    time: f64,
    step: f64,
}

impl AnimationState {
    #[must_use]
    pub const fn new(step: f64) -> Self {
        Self { time: 0.0, step }
    }

    #[must_use]
    pub const fn time(&self) -> f64 {
        self.time
    }

    #[must_use]
    pub const fn step(&self) -> f64 {
        self.step
    }

    /// Adds one step and returns the new time.
    pub fn advance(&mut self) -> f64 {
        self.time += self.step;
        self.time
    }
}

impl Default for AnimationState {
    fn default() -> Self {
        Self::new(TIME_STEP)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Playing,
    Stopped,
}

#[derive(Debug)]
pub struct AnimationDriver<S> {
    state: AnimationState,
    play_state: PlayState,
    pending: bool,
    scheduler: S,
}

impl<S: FrameScheduler> AnimationDriver<S> {
    /// Creates a playing driver. No frame is requested until [`start`].
    ///
    /// [`start`]: AnimationDriver::start
    pub fn new(scheduler: S, step: f64) -> Self {
        Self {
            state: AnimationState::new(step),
            play_state: PlayState::Playing,
            pending: false,
            scheduler,
        }
    }

    /// Requests the first frame if playing and nothing is pending.
    pub fn start(&mut self) {
        if self.play_state == PlayState::Playing {
            self.schedule();
        }
    }

    /// Handles one delivered frame.
    ///
    /// Returns `true` if the clock advanced and the materials were updated;
    /// the caller should render in that case.
    pub fn on_frame(&mut self, materials: &mut MaterialPair) -> bool {
        self.pending = false;
        if self.play_state == PlayState::Stopped {
            return false;
        }

        let time = self.state.advance();
        materials.apply_time(time);
        self.schedule();
        true
    }

    pub fn stop(&mut self) {
        if self.play_state == PlayState::Playing {
            log::debug!("animation stopped at t={}", self.state.time());
        }
        self.play_state = PlayState::Stopped;
    }

    /// Resumes from the current time. A no-op while already playing.
    pub fn play(&mut self) {
        if self.play_state == PlayState::Stopped {
            self.play_state = PlayState::Playing;
            log::debug!("animation resumed at t={}", self.state.time());
            self.schedule();
        }
    }

    fn schedule(&mut self) {
        if !self.pending {
            self.pending = true;
            self.scheduler.request_frame();
        }
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.play_state == PlayState::Playing
    }

    #[must_use]
    pub const fn play_state(&self) -> PlayState {
        self.play_state
    }

    /// Whether a requested frame has not been delivered yet.
    #[must_use]
    pub const fn has_pending_frame(&self) -> bool {
        self.pending
    }

    #[must_use]
    pub const fn time(&self) -> f64 {
        self.state.time()
    }

    #[must_use]
    pub const fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::material::NamedTextures;

    #[derive(Debug, Default)]
    struct CountingScheduler {
        requests: usize,
    }

    impl FrameScheduler for CountingScheduler {
        fn request_frame(&mut self) {
            self.requests += 1;
        }
    }

    fn materials() -> MaterialPair {
        MaterialPair::load(&NamedTextures::default(), 0.5).unwrap()
    }

    fn expected_time(ticks: usize) -> f64 {
        let mut time = 0.0;
        for _ in 0..ticks {
            time += TIME_STEP;
        }
        time
    }

    #[test]
    fn offsets_track_time_after_ticks() {
        let mut driver = AnimationDriver::new(CountingScheduler::default(), TIME_STEP);
        let mut pair = materials();
        driver.start();
        for _ in 0..250 {
            assert!(driver.on_frame(&mut pair));
        }
        let time = expected_time(250);
        assert_eq!(driver.time(), time);
        assert_eq!(pair.offsets(), [time, -time]);
        assert!((time - 0.25).abs() < 1e-12);
        assert_eq!(driver.scheduler().requests, 251);
    }

    #[test]
    fn first_tick_overwrites_offset_bias() {
        let mut driver = AnimationDriver::new(CountingScheduler::default(), TIME_STEP);
        let mut pair = materials();
        assert_eq!(pair.offsets(), [0.5, 0.5]);
        driver.on_frame(&mut pair);
        assert_eq!(pair.offsets(), [0.001, -0.001]);
    }

    #[test]
    fn stopped_driver_ignores_frames() {
        let mut driver = AnimationDriver::new(CountingScheduler::default(), TIME_STEP);
        let mut pair = materials();
        driver.start();
        driver.on_frame(&mut pair);
        driver.stop();

        assert!(!driver.on_frame(&mut pair));
        assert_eq!(driver.time(), TIME_STEP);
        assert!(!driver.has_pending_frame());
        assert_eq!(driver.scheduler().requests, 2);
    }

    #[test]
    fn play_resumes_without_double_scheduling() {
        let mut driver = AnimationDriver::new(CountingScheduler::default(), TIME_STEP);
        let mut pair = materials();
        driver.start();
        driver.on_frame(&mut pair);

        // Still playing: no extra request.
        driver.play();
        assert_eq!(driver.scheduler().requests, 2);

        // Stop and resume before the pending frame arrives.
        driver.stop();
        driver.play();
        assert_eq!(driver.scheduler().requests, 2);
        assert!(driver.is_playing());

        driver.on_frame(&mut pair);
        assert_eq!(driver.time(), expected_time(2));
        assert_eq!(driver.scheduler().requests, 3);
    }

    #[test]
    fn play_after_drained_stop_requests_one_frame() {
        let mut driver = AnimationDriver::new(CountingScheduler::default(), TIME_STEP);
        let mut pair = materials();
        driver.start();
        driver.stop();
        driver.on_frame(&mut pair);
        assert_eq!(driver.play_state(), PlayState::Stopped);

        driver.play();
        driver.play();
        assert_eq!(driver.scheduler().requests, 2);
        assert!(driver.has_pending_frame());
        assert_eq!(driver.time(), 0.0);
    }
}
