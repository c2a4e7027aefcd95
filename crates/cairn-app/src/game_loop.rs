//! Fixed-timestep frame loop.
//!
//! Simulation steps run at a fixed 60 Hz out of an accumulator. The caller
//! draws once per display frame after [`GameLoop::advance`] returns, so every
//! step due that frame has already run: physics always precedes the draw.

use std::time::{Duration, Instant};

/// Fixed simulation timestep: 60 Hz.
pub const FIXED_DT: f64 = 1.0 / 60.0;

/// Longest frame time fed to the accumulator. Slower frames run in slow
/// motion instead of piling up catch-up steps.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// What one display frame did.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Fixed steps run this frame.
    pub steps: u32,
    /// Fraction of a step left in the accumulator, in `[0, 1)`.
    pub alpha: f64,
    /// The frame time was longer than [`MAX_FRAME_TIME`] and got cut.
    pub clamped: bool,
}

/// Accumulator state of the loop.
///
/// [`tick`](Self::tick) measures wall-clock time; [`advance`](Self::advance)
/// takes an explicit frame time for headless runs and tests.
#[derive(Debug)]
pub struct GameLoop {
    last_tick: Instant,
    pending: f64,
    sim_time: f64,
    frames: u64,
    steps: u64,
}

impl GameLoop {
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
            pending: 0.0,
            sim_time: 0.0,
            frames: 0,
            steps: 0,
        }
    }

    /// Run the steps due since the previous tick by the wall clock.
    pub fn tick(&mut self, step: impl FnMut(f64)) -> FrameReport {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_tick).as_secs_f64();
        self.last_tick = now;
        self.advance(frame_time, step)
    }

    /// Run the steps due in a display frame that took `frame_time` seconds.
    /// `step` receives [`FIXED_DT`] each time.
    pub fn advance(&mut self, frame_time: f64, mut step: impl FnMut(f64)) -> FrameReport {
        let mut report = FrameReport::default();
        let mut frame_time = frame_time.max(0.0);
        if frame_time > MAX_FRAME_TIME {
            tracing::warn!(
                frame_ms = frame_time * 1000.0,
                max_ms = MAX_FRAME_TIME * 1000.0,
                "Long frame, clamping"
            );
            frame_time = MAX_FRAME_TIME;
            report.clamped = true;
        }

        self.pending += frame_time;
        while self.pending >= FIXED_DT {
            step(FIXED_DT);
            self.pending -= FIXED_DT;
            self.sim_time += FIXED_DT;
            self.steps += 1;
            report.steps += 1;
        }

        self.frames += 1;
        report.alpha = self.alpha();
        report
    }

    /// Interpolation factor between the last two simulated states.
    pub fn alpha(&self) -> f64 {
        (self.pending / FIXED_DT).max(0.0)
    }

    /// Display frames so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Fixed steps so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Simulated time in seconds.
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_secs_f64(self.sim_time)
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}
