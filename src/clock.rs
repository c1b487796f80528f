/// Fixed-timestep bookkeeping for the frame driver.
///
/// Every per-frame constant in `Tuning` assumes a fixed rate.  The clock
/// turns real elapsed time into a whole number of simulation steps so the
/// game runs at the same speed whatever the display refresh rate.

use std::time::Duration;

#[derive(Clone, Debug)]
pub struct FrameClock {
    step: Duration,
    accumulator: Duration,
    /// Upper bound on steps per `advance`, so a long stall does not
    /// trigger a burst of catch-up frames.
    max_steps: u32,
    frames: u64,
}

impl FrameClock {
    pub fn new(frames_per_second: u32, max_steps: u32) -> Self {
        let fps = frames_per_second.max(1);
        Self {
            step: Duration::from_secs(1) / fps,
            accumulator: Duration::ZERO,
            max_steps: max_steps.max(1),
            frames: 0,
        }
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Total steps handed out so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Feed real elapsed time; returns how many simulation steps to run now.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulator += elapsed;
        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_steps {
            self.accumulator -= self.step;
            steps += 1;
        }
        if steps == self.max_steps && self.accumulator >= self.step {
            // Drop the backlog rather than carrying it into later frames.
            self.accumulator = Duration::ZERO;
        }
        self.frames += u64::from(steps);
        steps
    }

    /// Time until the next step is due.
    pub fn until_next_step(&self) -> Duration {
        self.step.saturating_sub(self.accumulator)
    }
}

/// Simulated time represented by `frames` fixed steps.
pub fn frames_to_duration(frames: u64, frames_per_second: u32) -> Duration {
    Duration::from_secs_f64(frames as f64 / f64::from(frames_per_second.max(1)))
}
