//! Frame pacing: fixed timestep accumulator and FPS counter

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Longest frame delta we honor (seconds); longer stalls are dropped
const MAX_FRAME_DT: f32 = 0.1;

/// Turns variable frame deltas into whole simulation ticks
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    accumulator: f32,
    step: f32,
    max_substeps: u32,
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl FixedTimestep {
    pub fn new(step: f32, max_substeps: u32) -> Self {
        Self {
            accumulator: 0.0,
            step,
            max_substeps,
        }
    }

    /// Add a frame's elapsed time; returns how many ticks to run
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_substeps {
            self.accumulator -= self.step;
            steps += 1;
        }
        steps
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

const FPS_WINDOW: usize = 60;

/// Rolling FPS estimate over the last 60 frames
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    fps: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self {
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            fps: 0,
        }
    }
}

impl FpsCounter {
    /// Record a frame timestamp (milliseconds)
    pub fn record(&mut self, time_ms: f64) {
        self.frame_times[self.frame_index] = time_ms;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;

        // Oldest sample is the next slot to be overwritten
        let oldest = self.frame_times[self.frame_index];
        if oldest > 0.0 {
            let elapsed = time_ms - oldest;
            if elapsed > 0.0 {
                self.fps = ((FPS_WINDOW - 1) as f64 * 1000.0 / elapsed).round() as u32;
            }
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_partial_frames() {
        // Dyadic values keep the float math exact
        let mut clock = FixedTimestep::new(1.0 / 64.0, 4);
        assert_eq!(clock.advance(1.5 / 64.0), 1);
        assert_eq!(clock.advance(0.5 / 64.0), 1);
        assert_eq!(clock.advance(0.5 / 64.0), 0);
        assert_eq!(clock.advance(0.5 / 64.0), 1);
    }

    #[test]
    fn test_substeps_are_capped() {
        let mut clock = FixedTimestep::new(1.0 / 64.0, 4);
        assert_eq!(clock.advance(6.25 / 64.0), 4);
        // Backlog drains on later frames
        assert_eq!(clock.advance(0.0), 2);
    }

    #[test]
    fn test_long_stall_is_dropped() {
        let mut clock = FixedTimestep::new(1.0 / 32.0, 100);
        // Clamped to 0.1s = 3.2 steps
        assert_eq!(clock.advance(5.0), 3);
    }

    #[test]
    fn test_fps_counter() {
        let mut fps = FpsCounter::default();
        for i in 1..=120 {
            fps.record(i as f64 * 1000.0 / 60.0);
        }
        assert_eq!(fps.fps(), 60);
    }
}
