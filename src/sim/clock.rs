//! Fixed-timestep accumulator
//!
//! Wall-clock deltas go in, a whole number of constant steps come out. The
//! simulation never sees a variable step, so it behaves identically on any
//! display refresh rate.

use crate::consts::{FIXED_STEP_MS, MAX_FRAME_MS};

/// Frame time samples kept for averages
pub const FRAME_WINDOW: usize = 100;

/// Drains wall-clock time in fixed steps
#[derive(Debug, Clone)]
pub struct FixedClock {
    step_ms: f32,
    max_frame_ms: f32,
    accumulator: f32,
    stats: FrameStats,
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::new(FIXED_STEP_MS, MAX_FRAME_MS)
    }
}

impl FixedClock {
    pub fn new(step_ms: f32, max_frame_ms: f32) -> Self {
        Self {
            step_ms,
            max_frame_ms,
            accumulator: 0.0,
            stats: FrameStats::default(),
        }
    }

    pub fn step_ms(&self) -> f32 {
        self.step_ms
    }

    /// Feed one frame's wall delta and run `on_tick` once per whole step
    ///
    /// Negative or non-finite deltas count as zero; long frames are clamped to
    /// `max_frame_ms` so a stall cannot queue a burst of ticks. The remainder
    /// carries over to the next frame. Returns the number of ticks run.
    pub fn advance<F: FnMut(f32)>(&mut self, wall_delta_ms: f32, mut on_tick: F) -> u32 {
        let delta = if wall_delta_ms.is_finite() {
            wall_delta_ms.clamp(0.0, self.max_frame_ms)
        } else {
            0.0
        };
        if self.step_ms <= 0.0 {
            return 0;
        }

        self.accumulator += delta;
        let mut ticks = 0;
        while self.accumulator >= self.step_ms {
            on_tick(self.step_ms);
            self.accumulator -= self.step_ms;
            ticks += 1;
        }

        self.stats.record(delta, ticks);
        ticks
    }

    /// How far between two ticks the current frame is, in [0, 1)
    pub fn alpha(&self) -> f32 {
        if self.step_ms <= 0.0 {
            return 0.0;
        }
        self.accumulator / self.step_ms
    }

    /// Drop any backlog, e.g. after a pause
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }
}

/// Rolling frame timing
#[derive(Debug, Clone)]
pub struct FrameStats {
    pub frames: u64,
    pub ticks: u64,
    pub last_frame_ms: f32,
    /// Frames per second of wall time, updated once a second
    pub fps: u32,
    frame_times: [f32; FRAME_WINDOW],
    frame_index: usize,
    samples: usize,
    second_ms: f32,
    second_frames: u32,
}

impl Default for FrameStats {
    fn default() -> Self {
        Self {
            frames: 0,
            ticks: 0,
            last_frame_ms: 0.0,
            fps: 0,
            frame_times: [0.0; FRAME_WINDOW],
            frame_index: 0,
            samples: 0,
            second_ms: 0.0,
            second_frames: 0,
        }
    }
}

impl FrameStats {
    fn record(&mut self, frame_ms: f32, ticks: u32) {
        self.frames += 1;
        self.ticks += u64::from(ticks);
        self.last_frame_ms = frame_ms;

        self.frame_times[self.frame_index] = frame_ms;
        self.frame_index = (self.frame_index + 1) % FRAME_WINDOW;
        self.samples = (self.samples + 1).min(FRAME_WINDOW);

        self.second_ms += frame_ms;
        self.second_frames += 1;
        if self.second_ms >= 1000.0 {
            self.fps = self.second_frames;
            self.second_ms -= 1000.0;
            self.second_frames = 0;
        }
    }

    fn window(&self) -> &[f32] {
        &self.frame_times[..self.samples]
    }

    pub fn avg_frame_ms(&self) -> f32 {
        if self.samples == 0 {
            return 0.0;
        }
        self.window().iter().sum::<f32>() / self.samples as f32
    }

    pub fn min_frame_ms(&self) -> f32 {
        self.window().iter().copied().reduce(f32::min).unwrap_or(0.0)
    }

    pub fn max_frame_ms(&self) -> f32 {
        self.window().iter().copied().reduce(f32::max).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_tick_per_step() {
        let mut clock = FixedClock::new(10.0, 100.0);
        let mut steps = Vec::new();
        assert_eq!(clock.advance(10.0, |dt| steps.push(dt)), 1);
        assert_eq!(steps, vec![10.0]);
    }

    #[test]
    fn test_remainder_carries() {
        let mut clock = FixedClock::new(10.0, 100.0);
        assert_eq!(clock.advance(6.0, |_| {}), 0);
        assert!((clock.alpha() - 0.6).abs() < 1e-5);
        assert_eq!(clock.advance(6.0, |_| {}), 1);
        assert!((clock.alpha() - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let mut clock = FixedClock::new(10.0, 100.0);
        assert_eq!(clock.advance(5000.0, |_| {}), 10);
        assert_eq!(clock.stats().last_frame_ms, 100.0);
    }

    #[test]
    fn test_bad_deltas_count_as_zero() {
        let mut clock = FixedClock::new(10.0, 100.0);
        assert_eq!(clock.advance(-50.0, |_| {}), 0);
        assert_eq!(clock.advance(f32::NAN, |_| {}), 0);
        assert_eq!(clock.advance(f32::INFINITY, |_| {}), 0);
        assert_eq!(clock.alpha(), 0.0);
    }

    #[test]
    fn test_refresh_rate_independent() {
        // One second at 144 Hz and at 30 Hz runs the same number of 60 Hz ticks
        let mut fast = FixedClock::default();
        let mut slow = FixedClock::default();
        let fast_ticks: u32 = (0..144).map(|_| fast.advance(1000.0 / 144.0, |_| {})).sum();
        let slow_ticks: u32 = (0..30).map(|_| slow.advance(1000.0 / 30.0, |_| {})).sum();
        assert!((59..=60).contains(&fast_ticks));
        assert!((59..=60).contains(&slow_ticks));
        assert!(fast_ticks.abs_diff(slow_ticks) <= 1);
    }

    #[test]
    fn test_reset_drops_backlog() {
        let mut clock = FixedClock::new(10.0, 100.0);
        clock.advance(9.0, |_| {});
        clock.reset();
        assert_eq!(clock.advance(9.0, |_| {}), 0);
    }

    #[test]
    fn test_frame_stats() {
        let mut clock = FixedClock::new(10.0, 100.0);
        for i in 0..150 {
            clock.advance(if i % 2 == 0 { 10.0 } else { 20.0 }, |_| {});
        }
        let stats = clock.stats();
        assert_eq!(stats.frames, 150);
        assert_eq!(stats.ticks, 225);
        assert!((stats.avg_frame_ms() - 15.0).abs() < 1e-4);
        assert_eq!(stats.min_frame_ms(), 10.0);
        assert_eq!(stats.max_frame_ms(), 20.0);
        assert!((66..=67).contains(&stats.fps));
    }
}
