//! Time management utilities

use std::time::{Duration, Instant};

/// High-precision timer for frame timing
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Update the timer (should be called once per frame)
    pub fn update(&mut self) {
        let now = Instant::now();
        self.advance(now.duration_since(self.last_frame).as_secs_f32());
        self.last_frame = now;
    }

    /// Advance by a fixed step, used by headless runs
    pub fn advance(&mut self, delta_time: f32) {
        self.delta_time = delta_time;
        self.total_time += delta_time;
        self.frame_count += 1;
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time since timer creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the average FPS since timer creation
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }

    /// Get the current FPS (based on last frame time)
    pub fn current_fps(&self) -> f32 {
        if self.delta_time > 0.0 {
            1.0 / self.delta_time
        } else {
            0.0
        }
    }
}

/// Caps the frame rate when presenting does not block
#[derive(Debug, Clone, Copy)]
pub struct FramePacer {
    frame_time: Duration,
    frame_start: Instant,
}

impl FramePacer {
    /// Pace to at most `max_fps` frames per second; `max_fps` must be non-zero
    pub fn new(max_fps: u32) -> Self {
        Self {
            frame_time: Duration::from_secs(1) / max_fps.max(1),
            frame_start: Instant::now(),
        }
    }

    /// Target duration of one frame
    pub fn frame_time(&self) -> Duration {
        self.frame_time
    }

    /// Time left in the frame after `elapsed` has been spent
    pub fn remaining(&self, elapsed: Duration) -> Duration {
        self.frame_time.saturating_sub(elapsed)
    }

    /// Sleep out the rest of the current frame and start the next one
    pub fn wait(&mut self) {
        let remaining = self.remaining(self.frame_start.elapsed());
        if !remaining.is_zero() {
            std::thread::sleep(remaining);
        }
        self.frame_start = Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_steps_accumulate() {
        let mut timer = Timer::new();
        timer.advance(0.5);
        timer.advance(0.5);
        assert_eq!(timer.frame_count(), 2);
        assert!((timer.total_time() - 1.0).abs() < f32::EPSILON);
        assert!((timer.average_fps() - 2.0).abs() < 1e-6);
        assert!((timer.current_fps() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn pacer_sleeps_only_for_the_unspent_part_of_a_frame() {
        let pacer = FramePacer::new(50);
        assert_eq!(pacer.frame_time(), Duration::from_millis(20));
        assert_eq!(pacer.remaining(Duration::from_millis(5)), Duration::from_millis(15));
        assert_eq!(pacer.remaining(Duration::from_millis(30)), Duration::ZERO);
    }

    #[test]
    fn pacer_wait_holds_the_frame_rate() {
        let mut pacer = FramePacer::new(100);
        let start = Instant::now();
        pacer.wait();
        pacer.wait();
        assert!(start.elapsed() >= Duration::from_millis(19));
    }
}
