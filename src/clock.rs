//! Frame timing for the viewer loop.
//!
//! The scene only needs a delta per frame; [`FrameClock`] produces it from
//! wall time, or from a fixed step for headless runs.
//!
//! ```ignore
//! let mut clock = FrameClock::new();
//! loop {
//!     let dt = clock.tick();
//!     scene.advance(dt);
//! }
//! ```

use std::time::{Duration, Instant};

/// Longest delta handed out, so a stalled window does not jump the clock.
pub const MAX_DELTA: f32 = 0.25;

/// Wall-clock or fixed-step frame timer.
#[derive(Debug)]
pub struct FrameClock {
    last_frame: Instant,
    frame_count: u64,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
    paused: bool,
    fixed_delta: Option<f32>,
}

impl FrameClock {
    /// Create a wall-clock timer starting from now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            frame_count: 0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            paused: false,
            fixed_delta: None,
        }
    }

    /// Create a timer that always reports `step` seconds per frame.
    pub fn fixed(step: f32) -> Self {
        Self {
            fixed_delta: Some(step),
            ..Self::new()
        }
    }

    /// Advance one frame and return its delta in seconds.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let raw = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        let delta = if self.paused {
            0.0
        } else {
            self.fixed_delta.unwrap_or(raw).clamp(0.0, MAX_DELTA)
        };
        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            let fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
            log::trace!("{:.1} fps", fps);
        }

        delta
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// While paused every tick returns a zero delta.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_wall_clock_tick() {
        let mut clock = FrameClock::new();
        thread::sleep(Duration::from_millis(10));
        let dt = clock.tick();
        assert!(dt > 0.0);
        assert_eq!(clock.frame(), 1);
    }

    #[test]
    fn test_fixed_step() {
        let mut clock = FrameClock::fixed(1.0 / 60.0);
        thread::sleep(Duration::from_millis(50));
        assert!((clock.tick() - 1.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_stall_is_clamped() {
        let mut clock = FrameClock::fixed(3.0);
        assert_eq!(clock.tick(), MAX_DELTA);
    }

    #[test]
    fn test_pause() {
        let mut clock = FrameClock::fixed(0.1);
        clock.toggle_pause();
        assert_eq!(clock.tick(), 0.0);
        assert!(clock.is_paused());
        assert_eq!(clock.frame(), 1);

        clock.toggle_pause();
        assert!(!clock.is_paused());
        assert!((clock.tick() - 0.1).abs() < 1e-6);
    }
}
