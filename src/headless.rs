//! Window-free runs.
//!
//! [`run`] advances a scene at a fixed step and hands every frame to a
//! [`LogSink`], which condenses the instance buffer into [`FrameStats`].
//! Useful for checking a config or profiling without a GPU.

use crate::clock::FrameClock;
use crate::scene::{InstanceRecord, RenderSink, Scene};
use glam::Vec3;

/// Step used by headless runs, in seconds.
pub const FIXED_STEP: f32 = 1.0 / 60.0;

/// Summary of one submitted frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameStats {
    /// Number of frames submitted so far, this one included.
    pub frame: u64,
    pub instances: usize,
    /// Mean instance position.
    pub centroid: Vec3,
    /// Mean distance of instances from the centroid.
    pub spread: f32,
}

impl FrameStats {
    fn measure(frame: u64, instances: &[InstanceRecord]) -> Self {
        let n = instances.len().max(1) as f32;
        let positions = instances.iter().map(|r| r.transform.w_axis.truncate());
        let centroid = positions.clone().sum::<Vec3>() / n;
        let spread = positions.map(|p| p.distance(centroid)).sum::<f32>() / n;
        Self {
            frame,
            instances: instances.len(),
            centroid,
            spread,
        }
    }
}

/// Render sink that logs frame statistics instead of drawing.
#[derive(Debug)]
pub struct LogSink {
    every: u64,
    frames: u64,
    last: Option<FrameStats>,
}

impl LogSink {
    /// Log every `every`-th frame at info level; the rest go to trace.
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            frames: 0,
            last: None,
        }
    }

    /// Stats of the most recent frame.
    pub fn last(&self) -> Option<FrameStats> {
        self.last
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl RenderSink for LogSink {
    fn submit(&mut self, instances: &[InstanceRecord]) {
        self.frames += 1;
        let stats = FrameStats::measure(self.frames, instances);
        if self.frames % self.every == 0 {
            log::info!(
                "frame {:>5}: {} instances, spread {:.3}, centroid ({:.2}, {:.2}, {:.2})",
                stats.frame,
                stats.instances,
                stats.spread,
                stats.centroid.x,
                stats.centroid.y,
                stats.centroid.z
            );
        } else {
            log::trace!("frame {}: spread {:.3}", stats.frame, stats.spread);
        }
        self.last = Some(stats);
    }
}

/// Advance `scene` for `frames` fixed steps, submitting each frame to `sink`.
///
/// With `toggle_every`, the mode flips every that many frames so the run
/// exercises both directions of the morph.
pub fn run<S: RenderSink + ?Sized>(scene: &mut Scene, frames: u64, toggle_every: Option<u64>, sink: &mut S) {
    let mut clock = FrameClock::fixed(FIXED_STEP);
    log::info!("Headless run: {} frames, mode {:?}", frames, scene.mode());

    for frame in 1..=frames {
        if toggle_every.is_some_and(|n| n > 0 && frame % n == 0) {
            scene.toggle_mode();
        }
        scene.advance(clock.tick());
        scene.submit_to(sink);
    }

    log::info!(
        "Headless run finished after {} frames ({:.2}s scene time)",
        scene.frame(),
        scene.elapsed()
    );
}
