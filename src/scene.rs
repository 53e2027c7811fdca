//! The composition root.
//!
//! [`Scene`] owns every particle group and the mode controller. Once per
//! rendered frame the host calls [`Scene::advance`], which drains the latest
//! gesture reading, advances each group, updates the global rotation and
//! rewrites the instance buffer. [`Scene::snapshot`] hands that buffer to the
//! renderer; nothing mutates it outside `advance`.

use crate::config::SceneConfig;
use crate::controller::{smooth_toward, Mode, ModeController};
use crate::engine::FrameContext;
use crate::error::{ConfigError, GestureError};
use crate::gesture::GestureSample;
use crate::group::{GroupKind, ParticleGroup};
use crate::signal::LatestCell;
use glam::{Mat4, Vec3};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

/// One entry of the buffer handed to the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InstanceRecord {
    /// Group the instance belongs to.
    pub group: GroupKind,
    /// Stable index within that group.
    pub index: u32,
    /// Full world transform, global rotation included.
    pub transform: Mat4,
    /// Linear RGB color.
    pub color: Vec3,
}

/// Consumer of the per-frame instance buffer.
///
/// Nothing flows back to the scene; a sink that is not ready simply skips
/// the frame.
pub trait RenderSink {
    fn submit(&mut self, instances: &[InstanceRecord]);
}

/// Particle groups, controller and global transform.
pub struct Scene {
    config: SceneConfig,
    groups: Vec<ParticleGroup>,
    controller: ModeController,
    gesture: Option<Arc<LatestCell<GestureSample>>>,
    elapsed: f32,
    frame: u64,
    paused: bool,
    /// Angle the autonomous sway oscillates around.
    rotation_base: f32,
    rotation_current: f32,
    buffer: Vec<InstanceRecord>,
}

impl Scene {
    /// Build the stock tree described by `config`.
    ///
    /// Uses `config.seed` when set, otherwise a fresh layout every run.
    pub fn new(config: SceneConfig) -> Result<Self, ConfigError> {
        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self::with_rng(config, &mut rng)
    }

    /// Build the stock tree, drawing the layout from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(config: SceneConfig, rng: &mut R) -> Result<Self, ConfigError> {
        let groups = GroupKind::ALL
            .iter()
            .map(|&kind| ParticleGroup::generate(kind, &config, rng))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_groups(config, groups)
    }

    /// Assemble a scene from prebuilt groups.
    pub fn from_groups(config: SceneConfig, groups: Vec<ParticleGroup>) -> Result<Self, ConfigError> {
        config.validate()?;
        let controller = ModeController::new(config.initial_mode, config.rotation_span);
        let total: usize = groups.iter().map(ParticleGroup::len).sum();

        let mut scene = Self {
            config,
            groups,
            controller,
            gesture: None,
            elapsed: 0.0,
            frame: 0,
            paused: false,
            rotation_base: 0.0,
            rotation_current: 0.0,
            buffer: Vec::with_capacity(total),
        };
        scene.rotation_current = scene.sway(0.0);
        scene.write_buffer();

        log::info!(
            "Scene ready: {} instances in {} groups, mode {:?}",
            total,
            scene.groups.len(),
            scene.controller.mode()
        );
        Ok(scene)
    }

    // ========== Control ==========

    /// Manual mode change. Returns whether the mode changed.
    pub fn set_mode(&mut self, mode: Mode) -> bool {
        self.controller.set_mode(mode)
    }

    /// Manual toggle. Returns the new mode.
    pub fn toggle_mode(&mut self) -> Mode {
        self.controller.toggle()
    }

    /// Overwrite the rotation target directly.
    pub fn set_rotation_target(&mut self, angle: f32) -> Result<(), GestureError> {
        self.controller.set_rotation_target(angle)
    }

    /// Start following readings published into `feed`.
    ///
    /// While attached, the global rotation eases toward the gesture target
    /// instead of swaying on its own.
    pub fn attach_gesture(&mut self, feed: Arc<LatestCell<GestureSample>>) {
        self.gesture = Some(feed);
        log::info!("Gesture control attached");
    }

    /// Stop following gesture readings. Mode and rotation target keep their
    /// last values, and the sway resumes around the current angle.
    pub fn detach_gesture(&mut self) {
        if self.gesture.take().is_some() {
            self.rotation_base = self.rotation_current - self.sway(self.elapsed);
            log::info!("Gesture control detached at rotation {:.3}", self.rotation_current);
        }
    }

    /// Freeze or resume the scene.
    ///
    /// While paused, [`advance`](Self::advance) leaves every pose, the
    /// rotation and the clock untouched. Gesture readings stay in the feed
    /// until the scene resumes.
    pub fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            self.paused = paused;
            log::info!("Scene {}", if paused { "paused" } else { "resumed" });
        }
    }


    /// Whether a gesture feed is driving rotation.
    #[inline]
    pub fn is_gesture_driven(&self) -> bool {
        self.gesture.is_some()
    }

    // ========== Frame ==========

    /// Advance the scene by one rendered frame of `dt` seconds.
    ///
    /// Blend rates are per frame; `dt` only moves the clock that drives
    /// hover, pulse, tilt and sway.
    pub fn advance(&mut self, dt: f32) {
        if self.paused {
            return;
        }

        if let Some(sample) = self.gesture.as_ref().and_then(|feed| feed.take()) {
            if let Err(e) = self.controller.apply_gesture(sample) {
                log::warn!("Ignoring gesture sample: {}", e);
            }
        }

        if dt.is_finite() && dt >= 0.0 {
            self.elapsed += dt;
        } else {
            log::warn!("Ignoring invalid frame delta {}", dt);
        }

        let frame = FrameContext {
            mode: self.controller.mode(),
            elapsed: self.elapsed,
        };
        for group in &mut self.groups {
            group.advance(&frame);
        }

        self.rotation_current = if self.is_gesture_driven() {
            smooth_toward(
                self.rotation_current,
                self.controller.rotation_target(),
                self.config.rotation_smoothing,
            )
        } else {
            self.rotation_base + self.sway(self.elapsed)
        };

        self.write_buffer();
        self.frame += 1;
    }

    /// Instance buffer as of the last [`advance`](Self::advance).
    #[inline]
    pub fn snapshot(&self) -> &[InstanceRecord] {
        &self.buffer
    }

    /// Hand the current buffer to `sink`.
    pub fn submit_to<S: RenderSink + ?Sized>(&self, sink: &mut S) {
        sink.submit(&self.buffer);
    }

    /// Transform applied to the whole assembly.
    pub fn world_transform(&self) -> Mat4 {
        Mat4::from_translation(Vec3::from_array(self.config.assembly_offset))
            * Mat4::from_rotation_y(self.rotation_current)
    }

    fn sway(&self, t: f32) -> f32 {
        (t * self.config.sway_frequency).sin() * self.config.sway_amplitude
    }

    fn write_buffer(&mut self) {
        let world = self.world_transform();
        self.buffer.clear();
        for group in &self.groups {
            let kind = group.kind();
            self.buffer
                .extend(group.particles().iter().enumerate().map(|(i, p)| InstanceRecord {
                    group: kind,
                    index: i as u32,
                    transform: world * p.pose.matrix(),
                    color: p.color,
                }));
        }
    }

    // ========== Queries ==========

    #[inline]
    pub fn mode(&self) -> Mode {
        self.controller.mode()
    }

    #[inline]
    pub fn controller(&self) -> &ModeController {
        &self.controller
    }

    /// Current global rotation about Y, in radians.
    #[inline]
    pub fn rotation(&self) -> f32 {
        self.rotation_current
    }

    /// Seconds of scene time elapsed.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Frames advanced so far.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    #[inline]
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    #[inline]
    pub fn groups(&self) -> &[ParticleGroup] {
        &self.groups
    }

    /// First group of the given kind.
    pub fn group(&self, kind: GroupKind) -> Option<&ParticleGroup> {
        self.groups.iter().find(|g| g.kind() == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::Motion;
    use std::f32::consts::PI;

    fn small_config() -> SceneConfig {
        SceneConfig {
            foliage_count: 50,
            ribbon_count: 30,
            ornament_count: 20,
            seed: Some(5),
            ..Default::default()
        }
    }

    #[test]
    fn test_buffer_layout() {
        let scene = Scene::new(small_config()).unwrap();
        let snapshot = scene.snapshot();
        assert_eq!(snapshot.len(), 50 + 30 + 10 + 10 + 1);
        assert_eq!(snapshot[0].group, GroupKind::Foliage);
        assert_eq!(snapshot[50].group, GroupKind::Ribbon);
        assert_eq!(snapshot[50].index, 0);
        assert_eq!(snapshot[100].group, GroupKind::Centerpiece);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = Scene::new(small_config()).unwrap();
        let b = Scene::new(small_config()).unwrap();
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_world_transform_applied() {
        let config = SceneConfig {
            sway_amplitude: 0.0,
            ..small_config()
        };
        let group =
            ParticleGroup::from_anchors(GroupKind::Foliage, Motion::linear(0.5), &[Vec3::ZERO], &[Vec3::X])
                .unwrap();
        let scene = Scene::from_groups(config, vec![group]).unwrap();
        let p = scene.snapshot()[0].transform.transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(1.0, -3.5, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_autonomous_sway() {
        let mut scene = Scene::new(small_config()).unwrap();
        scene.advance(5.0 * PI);
        // sin(0.1 * 5π) = 1
        assert!((scene.rotation() - 0.2).abs() < 1e-4);
    }

    #[test]
    fn test_gesture_drives_mode_and_rotation() {
        let mut scene = Scene::new(small_config()).unwrap();
        let feed = LatestCell::shared();
        scene.attach_gesture(Arc::clone(&feed));

        feed.publish(GestureSample::new(false, 0.25));
        scene.advance(1.0 / 60.0);
        assert_eq!(scene.mode(), Mode::Dispersed);
        assert!((scene.controller().rotation_target() - PI).abs() < 1e-5);
        assert!((scene.rotation() - PI * 0.1).abs() < 1e-4);
    }

    #[test]
    fn test_bad_sample_does_not_poison_buffer() {
        let mut scene = Scene::new(small_config()).unwrap();
        let feed = LatestCell::shared();
        scene.attach_gesture(Arc::clone(&feed));

        feed.publish(GestureSample::new(false, f32::NAN));
        for _ in 0..10 {
            scene.advance(1.0 / 60.0);
        }
        assert!(scene.rotation().is_finite());
        assert!(scene
            .snapshot()
            .iter()
            .all(|r| r.transform.is_finite()));
    }

    #[test]
    fn test_invalid_dt_ignored() {
        let mut scene = Scene::new(small_config()).unwrap();
        scene.advance(f32::NAN);
        scene.advance(-1.0);
        assert_eq!(scene.elapsed(), 0.0);
        assert_eq!(scene.frame(), 2);
    }

    #[test]
    fn test_detach_keeps_last_mode() {
        let mut scene = Scene::new(small_config()).unwrap();
        let feed = LatestCell::shared();
        scene.attach_gesture(Arc::clone(&feed));
        feed.publish(GestureSample::new(false, 0.5));
        scene.advance(0.016);
        scene.detach_gesture();
        scene.advance(0.016);
        assert_eq!(scene.mode(), Mode::Dispersed);
        assert!(!scene.is_gesture_driven());
    }

    #[test]
    fn test_paused_scene_is_frozen() {
        let mut scene = Scene::new(small_config()).unwrap();
        scene.set_paused(true);
        let before = scene.snapshot().to_vec();

        for _ in 0..30 {
            scene.advance(1.0 / 60.0);
        }
        assert_eq!(scene.snapshot(), &before[..]);
        assert_eq!(scene.frame(), 0);
        assert_eq!(scene.elapsed(), 0.0);

        scene.set_paused(false);
        scene.advance(1.0 / 60.0);
        assert_ne!(scene.snapshot(), &before[..]);
    }

    #[test]
    fn test_pause_holds_gesture_reading() {
        let mut scene = Scene::new(small_config()).unwrap();
        let feed = LatestCell::shared();
        scene.attach_gesture(Arc::clone(&feed));
        scene.set_paused(true);

        feed.publish(GestureSample::new(false, 0.5));
        scene.advance(1.0 / 60.0);
        assert_eq!(scene.mode(), Mode::Assembled);
        assert!(feed.is_pending());

        scene.set_paused(false);
        scene.advance(1.0 / 60.0);
        assert_eq!(scene.mode(), Mode::Dispersed);
    }

    #[test]
    fn test_detach_keeps_rotation() {
        let mut scene = Scene::new(small_config()).unwrap();
        let feed = LatestCell::shared();
        scene.attach_gesture(Arc::clone(&feed));
        feed.publish(GestureSample::new(false, 0.0));
        for _ in 0..100 {
            scene.advance(1.0 / 60.0);
        }
        let held = scene.rotation();
        assert!((held - 2.0 * PI).abs() < 1e-3);

        scene.detach_gesture();
        scene.advance(1.0 / 60.0);
        assert!((scene.rotation() - held).abs() < 1e-2);

        // Sway continues around the held angle, never straying more than
        // one full swing from it.
        scene.advance(5.0 * PI);
        assert!((scene.rotation() - held).abs() <= 0.4 + 1e-4);
        assert!(scene.rotation() > PI);
    }

    struct CountingSink(usize);

    impl RenderSink for CountingSink {
        fn submit(&mut self, instances: &[InstanceRecord]) {
            self.0 += instances.len();
        }
    }

    #[test]
    fn test_submit_to_sink() {
        let scene = Scene::new(small_config()).unwrap();
        let mut sink = CountingSink(0);
        scene.submit_to(&mut sink);
        assert_eq!(sink.0, scene.snapshot().len());
    }
}
