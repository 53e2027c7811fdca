//! Orbit camera around the tree.

use glam::{Mat4, Vec3};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

/// Closest the camera may zoom in.
pub const MIN_DISTANCE: f32 = 5.0;
/// Farthest the camera may zoom out.
pub const MAX_DISTANCE: f32 = 25.0;
/// Smallest angle between the camera and straight up.
pub const MIN_POLAR: f32 = FRAC_PI_4;
/// Largest angle between the camera and straight up; slightly below the horizon.
pub const MAX_POLAR: f32 = PI / 1.8;

const ORBIT_SENSITIVITY: f32 = 0.005;
const ZOOM_STEP: f32 = 0.6;
const FOV_Y: f32 = 45.0;

/// Orbit camera for viewing the tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Angle from +Y down to the camera, in radians.
    pub polar: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Idle orbit rate in radians per second.
    pub auto_rotate_speed: f32,
}

impl Camera {
    /// Camera looking at the origin from `(0, 2, 14)`.
    pub fn new() -> Self {
        let mut camera = Self {
            yaw: 0.0,
            polar: FRAC_PI_2,
            distance: 1.0,
            target: Vec3::ZERO,
            // Half a turn per minute
            auto_rotate_speed: 0.5 * TAU / 60.0,
        };
        camera.look_from(Vec3::new(0.0, 2.0, 14.0));
        camera
    }

    /// Place the camera at `eye`, keeping the current target.
    pub fn look_from(&mut self, eye: Vec3) {
        let offset = eye - self.target;
        self.distance = offset.length().clamp(MIN_DISTANCE, MAX_DISTANCE);
        self.yaw = offset.x.atan2(offset.z);
        let r = offset.length().max(f32::EPSILON);
        self.polar = (offset.y / r).clamp(-1.0, 1.0).acos().clamp(MIN_POLAR, MAX_POLAR);
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let ring = self.distance * self.polar.sin();
        let x = ring * self.yaw.sin();
        let y = self.distance * self.polar.cos();
        let z = ring * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(FOV_Y.to_radians(), aspect, 0.1, 200.0) * self.view_matrix()
    }

    /// Orbit by a cursor drag of `dx`, `dy` pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.yaw = (self.yaw - dx * ORBIT_SENSITIVITY).rem_euclid(TAU);
        self.polar = (self.polar - dy * ORBIT_SENSITIVITY).clamp(MIN_POLAR, MAX_POLAR);
    }

    /// Zoom by scroll lines; positive moves closer.
    pub fn zoom(&mut self, scroll: f32) {
        self.distance = (self.distance - scroll * ZOOM_STEP).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Idle orbit for `dt` seconds.
    pub fn auto_rotate(&mut self, dt: f32) {
        self.yaw = (self.yaw + self.auto_rotate_speed * dt).rem_euclid(TAU);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
