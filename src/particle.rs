//! Per-instance particle data.

use glam::{EulerRot, Mat4, Quat, Vec3};

/// Position, orientation and scale of one instance.
///
/// Stored as separate fields and mutated directly each frame; the matrix is
/// only composed when the instance is written out.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    /// World position relative to the assembly origin.
    pub position: Vec3,
    /// Euler angles in radians, applied in XYZ order.
    pub rotation: Vec3,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Pose {
    /// Pose at `position` with no rotation and uniform `scale`.
    pub fn at(position: Vec3, scale: f32) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
            scale: Vec3::splat(scale),
        }
    }

    /// Orientation as a quaternion.
    #[inline]
    pub fn quat(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    /// Overwrite the Euler angles from a quaternion.
    #[inline]
    pub fn set_quat(&mut self, q: Quat) {
        let (x, y, z) = q.to_euler(EulerRot::XYZ);
        self.rotation = Vec3::new(x, y, z);
    }

    /// Compose the local transform matrix.
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quat(), self.position)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::at(Vec3::ZERO, 1.0)
    }
}

/// One decorative instance.
///
/// Everything except `pose` is fixed at construction. The particle is owned by
/// exactly one [`ParticleGroup`](crate::ParticleGroup) and addressed by its
/// index there.
#[derive(Clone, Debug)]
pub struct Particle {
    /// Target position while the assembly is assembled.
    pub anchor_assembled: Vec3,
    /// Target position while the assembly is dispersed.
    pub anchor_dispersed: Vec3,
    /// Current pose, the only field that changes after construction.
    pub pose: Pose,
    /// Base uniform scale.
    pub scale_base: f32,
    /// Linear RGB color.
    pub color: Vec3,
    /// Phase offset for secondary motion, in radians.
    pub phase: f32,
    /// Euler increment applied every frame while spinning, in radians per frame.
    pub spin_rate: Vec3,
}

impl Particle {
    /// Particle resting at its dispersed anchor.
    pub fn new(anchor_assembled: Vec3, anchor_dispersed: Vec3, scale_base: f32) -> Self {
        Self {
            anchor_assembled,
            anchor_dispersed,
            pose: Pose::at(anchor_dispersed, scale_base),
            scale_base,
            color: Vec3::ONE,
            phase: 0.0,
            spin_rate: Vec3::ZERO,
        }
    }

    /// Set the color.
    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }

    /// Set the secondary-motion phase.
    pub fn with_phase(mut self, phase: f32) -> Self {
        self.phase = phase;
        self
    }

    /// Set the per-frame spin increment.
    pub fn with_spin(mut self, spin_rate: Vec3) -> Self {
        self.spin_rate = spin_rate;
        self
    }
}
