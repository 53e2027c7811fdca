//! Per-frame interpolation of particle poses.
//!
//! Each frame every particle eases toward the anchor selected by the current
//! mode:
//!
//! ```text
//! dest      = mode == Assembled ? anchor_assembled (+ hover) : anchor_dispersed
//! position += (dest - position) * blend_rate
//! ```
//!
//! Anchors never change; morphing is only ever a blend between two fixed
//! points. Rotation and scale follow the group's [`Motion`] rules.

use crate::controller::Mode;
use crate::group::{Motion, Orientation, ParticleGroup, ScaleRule};
use crate::particle::Particle;
use glam::{Mat3, Quat, Vec3};
use std::f32::consts::TAU;

/// What every group needs to know to advance one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameContext {
    /// Mode selecting the anchor.
    pub mode: Mode,
    /// Seconds since the scene started, drives secondary motion.
    pub elapsed: f32,
}

/// One exponential easing step from `current` toward `dest`.
///
/// `dest` is a fixed point, and for `k` in `(0, 1]` the result never
/// overshoots.
#[inline]
pub fn blend_toward(current: Vec3, dest: Vec3, k: f32) -> Vec3 {
    current + (dest - current) * k
}

/// Orientation whose +Z axis points from `position` to the vertical axis at
/// the same height.
///
/// A particle sitting on the axis keeps the identity orientation.
pub fn face_axis(position: Vec3) -> Quat {
    let Some(z) = Vec3::new(-position.x, 0.0, -position.z).try_normalize() else {
        return Quat::IDENTITY;
    };
    let x = Vec3::Y.cross(z);
    let y = z.cross(x);
    Quat::from_mat3(&Mat3::from_cols(x, y, z))
}

#[inline]
fn wrap_angles(v: Vec3) -> Vec3 {
    Vec3::new(v.x.rem_euclid(TAU), v.y.rem_euclid(TAU), v.z.rem_euclid(TAU))
}

impl ParticleGroup {
    /// Advance every particle in the group by one frame.
    pub fn advance(&mut self, frame: &FrameContext) {
        let motion = *self.motion();
        for (index, particle) in self.particles.iter_mut().enumerate() {
            advance_particle(particle, index, &motion, frame);
        }
    }
}

fn advance_particle(p: &mut Particle, index: usize, motion: &Motion, frame: &FrameContext) {
    let assembled = frame.mode.is_assembled();
    let t = frame.elapsed;

    // Position
    let mut dest = if assembled {
        p.anchor_assembled
    } else {
        p.anchor_dispersed
    };
    if assembled {
        if let Some(hover) = motion.hover {
            dest.y += hover.at(t, p.phase);
        }
    }
    p.pose.position = blend_toward(p.pose.position, dest, motion.blend_rate(assembled, index));

    // Rotation
    match motion.orientation {
        Orientation::Spin => p.pose.rotation = wrap_angles(p.pose.rotation + p.spin_rate),
        Orientation::FaceAxis { dispersed_spin } => {
            if assembled {
                p.pose.set_quat(face_axis(p.pose.position));
            } else {
                p.pose.rotation = wrap_angles(p.pose.rotation + dispersed_spin);
            }
        }
    }
    if let Some(tilt) = motion.tilt {
        p.pose.rotation.z = tilt.at(t, p.phase);
    }

    // Scale
    match motion.scale {
        ScaleRule::Fixed => {}
        ScaleRule::Blend { rate, .. } => {
            let target = Vec3::splat(motion.target_scale(assembled, p.scale_base));
            p.pose.scale = blend_toward(p.pose.scale, target, rate);
        }
        ScaleRule::Pulse(pulse) => {
            p.pose.scale = Vec3::splat(p.scale_base + pulse.at(t, p.phase));
        }
    }
}
