//! Particle groups and their construction.
//!
//! A group is a fixed-size, contiguous set of particles that share one
//! generation strategy and one set of animation constants. Groups are built
//! once when the scene starts and are never resized.
//!
//! | Group | Strategy | Shape | Count |
//! |-------|----------|-------|-------|
//! | [`GroupKind::Foliage`] | cone volume | octahedron | 4500 |
//! | [`GroupKind::Ribbon`] | spiral | tetrahedron | 1500 |
//! | [`GroupKind::Cubes`] | cone surface | cube | 400 |
//! | [`GroupKind::Polyhedra`] | cone surface | icosahedron | 400 |
//! | [`GroupKind::Centerpiece`] | singleton | star | 1 |

use crate::config::{self, SceneConfig};
use crate::error::ConfigError;
use crate::particle::{Particle, Pose};
use crate::sampler;
use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;

/// Visual role of a group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GroupKind {
    /// Pink octahedra filling the cone.
    Foliage,
    /// White tetrahedra along a helix around the cone.
    Ribbon,
    /// Lavender glass cubes on the cone surface.
    Cubes,
    /// White glass icosahedra on the cone surface.
    Polyhedra,
    /// The star on top.
    Centerpiece,
}

impl GroupKind {
    /// All kinds, in scene order.
    pub const ALL: [GroupKind; 5] = [
        GroupKind::Foliage,
        GroupKind::Ribbon,
        GroupKind::Cubes,
        GroupKind::Polyhedra,
        GroupKind::Centerpiece,
    ];

    /// How anchors for this kind are generated.
    pub fn strategy(self) -> Strategy {
        match self {
            GroupKind::Foliage => Strategy::ConeVolume,
            GroupKind::Ribbon => Strategy::Spiral,
            GroupKind::Cubes | GroupKind::Polyhedra => Strategy::ConeSurface,
            GroupKind::Centerpiece => Strategy::Singleton,
        }
    }

    /// Stable name used in logs and errors.
    pub fn name(self) -> &'static str {
        match self {
            GroupKind::Foliage => "foliage",
            GroupKind::Ribbon => "ribbon",
            GroupKind::Cubes => "cubes",
            GroupKind::Polyhedra => "polyhedra",
            GroupKind::Centerpiece => "centerpiece",
        }
    }
}

/// Generation strategy for assembled anchors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Uniform inside the cone.
    ConeVolume,
    /// On the cone's lateral surface, jittered outward.
    ConeSurface,
    /// Evenly spaced along a widening helix.
    Spiral,
    /// A single fixed anchor.
    Singleton,
}

/// A sinusoid `amplitude * sin(frequency * t + phase)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Oscillation {
    pub amplitude: f32,
    /// Angular frequency in radians per second.
    pub frequency: f32,
}

impl Oscillation {
    /// Value at time `t` for a particle with the given phase.
    #[inline]
    pub fn at(&self, t: f32, phase: f32) -> f32 {
        (t * self.frequency + phase).sin() * self.amplitude
    }
}

/// How a particle is oriented each frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Orientation {
    /// Add the particle's own spin rate every frame.
    Spin,
    /// While assembled, face the vertical axis at the particle's own height;
    /// while dispersed, add the shared `dispersed_spin` every frame.
    FaceAxis { dispersed_spin: Vec3 },
}

/// How scale evolves each frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScaleRule {
    /// Stays at the base scale.
    Fixed,
    /// Eases toward the base scale while assembled and toward
    /// `base * dispersed_factor` while dispersed.
    Blend { rate: f32, dispersed_factor: f32 },
    /// Set every frame to `base + pulse`.
    Pulse(Oscillation),
}

/// Animation constants shared by every particle in a group.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    /// Position blend rate while assembled.
    pub blend_assembled: f32,
    /// Position blend rate while dispersed.
    pub blend_dispersed: f32,
    /// Added to the assembled rate per `index % 50`, so neighbours settle at
    /// slightly different speeds.
    pub blend_jitter: f32,
    /// Vertical offset added to the destination while assembled.
    pub hover: Option<Oscillation>,
    /// Absolute Z tilt, set every frame.
    pub tilt: Option<Oscillation>,
    pub orientation: Orientation,
    pub scale: ScaleRule,
}

impl Motion {
    /// Plain easing at one rate in both modes, with no secondary motion.
    pub fn linear(rate: f32) -> Self {
        Self {
            blend_assembled: rate,
            blend_dispersed: rate,
            blend_jitter: 0.0,
            hover: None,
            tilt: None,
            orientation: Orientation::Spin,
            scale: ScaleRule::Fixed,
        }
    }

    /// Stock constants for `kind`.
    pub fn for_kind(kind: GroupKind) -> Self {
        match kind {
            GroupKind::Foliage => Self {
                blend_assembled: 0.03,
                blend_dispersed: 0.02,
                blend_jitter: 0.0002,
                hover: Some(Oscillation {
                    amplitude: 0.05,
                    frequency: 2.0,
                }),
                ..Self::linear(0.03)
            },
            GroupKind::Ribbon => Self {
                orientation: Orientation::FaceAxis {
                    dispersed_spin: Vec3::new(0.05, 0.05, 0.0),
                },
                scale: ScaleRule::Pulse(Oscillation {
                    amplitude: 0.02,
                    frequency: 3.0,
                }),
                ..Self::linear(0.05)
            },
            GroupKind::Cubes | GroupKind::Polyhedra => Self {
                scale: ScaleRule::Blend {
                    rate: 0.1,
                    dispersed_factor: 0.5,
                },
                ..Self::linear(0.025)
            },
            GroupKind::Centerpiece => Self {
                tilt: Some(Oscillation {
                    amplitude: 0.1,
                    frequency: 2.0,
                }),
                ..Self::linear(0.04)
            },
        }
    }

    /// Position blend rate for the particle at `index`.
    #[inline]
    pub fn blend_rate(&self, assembled: bool, index: usize) -> f32 {
        if assembled {
            self.blend_assembled + (index % 50) as f32 * self.blend_jitter
        } else {
            self.blend_dispersed
        }
    }

    /// Target scale for a particle whose base scale is `base`.
    #[inline]
    pub fn target_scale(&self, assembled: bool, base: f32) -> f32 {
        match self.scale {
            ScaleRule::Blend {
                dispersed_factor, ..
            } if !assembled => base * dispersed_factor,
            _ => base,
        }
    }

    fn validate(&self, group: GroupKind) -> Result<(), ConfigError> {
        config::rate("blend_assembled", self.blend_assembled)?;
        config::rate("blend_dispersed", self.blend_dispersed)?;
        let fastest = self.blend_assembled + 49.0 * self.blend_jitter;
        config::rate("blend_jitter", fastest)?;
        if let ScaleRule::Blend { rate, .. } = self.scale {
            config::rate("scale_blend", rate)?;
        }
        log::trace!("{} motion: {:?}", group.name(), self);
        Ok(())
    }
}

/// A homogeneous, fixed-size set of particles.
#[derive(Clone, Debug)]
pub struct ParticleGroup {
    kind: GroupKind,
    motion: Motion,
    pub(crate) particles: Vec<Particle>,
}

impl ParticleGroup {
    /// Generate the stock group of `kind` from `config`.
    pub fn generate<R: Rng + ?Sized>(
        kind: GroupKind,
        config: &SceneConfig,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let particles: Vec<Particle> = match kind.strategy() {
            Strategy::ConeVolume => (0..config.foliage_count)
                .map(|_| foliage(config, rng))
                .collect(),
            Strategy::Spiral => (0..config.ribbon_count)
                .map(|i| ribbon(config, i, rng))
                .collect(),
            Strategy::ConeSurface => {
                let (count, color) = if kind == GroupKind::Cubes {
                    (config.cube_count(), sampler::srgb_hex(0xE6E6FA))
                } else {
                    (config.polyhedron_count(), sampler::srgb_hex(0xFFFFFF))
                };
                (0..count).map(|_| ornament(config, color, rng)).collect()
            }
            Strategy::Singleton => vec![centerpiece(config)],
        };

        log::debug!("Generated {} {} particles", particles.len(), kind.name());
        Self::from_particles(kind, Motion::for_kind(kind), particles)
    }

    /// Build a group from explicit particles.
    ///
    /// Every particle is placed at its dispersed anchor, with the scale the
    /// motion rule targets while dispersed.
    pub fn from_particles(
        kind: GroupKind,
        motion: Motion,
        mut particles: Vec<Particle>,
    ) -> Result<Self, ConfigError> {
        if particles.is_empty() || (kind.strategy() == Strategy::Singleton && particles.len() != 1) {
            return Err(ConfigError::InvalidCount {
                group: kind.name(),
                count: particles.len(),
            });
        }
        motion.validate(kind)?;

        for p in &mut particles {
            if !(p.anchor_assembled.is_finite() && p.anchor_dispersed.is_finite()) {
                return Err(ConfigError::InvalidDimension {
                    name: "anchor",
                    value: f32::NAN,
                });
            }
            let scale = motion.target_scale(false, p.scale_base);
            p.pose = Pose {
                position: p.anchor_dispersed,
                scale: Vec3::splat(scale),
                ..p.pose
            };
        }

        Ok(Self {
            kind,
            motion,
            particles,
        })
    }

    /// Build a group from paired anchor lists with unit scale.
    pub fn from_anchors(
        kind: GroupKind,
        motion: Motion,
        assembled: &[Vec3],
        dispersed: &[Vec3],
    ) -> Result<Self, ConfigError> {
        if assembled.len() != dispersed.len() {
            return Err(ConfigError::InvalidCount {
                group: kind.name(),
                count: dispersed.len(),
            });
        }
        let particles = assembled
            .iter()
            .zip(dispersed)
            .map(|(&a, &d)| Particle::new(a, d, 1.0))
            .collect();
        Self::from_particles(kind, motion, particles)
    }

    #[inline]
    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    #[inline]
    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Read-only view of the particles, in index order.
    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Particle at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }
}

fn foliage<R: Rng + ?Sized>(config: &SceneConfig, rng: &mut R) -> Particle {
    let (assembled, _) = sampler::cone_point(rng, config.height, config.base_radius);
    let dispersed = sampler::sphere_point(rng, config.foliage_spread);
    let scale = rng.gen_range(0.05..0.2);
    let color = if rng.gen_bool(0.5) {
        sampler::srgb_hex(0xFFB7C5)
    } else {
        sampler::srgb_hex(0xFF69B4)
    };
    let spin = Vec3::new(
        rng.gen_range(0.0..0.02),
        rng.gen_range(0.0..0.02),
        rng.gen_range(0.0..0.02),
    );

    Particle::new(assembled, dispersed, scale)
        .with_color(color)
        .with_spin(spin)
        .with_phase(rng.gen_range(0.0..TAU))
}

fn ribbon<R: Rng + ?Sized>(config: &SceneConfig, index: usize, rng: &mut R) -> Particle {
    let t = index as f32 / config.ribbon_count as f32;
    let assembled = sampler::spiral_point(t, config.height, config.ribbon_radius(), config.ribbon_loops);
    let dispersed = sampler::sphere_point(rng, config.ribbon_spread);
    let scale = rng.gen_range(0.04..0.12);

    // The pulse travels along the ribbon, so the phase follows the index.
    Particle::new(assembled, dispersed, scale)
        .with_color(Vec3::ONE)
        .with_phase(index as f32 * 0.1)
}

fn ornament<R: Rng + ?Sized>(config: &SceneConfig, color: Vec3, rng: &mut R) -> Particle {
    let assembled =
        sampler::cone_surface_point(rng, config.height, config.base_radius, config.ornament_shell);
    let dispersed = sampler::sphere_point(rng, config.ornament_spread);
    let scale = rng.gen_range(0.1..0.25);
    let spin = rng.gen_range(0.0..0.02);

    Particle::new(assembled, dispersed, scale)
        .with_color(color)
        .with_spin(Vec3::new(spin, spin, 0.0))
}

fn centerpiece(config: &SceneConfig) -> Particle {
    let assembled = Vec3::new(0.0, config.height + 0.5, 0.0);
    let dispersed = Vec3::new(0.0, config.centerpiece_lift, 0.0);

    Particle::new(assembled, dispersed, 1.0)
        .with_color(sampler::srgb_hex(0xFFD700))
        .with_spin(Vec3::new(0.0, 0.02, 0.0))
}
