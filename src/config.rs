//! Scene configuration.
//!
//! Every field has a default matching the stock tree, so a config file only
//! needs to list what it changes:
//!
//! ```json
//! { "foliage_count": 2000, "ribbon_loops": 4.0, "seed": 42 }
//! ```

use crate::controller::Mode;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::fs;
use std::path::Path;

/// Complete scene configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// Height of the assembled cone (apex Y).
    pub height: f32,
    /// Radius of the cone at its base.
    pub base_radius: f32,

    /// Number of foliage particles.
    pub foliage_count: usize,
    /// Number of ribbon particles.
    pub ribbon_count: usize,
    /// Number of ornaments, split between cubes and polyhedra.
    pub ornament_count: usize,

    /// Radius of the dispersed sphere for foliage.
    pub foliage_spread: f32,
    /// Radius of the dispersed sphere for the ribbon.
    pub ribbon_spread: f32,
    /// Radius of the dispersed sphere for ornaments.
    pub ornament_spread: f32,
    /// Height the centerpiece floats to while dispersed.
    pub centerpiece_lift: f32,

    /// Full turns of the ribbon helix.
    pub ribbon_loops: f32,
    /// How much wider than the cone the ribbon helix starts.
    pub ribbon_flare: f32,
    /// Radial jitter of ornaments outside the cone surface.
    pub ornament_shell: f32,

    /// Per-frame smoothing toward the gesture rotation target.
    pub rotation_smoothing: f32,
    /// Peak angle of the autonomous sway, in radians.
    pub sway_amplitude: f32,
    /// Angular frequency of the autonomous sway, in radians per second.
    pub sway_frequency: f32,
    /// Translation applied to the whole assembly.
    pub assembly_offset: [f32; 3],

    /// Thumb-to-index distance below which a hand counts as pinching.
    pub pinch_threshold: f32,
    /// Rotation covered by sweeping the pointer across the full frame.
    pub rotation_span: f32,

    /// Mode the controller starts in.
    pub initial_mode: Mode,
    /// Seed for the layout; `None` draws a fresh layout every run.
    pub seed: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            height: 9.0,
            base_radius: 3.5,
            foliage_count: 4500,
            ribbon_count: 1500,
            ornament_count: 800,
            foliage_spread: 15.0,
            ribbon_spread: 20.0,
            ornament_spread: 18.0,
            centerpiece_lift: 30.0,
            ribbon_loops: 6.0,
            ribbon_flare: 0.5,
            ornament_shell: 0.2,
            rotation_smoothing: 0.1,
            sway_amplitude: 0.2,
            sway_frequency: 0.1,
            assembly_offset: [0.0, -3.5, 0.0],
            pinch_threshold: 0.08,
            rotation_span: 4.0 * PI,
            initial_mode: Mode::Assembled,
            seed: None,
        }
    }
}

impl SceneConfig {
    /// Load and validate a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        log::info!("Loaded scene config from {}", path.display());
        Ok(config)
    }

    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Number of ornament cubes.
    pub fn cube_count(&self) -> usize {
        self.ornament_count / 2
    }

    /// Number of ornament polyhedra.
    pub fn polyhedron_count(&self) -> usize {
        self.ornament_count - self.cube_count()
    }

    /// Spiral base radius of the ribbon.
    pub fn ribbon_radius(&self) -> f32 {
        self.base_radius + self.ribbon_flare
    }

    /// Reject configurations no tree can be built from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("height", self.height)?;
        positive("base_radius", self.base_radius)?;
        positive("foliage_spread", self.foliage_spread)?;
        positive("ribbon_spread", self.ribbon_spread)?;
        positive("ornament_spread", self.ornament_spread)?;
        finite("centerpiece_lift", self.centerpiece_lift)?;
        non_negative("ribbon_loops", self.ribbon_loops)?;
        non_negative("ribbon_flare", self.ribbon_flare)?;
        non_negative("ornament_shell", self.ornament_shell)?;
        rate("rotation_smoothing", self.rotation_smoothing)?;
        finite("sway_amplitude", self.sway_amplitude)?;
        finite("sway_frequency", self.sway_frequency)?;
        for v in self.assembly_offset {
            finite("assembly_offset", v)?;
        }
        positive("pinch_threshold", self.pinch_threshold)?;
        finite("rotation_span", self.rotation_span)?;

        count("foliage", self.foliage_count, 1)?;
        count("ribbon", self.ribbon_count, 1)?;
        // Both ornament kinds need at least one instance.
        count("ornaments", self.ornament_count, 2)?;
        Ok(())
    }
}

fn finite(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidDimension { name, value })
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidDimension { name, value })
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(name, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidDimension { name, value })
    }
}

/// Blend coefficients live in `(0, 1]`.
pub(crate) fn rate(name: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(name, value)?;
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidDimension { name, value })
    }
}

fn count(group: &'static str, count: usize, min: usize) -> Result<(), ConfigError> {
    if count >= min {
        Ok(())
    } else {
        Err(ConfigError::InvalidCount { group, count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SceneConfig::default();
        config.validate().unwrap();
        assert_eq!(config.cube_count(), 400);
        assert_eq!(config.polyhedron_count(), 400);
        assert!((config.ribbon_radius() - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_odd_ornament_split() {
        let config = SceneConfig {
            ornament_count: 7,
            ..Default::default()
        };
        assert_eq!(config.cube_count() + config.polyhedron_count(), 7);
    }

    #[test]
    fn test_negative_radius_rejected() {
        let config = SceneConfig {
            base_radius: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDimension { name: "base_radius", .. })
        ));
    }

    #[test]
    fn test_nan_spread_rejected() {
        let config = SceneConfig {
            ribbon_spread: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_group_rejected() {
        let config = SceneConfig {
            foliage_count: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidCount { group: "foliage", count: 0 })
        ));
    }

    #[test]
    fn test_smoothing_must_be_a_rate() {
        let config = SceneConfig {
            rotation_smoothing: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SceneConfig =
            serde_json::from_str(r#"{ "foliage_count": 10, "seed": 3 }"#).unwrap();
        assert_eq!(config.foliage_count, 10);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.ribbon_count, 1500);
        assert_eq!(config.initial_mode, Mode::Assembled);
    }
}
