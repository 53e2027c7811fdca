//! Discrete mode and rotation target.
//!
//! The controller is written from two places: the manual toggle and the
//! gesture feed. Both overwrite state, last writer wins. A sample that fails
//! validation is dropped and the previous state stays in place, so a bad
//! reading can never reach the particle transforms.

use crate::error::GestureError;
use crate::gesture::GestureSample;
use serde::{Deserialize, Serialize};

/// Which anchor every particle eases toward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Particles gather into the tree.
    Assembled,
    /// Particles scatter over their spheres.
    Dispersed,
}

impl Mode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            Mode::Assembled => Mode::Dispersed,
            Mode::Dispersed => Mode::Assembled,
        }
    }

    /// Whether particles currently target their assembled anchors.
    #[inline]
    pub fn is_assembled(self) -> bool {
        self == Mode::Assembled
    }
}

/// Map a normalized pointer x to a rotation angle.
///
/// The camera image is mirrored, so the left edge of the frame (`x = 1`)
/// turns the assembly one way and the right edge the other.
#[inline]
pub fn pointer_rotation(pointer_x: f32, span: f32) -> f32 {
    ((1.0 - pointer_x) - 0.5) * span
}

/// One exponential smoothing step of `current` toward `target`.
#[inline]
pub fn smooth_toward(current: f32, target: f32, k: f32) -> f32 {
    current + (target - current) * k
}

/// Holds the current mode and rotation target.
#[derive(Clone, Debug)]
pub struct ModeController {
    mode: Mode,
    rotation_target: f32,
    rotation_span: f32,
    transitions: u64,
}

impl ModeController {
    /// Create a controller in `initial` mode with a zero rotation target.
    pub fn new(initial: Mode, rotation_span: f32) -> Self {
        Self {
            mode: initial,
            rotation_target: 0.0,
            rotation_span,
            transitions: 0,
        }
    }

    /// Current mode.
    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Current rotation target in radians.
    #[inline]
    pub fn rotation_target(&self) -> f32 {
        self.rotation_target
    }

    /// Number of actual mode changes so far.
    #[inline]
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Overwrite the mode.
    ///
    /// Returns `true` only when the mode actually changed; setting the mode
    /// it is already in has no effect.
    pub fn set_mode(&mut self, mode: Mode) -> bool {
        if self.mode == mode {
            return false;
        }
        log::info!("Mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        self.transitions += 1;
        true
    }

    /// Flip between assembled and dispersed. Returns the new mode.
    pub fn toggle(&mut self) -> Mode {
        self.set_mode(self.mode.toggled());
        self.mode
    }

    /// Overwrite the rotation target. Non-finite angles are rejected.
    pub fn set_rotation_target(&mut self, angle: f32) -> Result<(), GestureError> {
        if !angle.is_finite() {
            return Err(GestureError::NonFinite { field: "rotation" });
        }
        self.rotation_target = angle;
        Ok(())
    }

    /// Apply one gesture reading.
    ///
    /// Pinching selects [`Mode::Assembled`] and leaves the rotation target
    /// alone; an open hand selects [`Mode::Dispersed`] and steers the rotation
    /// from the pointer position. Returns whether the mode changed.
    pub fn apply_gesture(&mut self, sample: GestureSample) -> Result<bool, GestureError> {
        sample.validate()?;

        if sample.pinching {
            Ok(self.set_mode(Mode::Assembled))
        } else {
            self.set_rotation_target(pointer_rotation(sample.pointer_x, self.rotation_span))?;
            Ok(self.set_mode(Mode::Dispersed))
        }
    }
}
