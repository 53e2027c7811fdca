//! # treemorph
//!
//! A procedurally generated particle tree that morphs between an assembled
//! cone and an exploded cloud.
//!
//! Every particle carries two fixed anchors: a point on the tree and a point
//! on a dispersal sphere. Each frame it eases toward whichever anchor the
//! current [`Mode`] selects, so switching modes morphs the whole tree smoothly
//! without ever recomputing a layout.
//!
//! ## Quick Start
//!
//! ```ignore
//! use treemorph::prelude::*;
//!
//! let mut scene = Scene::new(SceneConfig::default())?;
//! scene.set_mode(Mode::Dispersed);
//! for _ in 0..120 {
//!     scene.advance(1.0 / 60.0);
//! }
//! let instances = scene.snapshot();
//! ```
//!
//! ## Groups
//!
//! | Group | Anchors | Notes |
//! |-------|---------|-------|
//! | [`GroupKind::Foliage`] | inside the cone | hovers while assembled |
//! | [`GroupKind::Ribbon`] | helix around the cone | faces the trunk while assembled |
//! | [`GroupKind::Cubes`], [`GroupKind::Polyhedra`] | on the cone surface | shrink while dispersed |
//! | [`GroupKind::Centerpiece`] | above the apex | spins and tilts |
//!
//! ## Gesture control
//!
//! A [`GestureProducer`] runs a [`GestureSource`] on its own thread and
//! publishes readings into a [`LatestCell`]. Attach the cell with
//! [`Scene::attach_gesture`]: a pinch assembles the tree, an open hand
//! disperses it and steers its rotation with the pointer.

pub mod clock;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod gesture;
pub mod gpu;
pub mod group;
pub mod headless;
pub mod input;
pub mod particle;
pub mod sampler;
pub mod scene;
pub mod signal;
pub mod viewer;

pub use glam::{Mat4, Quat, Vec3};

pub use clock::FrameClock;
pub use config::SceneConfig;
pub use controller::{Mode, ModeController};
pub use engine::FrameContext;
pub use error::{ConfigError, GestureError, GpuError, ViewerError};
pub use gesture::{
    GestureProducer, GestureSample, GestureSource, HandLandmarks, HandTracker, PinchClassifier,
    PointerInput, PointerSource, SourceEvent, TrackerFrame, TrackerSource,
};
pub use group::{GroupKind, Motion, ParticleGroup, Strategy};
pub use particle::{Particle, Pose};
pub use scene::{InstanceRecord, RenderSink, Scene};
pub use signal::LatestCell;

/// Common imports.
pub mod prelude {
    pub use crate::config::SceneConfig;
    pub use crate::controller::Mode;
    pub use crate::gesture::{GestureProducer, GestureSample, GestureSource, SourceEvent};
    pub use crate::group::{GroupKind, ParticleGroup};
    pub use crate::scene::{InstanceRecord, RenderSink, Scene};
    pub use glam::{Mat4, Quat, Vec3};
}
