//! Error types for treemorph.
//!
//! Configuration problems are fatal at construction time, gesture problems are
//! dropped inside the frame loop, and GPU/window problems end the viewer.

use thiserror::Error;

/// Errors raised while loading or validating a [`SceneConfig`](crate::SceneConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or write the config file.
    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid JSON for a scene.
    #[error("Failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    /// A particle group was given a count it cannot be built with.
    #[error("Invalid particle count for {group}: {count}")]
    InvalidCount {
        /// Name of the offending group.
        group: &'static str,
        /// Requested count.
        count: usize,
    },

    /// A radius, height or rate is non-finite or outside its allowed range.
    #[error("Invalid value for {name}: {value}")]
    InvalidDimension {
        /// Name of the offending parameter.
        name: &'static str,
        /// Offending value.
        value: f32,
    },
}

/// Reasons a gesture sample or rotation target is rejected.
///
/// A rejected sample leaves the controller untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GestureError {
    /// The value is NaN or infinite.
    #[error("Gesture {field} is not finite")]
    NonFinite {
        /// Name of the offending field.
        field: &'static str,
    },

    /// The value lies outside its normalized range.
    #[error("Gesture {field} out of range: {value}")]
    OutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// Offending value.
        value: f32,
    },
}

/// Errors that can occur during GPU initialization.
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("Failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),

    /// No compatible GPU adapter found.
    #[error("No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support.")]
    NoAdapter,

    /// The surface reports no texture format the adapter can present.
    #[error("Surface has no supported texture format")]
    NoSurfaceFormat,

    /// Failed to create GPU device.
    #[error("Failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
}

/// Errors that can occur when running the windowed viewer.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// Failed to create event loop.
    #[error("Failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// Failed to create window.
    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),

    /// The scene could not be built.
    #[error("Scene error: {0}")]
    Config(#[from] ConfigError),
}
