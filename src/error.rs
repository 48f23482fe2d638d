//! Error types for wave

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by entity/component bookkeeping
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// A component of this type is already attached to the entity
    #[error("entity already has a `{component}` component")]
    DuplicateComponent { component: &'static str },
}

/// Errors raised while loading `wave.toml`
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Errors raised by the GPU backend
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to open GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("failed to acquire frame: {0}")]
    Frame(#[from] wgpu::SurfaceError),

    #[error("text preparation failed: {0}")]
    TextPrepare(#[from] glyphon::PrepareError),

    #[error("text rendering failed: {0}")]
    TextRender(#[from] glyphon::RenderError),
}

/// Errors that abort the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

pub type Result<T, E = EcsError> = std::result::Result<T, E>;
