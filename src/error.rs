use std::path::PathBuf;
use thiserror::Error;

/// Everything that can stop the viewer, from bad arguments to a failed GPU call.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("Usage:\n  image-viewer <image_path> [--max N]")]
    Usage,

    #[error("File not found:\n{}", .0.display())]
    FileNotFound(PathBuf),

    #[error("cannot decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("bitmap creation rejected: {0}")]
    Bitmap(String),

    #[error("cannot create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable graphics adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    #[error("cannot create graphics device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,

    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("cannot create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

impl ViewerError {
    /// Process exit status for this error. Never zero.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Usage | Self::FileNotFound(_) => 1,
            Self::Decode { source, .. } => match source {
                image::ImageError::IoError(io) => os_code(io).unwrap_or(3),
                _ => 2,
            },
            Self::Io { source, .. } => os_code(source).unwrap_or(3),
            Self::Bitmap(_) => 4,
            Self::CreateSurface(_)
            | Self::RequestAdapter(_)
            | Self::RequestDevice(_)
            | Self::NoSurfaceFormat => 5,
            Self::Surface(_) => 6,
            Self::Window(_) | Self::EventLoop(_) => 7,
        }
    }

    /// Name of the operation that failed, as shown in the error dialog.
    pub fn step(&self) -> &'static str {
        match self {
            Self::Usage => "Argument parsing",
            Self::FileNotFound(_) => "File lookup",
            Self::Decode { .. } => "Image decode",
            Self::Io { .. } => "Image read",
            Self::Bitmap(_) => "Bitmap creation",
            Self::CreateSurface(_) => "Surface creation",
            Self::RequestAdapter(_) => "Adapter request",
            Self::RequestDevice(_) => "Device request",
            Self::NoSurfaceFormat => "Surface configuration",
            Self::Surface(_) => "Frame presentation",
            Self::Window(_) => "Window creation",
            Self::EventLoop(_) => "Event loop",
        }
    }

    /// Startup errors happen before any window exists.
    pub fn is_startup(&self) -> bool {
        matches!(self, Self::Usage | Self::FileNotFound(_))
    }
}

fn os_code(err: &std::io::Error) -> Option<u8> {
    err.raw_os_error()
        .map(|code| code.clamp(1, u8::MAX as i32) as u8)
}
