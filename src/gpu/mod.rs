//! wgpu backend: one surface per window, rebuilt from scratch after a loss.

pub mod context;
pub mod target;

pub use context::GpuContext;
pub use target::{GpuBitmap, GpuTarget};

use std::sync::Arc;
use winit::window::Window;

use crate::error::ViewerError;
use crate::traits::{TargetFactory, Viewport};

/// Builds a fresh [`GpuTarget`] for a window each time one is needed
pub struct GpuFactory {
    window: Arc<Window>,
}

impl GpuFactory {
    pub fn new(window: Arc<Window>) -> Self {
        Self { window }
    }
}

impl TargetFactory for GpuFactory {
    type Target = GpuTarget;

    fn create_target(&mut self, viewport: Viewport) -> Result<GpuTarget, ViewerError> {
        GpuTarget::new(self.window.clone(), viewport)
    }
}
