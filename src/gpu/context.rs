use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use wgpu::{Adapter, Device, DeviceDescriptor, Features, Instance, Limits, Queue, Surface};
use winit::window::Window;

use crate::error::ViewerError;

/// Everything a window surface needs from the GPU, created together and
/// dropped together.
pub struct GpuContext {
    pub surface: Surface<'static>,
    pub adapter: Adapter,
    pub device: Device,
    pub queue: Queue,
    lost: Arc<AtomicBool>,
}

impl GpuContext {
    /// Create a GPU context compatible with the window's surface
    pub fn new(window: Arc<Window>) -> Result<Self, ViewerError> {
        let instance = Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;
        let adapter = pollster::block_on(Self::request_adapter(&instance, &surface))?;
        let (device, queue) = pollster::block_on(Self::request_device(&adapter))?;

        let info = adapter.get_info();
        log::info!("using {} ({:?})", info.name, info.backend);

        let lost = Arc::new(AtomicBool::new(false));
        let flag = lost.clone();
        device.set_device_lost_callback(move |reason, message| {
            if !matches!(reason, wgpu::DeviceLostReason::Destroyed) {
                log::warn!("graphics device lost ({:?}): {}", reason, message);
            }
            flag.store(true, Ordering::Release);
        });

        Ok(Self {
            surface,
            adapter,
            device,
            queue,
            lost,
        })
    }

    /// Whether the device reported a loss since creation
    pub fn is_lost(&self) -> bool {
        self.lost.load(Ordering::Acquire)
    }

    /// Request adapter with surface compatibility
    async fn request_adapter(
        instance: &Instance,
        surface: &Surface<'_>,
    ) -> Result<Adapter, ViewerError> {
        Ok(instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(surface),
                force_fallback_adapter: false,
            })
            .await?)
    }

    /// Request device and queue
    async fn request_device(adapter: &Adapter) -> Result<(Device, Queue), ViewerError> {
        // Large photos need the adapter's real texture limit, not the default 8192.
        let limits = Limits::downlevel_webgl2_defaults().using_resolution(adapter.limits());

        Ok(adapter
            .request_device(&DeviceDescriptor {
                label: Some("Viewer Device"),
                required_features: Features::empty(),
                required_limits: limits,
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                experimental_features: Default::default(),
                trace: Default::default(),
            })
            .await?)
    }
}
