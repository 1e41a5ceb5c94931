//! Headless GPU device initialization.
//!
//! Provides [`RenderContext`], which owns the wgpu instance, adapter, device and
//! queue used for offscreen rendering, and [`RenderContextError`] for clear
//! diagnostics when no usable GPU is found.

/// Error type for render context initialization failures.
#[derive(Debug, thiserror::Error)]
pub enum RenderContextError {
    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found")]
    NoAdapter,

    /// Failed to request GPU device.
    #[error("failed to request GPU device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),
}

/// Owns all GPU state needed for offscreen rendering. No surface is created.
pub struct RenderContext {
    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl RenderContext {
    /// Initialize a GPU device without a window.
    pub async fn new_headless() -> Result<Self, RenderContextError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| RenderContextError::NoAdapter)?;

        let info = adapter.get_info();
        log::info!(
            "Selected GPU: {} ({:?}, {:?})",
            info.name,
            info.backend,
            info.device_type
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("space3d-device"),
                required_features: wgpu::Features::empty(),
                required_limits: required_limits(&adapter.limits()),
                memory_hints: wgpu::MemoryHints::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        Ok(Self {
            instance,
            adapter,
            device,
            queue,
        })
    }

    /// Largest square texture this device can render into.
    pub fn max_texture_size(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }
}

/// Initialize a headless GPU synchronously using `pollster`.
pub fn init_headless_blocking() -> Result<RenderContext, RenderContextError> {
    pollster::block_on(RenderContext::new_headless())
}

/// Default limits, raised where the adapter allows so 4096px faces fit.
fn required_limits(adapter_limits: &wgpu::Limits) -> wgpu::Limits {
    let defaults = wgpu::Limits::default();
    wgpu::Limits {
        max_texture_dimension_2d: defaults
            .max_texture_dimension_2d
            .max(adapter_limits.max_texture_dimension_2d.min(16384)),
        max_buffer_size: defaults.max_buffer_size.max(adapter_limits.max_buffer_size),
        ..defaults
    }
}
