use crate::error::BackendError;
use crate::gpu::WgpuBackend;
use cubes_render::Presenter;

/// Owns the window surface and the device it is configured against.
pub struct SurfacePresenter {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
}

impl SurfacePresenter {
    pub fn config(&self) -> &wgpu::SurfaceConfiguration {
        &self.config
    }

    fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.config);
    }
}

impl Presenter<WgpuBackend> for SurfacePresenter {
    fn present(&mut self, backend: &mut WgpuBackend) {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::debug!("surface lost, reconfiguring");
                self.reconfigure();
                backend.discard_frame();
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                backend.discard_frame();
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        backend.submit(&self.device, &self.queue, &view);
        output.present();
    }
}

/// Prefer a non-sRGB format: clear colors and alpha blending operate on the
/// stored values directly, without linear-space conversion.
fn pick_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .find(|f| !f.is_srgb())
        .or_else(|| formats.first())
        .copied()
}

/// Pick an adapter for `surface`, create the device and configure the surface
/// at `width` x `height`.
pub fn init_surface(
    instance: &wgpu::Instance,
    surface: wgpu::Surface<'static>,
    width: u32,
    height: u32,
) -> Result<(WgpuBackend, SurfacePresenter), BackendError> {
    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::HighPerformance,
        compatible_surface: Some(&surface),
        force_fallback_adapter: false,
    }))
    .ok_or(BackendError::NoAdapter)?;

    let (device, queue) = pollster::block_on(adapter.request_device(
        &wgpu::DeviceDescriptor {
            label: Some("cubes_device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: Default::default(),
        },
        None,
    ))?;

    let caps = surface.get_capabilities(&adapter);
    let format = pick_format(&caps.formats).ok_or(BackendError::NoSurfaceFormat)?;

    let config = wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: width.max(1),
        height: height.max(1),
        present_mode: wgpu::PresentMode::AutoVsync,
        alpha_mode: caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto),
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    };
    surface.configure(&device, &config);

    let backend = WgpuBackend::new(&device, format, config.width, config.height);

    tracing::info!(
        "GPU initialized with {} backend, format {:?}",
        adapter.get_info().backend.to_str(),
        format
    );

    Ok((
        backend,
        SurfacePresenter {
            surface,
            device,
            queue,
            config,
        },
    ))
}
