pub(crate) const SCENE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

/// Offscreen scene color that the melt pass samples from. Holding the view
/// is enough to keep its texture alive.
pub(crate) struct SceneTarget {
    pub(crate) view: wgpu::TextureView,
}

impl SceneTarget {
    pub(crate) fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        Self {
            view: scene_view(device, width, height),
        }
    }

    pub(crate) fn recreate(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.view = scene_view(device, width, height);
    }
}

fn scene_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    // Minimised windows report 0x0; wgpu rejects empty textures.
    let size = wgpu::Extent3d {
        width: width.max(1),
        height: height.max(1),
        depth_or_array_layers: 1,
    };
    device
        .create_texture(&wgpu::TextureDescriptor {
            label: Some("scene_tex"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: SCENE_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        })
        .create_view(&wgpu::TextureViewDescriptor {
            label: Some("scene_view"),
            ..Default::default()
        })
}
