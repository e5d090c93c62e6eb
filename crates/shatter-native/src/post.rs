//! HDR scene target plus bloom and vignette passes.
//!
//! The scene renders into a full-resolution `Rgba16Float` target. A bright
//! pass writes half-resolution `bloom_a`, two separable blur passes ping-pong
//! through `bloom_b` back into `bloom_a`, and the composite adds the glow,
//! applies the vignette and writes the swapchain.

use shatter_core::{Bloom, Vignette};

pub const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PostUniforms {
    pub resolution: [f32; 2],
    pub blur_dir: [f32; 2],
    pub bloom: [f32; 4],
    pub vignette: [f32; 4],
}

impl PostUniforms {
    pub fn new(resolution: [f32; 2], blur_dir: [f32; 2], bloom: &Bloom, vignette: &Vignette) -> Self {
        Self {
            resolution,
            blur_dir,
            bloom: [bloom.intensity, bloom.threshold, bloom.smoothing, 0.0],
            vignette: [vignette.offset, vignette.darkness, 0.0, 0.0],
        }
    }
}

fn create_color_texture(
    device: &wgpu::Device,
    label: &str,
    width: u32,
    height: u32,
) -> wgpu::TextureView {
    let tex = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: HDR_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    tex.create_view(&wgpu::TextureViewDescriptor::default())
}

fn make_post_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    frag_entry: &str,
    color_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(frag_entry),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_fullscreen"),
            buffers: &[],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(frag_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    })
}

fn texture_entries(first_binding: u32) -> [wgpu::BindGroupLayoutEntry; 2] {
    [
        wgpu::BindGroupLayoutEntry {
            binding: first_binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                multisampled: false,
                view_dimension: wgpu::TextureViewDimension::D2,
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
            },
            count: None,
        },
        wgpu::BindGroupLayoutEntry {
            binding: first_binding + 1,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        },
    ]
}

/// Views and bind groups that depend on the surface size.
struct Targets {
    hdr_view: wgpu::TextureView,
    bloom_a_view: wgpu::TextureView,
    bloom_b_view: wgpu::TextureView,
    bg_hdr: wgpu::BindGroup,
    bg_from_bloom_a: wgpu::BindGroup,
    bg_from_bloom_b: wgpu::BindGroup,
    bg_bloom_a_only: wgpu::BindGroup,
    bloom_size: [f32; 2],
}

pub struct PostChain {
    bgl0: wgpu::BindGroupLayout, // tex+sampler+uniform
    bgl1: wgpu::BindGroupLayout, // tex+sampler
    sampler: wgpu::Sampler,
    // one uniform buffer per pass; writes queued in the same frame must not alias
    base_uniforms: wgpu::Buffer,
    blur_h_uniforms: wgpu::Buffer,
    blur_v_uniforms: wgpu::Buffer,
    bright_pipeline: wgpu::RenderPipeline,
    blur_pipeline: wgpu::RenderPipeline,
    composite_pipeline: wgpu::RenderPipeline,
    targets: Targets,
}

impl PostChain {
    pub fn new(device: &wgpu::Device, swap_format: wgpu::TextureFormat, width: u32, height: u32) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("post_shader"),
            source: wgpu::ShaderSource::Wgsl(shatter_core::POST_WGSL.into()),
        });
        let [tex0, samp0] = texture_entries(0);
        let bgl0 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("post_bgl0"),
            entries: &[
                tex0,
                samp0,
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });
        let bgl1 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("post_bgl1"),
            entries: &texture_entries(0),
        });
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let uniform_buffer = |label| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size: std::mem::size_of::<PostUniforms>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };
        let base_uniforms = uniform_buffer("post_uniforms");
        let blur_h_uniforms = uniform_buffer("blur_h_uniforms");
        let blur_v_uniforms = uniform_buffer("blur_v_uniforms");

        let pl_bright_blur = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_post_0"),
            bind_group_layouts: &[&bgl0],
            push_constant_ranges: &[],
        });
        let pl_composite = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_post_comp"),
            bind_group_layouts: &[&bgl0, &bgl1],
            push_constant_ranges: &[],
        });
        let bright_pipeline =
            make_post_pipeline(device, &pl_bright_blur, &shader, "fs_bright", HDR_FORMAT);
        let blur_pipeline = make_post_pipeline(device, &pl_bright_blur, &shader, "fs_blur", HDR_FORMAT);
        let composite_pipeline =
            make_post_pipeline(device, &pl_composite, &shader, "fs_composite", swap_format);

        let targets = Self::build_targets(
            device,
            &bgl0,
            &bgl1,
            &sampler,
            [&base_uniforms, &blur_h_uniforms, &blur_v_uniforms],
            width,
            height,
        );

        Self {
            bgl0,
            bgl1,
            sampler,
            base_uniforms,
            blur_h_uniforms,
            blur_v_uniforms,
            bright_pipeline,
            blur_pipeline,
            composite_pipeline,
            targets,
        }
    }

    fn build_targets(
        device: &wgpu::Device,
        bgl0: &wgpu::BindGroupLayout,
        bgl1: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        [base, blur_h, blur_v]: [&wgpu::Buffer; 3],
        width: u32,
        height: u32,
    ) -> Targets {
        let bw = (width.max(1) / 2).max(1);
        let bh = (height.max(1) / 2).max(1);
        let hdr_view = create_color_texture(device, "hdr_tex", width.max(1), height.max(1));
        let bloom_a_view = create_color_texture(device, "bloom_a", bw, bh);
        let bloom_b_view = create_color_texture(device, "bloom_b", bw, bh);

        let with_uniforms = |label, view: &wgpu::TextureView, uniforms: &wgpu::Buffer| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: bgl0,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: uniforms.as_entire_binding(),
                    },
                ],
            })
        };
        let bg_hdr = with_uniforms("bg_hdr", &hdr_view, base);
        let bg_from_bloom_a = with_uniforms("bg_from_bloom_a", &bloom_a_view, blur_h);
        let bg_from_bloom_b = with_uniforms("bg_from_bloom_b", &bloom_b_view, blur_v);
        let bg_bloom_a_only = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg_bloom_a_only"),
            layout: bgl1,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&bloom_a_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        Targets {
            hdr_view,
            bloom_a_view,
            bloom_b_view,
            bg_hdr,
            bg_from_bloom_a,
            bg_from_bloom_b,
            bg_bloom_a_only,
            bloom_size: [bw as f32, bh as f32],
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.targets = Self::build_targets(
            device,
            &self.bgl0,
            &self.bgl1,
            &self.sampler,
            [&self.base_uniforms, &self.blur_h_uniforms, &self.blur_v_uniforms],
            width,
            height,
        );
    }

    /// Scene passes render here instead of the swapchain.
    pub fn hdr_view(&self) -> &wgpu::TextureView {
        &self.targets.hdr_view
    }

    pub fn write_uniforms(&self, queue: &wgpu::Queue, bloom: &Bloom, vignette: &Vignette) {
        let res = self.targets.bloom_size;
        for (buffer, dir) in [
            (&self.base_uniforms, [0.0, 0.0]),
            (&self.blur_h_uniforms, [1.0, 0.0]),
            (&self.blur_v_uniforms, [0.0, 1.0]),
        ] {
            let u = PostUniforms::new(res, dir, bloom, vignette);
            queue.write_buffer(buffer, 0, bytemuck::bytes_of(&u));
        }
    }

    /// Bright pass, separable blur and composite onto `target`.
    pub fn run(&self, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView) {
        let t = &self.targets;
        blit(encoder, "bright_pass", &t.bloom_a_view, &self.bright_pipeline, &t.bg_hdr, None);
        blit(encoder, "blur_h", &t.bloom_b_view, &self.blur_pipeline, &t.bg_from_bloom_a, None);
        blit(encoder, "blur_v", &t.bloom_a_view, &self.blur_pipeline, &t.bg_from_bloom_b, None);
        blit(
            encoder,
            "composite",
            target,
            &self.composite_pipeline,
            &t.bg_hdr,
            Some(&t.bg_bloom_a_only),
        );
    }
}

fn blit(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    target: &wgpu::TextureView,
    pipeline: &wgpu::RenderPipeline,
    bg0: &wgpu::BindGroup,
    bg1: Option<&wgpu::BindGroup>,
) {
    let mut r = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
    r.set_pipeline(pipeline);
    r.set_bind_group(0, bg0, &[]);
    if let Some(g1) = bg1 {
        r.set_bind_group(1, g1, &[]);
    }
    r.draw(0..3, 0..1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_uniforms_match_wgsl_layout() {
        // vec2 + vec2 + vec4 + vec4
        assert_eq!(std::mem::size_of::<PostUniforms>(), 48);
        let u = PostUniforms::new([640.0, 360.0], [1.0, 0.0], &Bloom::default(), &Vignette::default());
        assert_eq!(u.bloom[0], shatter_core::BLOOM_INTENSITY);
        assert_eq!(u.vignette[1], shatter_core::VIGNETTE_DARKNESS);
    }
}
