use std::time::{SystemTime, UNIX_EPOCH};
use wgpu::util::DeviceExt;
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{Key, NamedKey},
    window::WindowBuilder,
};

use rand::{rngs::StdRng, SeedableRng};
use shatter_core::{
    Backdrop, Bloom, CameraRig, CoreAppearance, Fog, FrameClock, InstanceBuffer, InstanceRaw,
    LightLevels, ScrollState, SimParams, Simulation, ViewportClass, Vignette, BACKDROP_COUNT,
    BACKGROUND_RGB, CORE_RADIUS, DESKTOP_CAPACITY, FRAGMENT_SIZE, GROUND_SIZE,
};

mod mesh;
mod post;

use mesh::Vertex;
use post::{PostChain, HDR_FORMAT};

// Virtual document height, in viewports (hero + info sections + footer)
const PAGES: f32 = 3.0;
const WHEEL_LINE_PX: f32 = 60.0;
const ARROW_STEP_PX: f32 = 40.0;

const CLEAR: wgpu::Color = wgpu::Color {
    r: BACKGROUND_RGB[0] as f64,
    g: BACKGROUND_RGB[1] as f64,
    b: BACKGROUND_RGB[2] as f64,
    a: 1.0,
};
const FRAGMENT_COLOR: [f32; 4] = [0.878, 0.949, 0.996, 1.0];
const ACCENT_RGB: [f32; 3] = [0.22, 0.74, 0.97];
const EMISSIVE_RGB: [f32; 3] = [0.055, 0.647, 0.914];
const FRAGMENT_EMISSIVE: f32 = 0.65;
const GROUND_COLOR: [f32; 4] = [BACKGROUND_RGB[0], BACKGROUND_RGB[1], BACKGROUND_RGB[2], 1.0];

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    color: [f32; 4],
    emissive: [f32; 4],
    lights: [f32; 4],
    eye: [f32; 4],
    forward: [f32; 4],
    fog_color: [f32; 4],
    fog_range: [f32; 4],
}

/// Per-frame values shared by every draw.
struct FrameUniforms {
    view_proj: [[f32; 4]; 4],
    lights: [f32; 4],
    eye: [f32; 4],
    forward: [f32; 4],
    fog_color: [f32; 4],
    fog_range: [f32; 4],
}

impl FrameUniforms {
    fn new(camera: &shatter_core::Camera, lights: &LightLevels, fog: &Fog) -> Self {
        let forward = (camera.target - camera.eye).normalize_or_zero();
        let [fr, fg, fb] = fog.color;
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            lights: [lights.key, lights.fill, lights.rim, 0.0],
            eye: camera.eye.extend(1.0).to_array(),
            forward: forward.extend(0.0).to_array(),
            fog_color: [fr, fg, fb, 1.0],
            fog_range: [fog.near, fog.far, 0.0, 0.0],
        }
    }

    fn for_draw(&self, color: [f32; 4], emissive: [f32; 4]) -> Uniforms {
        Uniforms {
            view_proj: self.view_proj,
            color,
            emissive,
            lights: self.lights,
            eye: self.eye,
            forward: self.forward,
            fog_color: self.fog_color,
            fog_range: self.fog_range,
        }
    }
}

/// Scroll distance in logical pixels for one wheel event.
///
/// Touchpads report physical pixels, so they are divided by the window's
/// scale factor to match the logical viewport height the scroll state uses.
fn wheel_scroll_px(delta: MouseScrollDelta, scale_factor: f64) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => -y * WHEEL_LINE_PX,
        MouseScrollDelta::PixelDelta(p) => (-p.y / scale_factor.max(f64::EPSILON)) as f32,
    }
}

/// One instanced draw: a mesh, its per-draw uniforms and its instances.
struct DrawSlot {
    mesh_vb: wgpu::Buffer,
    vertex_count: u32,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    instance_vb: wgpu::Buffer,
    instance_capacity: usize,
    instance_count: u32,
}

impl DrawSlot {
    fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        vertices: &[Vertex],
        instance_capacity: usize,
    ) -> Self {
        let mesh_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: std::mem::size_of::<Uniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        Self {
            mesh_vb,
            vertex_count: vertices.len() as u32,
            uniform_buffer,
            bind_group,
            instance_vb: create_instance_buffer(device, label, instance_capacity),
            instance_capacity,
            instance_count: 0,
        }
    }

    fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, instances: &InstanceBuffer) {
        if instances.capacity() > self.instance_capacity {
            self.instance_capacity = instances.capacity();
            self.instance_vb = create_instance_buffer(device, "instances", self.instance_capacity);
        }
        if !instances.is_empty() {
            queue.write_buffer(&self.instance_vb, 0, instances.as_bytes());
        }
        self.instance_count = instances.len() as u32;
    }

    fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        if self.instance_count == 0 {
            return;
        }
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.mesh_vb.slice(..));
        rpass.set_vertex_buffer(1, self.instance_vb.slice(..));
        rpass.draw(0..self.vertex_count, 0..self.instance_count);
    }
}

fn create_instance_buffer(device: &wgpu::Device, label: &str, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: (std::mem::size_of::<InstanceRaw>() * capacity.max(1)) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let tex = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    tex.create_view(&wgpu::TextureViewDescriptor::default())
}

fn depth_state(depth_write_enabled: bool) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

fn make_scene_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    label: &str,
    depth_write_enabled: bool,
) -> wgpu::RenderPipeline {
    let vertex_buffers = [
        // slot 0: mesh position + normal
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 12,
                    shader_location: 1,
                },
            ],
        },
        // slot 1: per-instance model matrix columns
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: 0,
                    shader_location: 2,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: 16,
                    shader_location: 3,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: 32,
                    shader_location: 4,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: 48,
                    shader_location: 5,
                },
            ],
        },
    ];
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &vertex_buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: Some(depth_state(depth_write_enabled)),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: HDR_FORMAT,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    })
}

/// Scene state owned by the frame loop.
struct Scene {
    sim: Simulation,
    rig: CameraRig,
    backdrop: Backdrop,
    backdrop_instances: InstanceBuffer,
    ground_instance: InstanceBuffer,
    core_instance: InstanceBuffer,
    scroll: ScrollState,
    clock: FrameClock,
}

impl Scene {
    fn new(seed: u64, width_px: f32, height_px: f32) -> anyhow::Result<Self> {
        let class = ViewportClass::from_width(width_px);
        let sim = Simulation::new(class.capacity(), SimParams::default(), seed)?;
        let mut rng = StdRng::seed_from_u64(seed.rotate_left(17));
        let mut core_instance = InstanceBuffer::new(1);
        core_instance.write(std::iter::once(glam::Mat4::IDENTITY));
        let mut ground_instance = InstanceBuffer::new(1);
        ground_instance.write(std::iter::once(glam::Mat4::from_translation(
            glam::Vec3::Y * sim.params().ground_y,
        )));
        Ok(Self {
            sim,
            rig: CameraRig::default(),
            backdrop: Backdrop::new(&mut rng),
            backdrop_instances: InstanceBuffer::new(BACKDROP_COUNT),
            ground_instance,
            core_instance,
            scroll: ScrollState::new(height_px * PAGES, height_px),
            clock: FrameClock::new(),
        })
    }

    fn resize(&mut self, width_px: f32, height_px: f32) {
        let class = ViewportClass::from_width(width_px);
        if self.sim.set_capacity(class.capacity()) {
            log::info!("viewport {:.0}px is {:?}", width_px, class);
        }
        self.scroll.resize(height_px, PAGES);
    }

    fn handle_wheel(&mut self, delta: MouseScrollDelta, scale_factor: f64) {
        self.scroll.scroll_by(wheel_scroll_px(delta, scale_factor));
    }

    fn handle_key(&mut self, key: &Key, viewport_height: f32) {
        match key {
            Key::Named(NamedKey::PageDown) | Key::Named(NamedKey::Space) => {
                self.scroll.scroll_by(viewport_height * 0.9)
            }
            Key::Named(NamedKey::PageUp) => self.scroll.scroll_by(-viewport_height * 0.9),
            Key::Named(NamedKey::ArrowDown) => self.scroll.scroll_by(ARROW_STEP_PX),
            Key::Named(NamedKey::ArrowUp) => self.scroll.scroll_by(-ARROW_STEP_PX),
            Key::Named(NamedKey::Home) => self.scroll.scroll_to(0.0),
            Key::Named(NamedKey::End) => self.scroll.scroll_to(f32::MAX),
            _ => {}
        }
    }

    fn advance(&mut self) {
        let time = self.clock.tick();
        let progress = self.scroll.progress();
        let intensity = self.scroll.intensity();
        // the simulation sanitizes its own delta; everything else takes the clamped step
        self.sim.update(intensity, time.delta, time.elapsed);
        let delta = time.step();
        self.rig.update(intensity, delta);
        self.backdrop.update(progress, delta);
        self.backdrop.emit(&mut self.backdrop_instances, progress);
    }
}

struct GpuState<'w> {
    window: &'w winit::window::Window,
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    // depth-tested without depth writes, for the translucent particle field
    backdrop_pipeline: wgpu::RenderPipeline,
    depth_view: wgpu::TextureView,
    post: PostChain,
    backdrop: DrawSlot,
    ground: DrawSlot,
    fragments: DrawSlot,
    core: DrawSlot,
    scene: Scene,
}

impl<'w> GpuState<'w> {
    async fn new(window: &'w winit::window::Window, scene: Scene) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps.formats[0];
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            desired_maximum_frame_latency: 2,
            view_formats: vec![],
        };
        surface.configure(&device, &config);
        let depth_view = create_depth_view(&device, config.width, config.height);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene"),
            source: wgpu::ShaderSource::Wgsl(shatter_core::SCENE_WGSL.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = make_scene_pipeline(&device, &pipeline_layout, &shader, "solid", true);
        let backdrop_pipeline =
            make_scene_pipeline(&device, &pipeline_layout, &shader, "backdrop", false);
        let post = PostChain::new(&device, format, config.width, config.height);

        let backdrop = DrawSlot::new(
            &device,
            &bind_group_layout,
            "backdrop",
            &mesh::cube(1.0),
            BACKDROP_COUNT,
        );
        let ground = DrawSlot::new(
            &device,
            &bind_group_layout,
            "ground",
            &mesh::plane(GROUND_SIZE),
            1,
        );
        let fragments = DrawSlot::new(
            &device,
            &bind_group_layout,
            "fragments",
            &mesh::cube(FRAGMENT_SIZE),
            DESKTOP_CAPACITY,
        );
        let core = DrawSlot::new(
            &device,
            &bind_group_layout,
            "core",
            &mesh::icosahedron(CORE_RADIUS),
            1,
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            pipeline,
            backdrop_pipeline,
            depth_view,
            post,
            backdrop,
            ground,
            fragments,
            core,
            scene,
        })
    }

    fn logical_size(&self) -> (f32, f32) {
        let logical = self
            .window
            .inner_size()
            .to_logical::<f32>(self.window.scale_factor());
        (logical.width, logical.height)
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, new_size.width, new_size.height);
        self.post
            .resize(&self.device, new_size.width, new_size.height);
        let (w, h) = self.logical_size();
        self.scene.resize(w, h);
    }

    fn write_uniforms(&self, slot: &DrawSlot, uniforms: Uniforms) {
        self.queue
            .write_buffer(&slot.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.scene.advance();

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let intensity = self.scene.scroll.intensity();
        let progress = self.scene.scroll.progress();
        let aspect = self.config.width as f32 / self.config.height as f32;
        let camera = self.scene.rig.camera(aspect);
        let shared = FrameUniforms::new(
            &camera,
            &LightLevels::from_intensity(intensity),
            &Fog::default(),
        );
        let core_look = CoreAppearance::from_intensity(intensity);
        let [er, eg, eb] = EMISSIVE_RGB;
        let [ar, ag, ab] = ACCENT_RGB;

        self.write_uniforms(
            &self.backdrop,
            shared.for_draw([ar, ag, ab, Backdrop::opacity(progress)], [ar, ag, ab, 2.0]),
        );
        self.write_uniforms(&self.ground, shared.for_draw(GROUND_COLOR, [0.0; 4]));
        self.write_uniforms(
            &self.fragments,
            shared.for_draw(FRAGMENT_COLOR, [er, eg, eb, FRAGMENT_EMISSIVE]),
        );
        self.write_uniforms(
            &self.core,
            shared.for_draw(
                [ar, ag, ab, core_look.opacity],
                [er, eg, eb, core_look.emissive],
            ),
        );
        self.post
            .write_uniforms(&self.queue, &Bloom::default(), &Vignette::default());

        if self.scene.sim.instances_mut().take_dirty() {
            self.fragments
                .upload(&self.device, &self.queue, self.scene.sim.instances());
        }
        if self.scene.backdrop_instances.take_dirty() {
            self.backdrop
                .upload(&self.device, &self.queue, &self.scene.backdrop_instances);
        }
        if self.scene.ground_instance.take_dirty() {
            self.ground
                .upload(&self.device, &self.queue, &self.scene.ground_instance);
        }
        if self.scene.core_instance.take_dirty() {
            self.core
                .upload(&self.device, &self.queue, &self.scene.core_instance);
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: self.post.hdr_view(),
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_pipeline(&self.pipeline);
            self.ground.draw(&mut rpass);
            self.fragments.draw(&mut rpass);
            rpass.set_pipeline(&self.backdrop_pipeline);
            self.backdrop.draw(&mut rpass);
            // translucent core last so it blends over the fragments inside it
            rpass.set_pipeline(&self.pipeline);
            self.core.draw(&mut rpass);
        }
        self.post.run(&mut encoder, &view);
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

fn seed_from_env() -> u64 {
    match std::env::var("SHATTER_SEED") {
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(seed) => return seed,
            Err(e) => log::warn!("ignoring SHATTER_SEED={raw:?}: {e}"),
        },
        Err(std::env::VarError::NotPresent) => {}
        Err(e) => log::warn!("ignoring SHATTER_SEED: {e}"),
    }
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(42)
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let seed = seed_from_env();
    log::info!("seed {seed}");

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Shatter (native)")
        .build(&event_loop)?;

    let logical = window.inner_size().to_logical::<f32>(window.scale_factor());
    let scene = Scene::new(seed, logical.width, logical.height)?;
    let mut state = pollster::block_on(GpuState::new(&window, scene))?;

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent {
            event: WindowEvent::Resized(size),
            ..
        } => state.resize(size),
        Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            ..
        } => elwt.exit(),
        Event::WindowEvent {
            event: WindowEvent::MouseWheel { delta, .. },
            ..
        } => {
            let scale = state.window.scale_factor();
            state.scene.handle_wheel(delta, scale);
        }
        Event::WindowEvent {
            event:
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            logical_key,
                            state: ElementState::Pressed,
                            ..
                        },
                    ..
                },
            ..
        } => {
            if logical_key == Key::Named(NamedKey::Escape) {
                elwt.exit();
            } else {
                let (_, h) = state.logical_size();
                state.scene.handle_key(&logical_key, h);
            }
        }
        Event::AboutToWait => match state.render() {
            Ok(_) => state.window.request_redraw(),
            Err(wgpu::SurfaceError::Lost) => state.resize(state.window.inner_size()),
            Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
            Err(e) => log::warn!("frame skipped: {e}"),
        },
        _ => {}
    })?;
    Ok(())
}
