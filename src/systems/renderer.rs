use crate::draw::{Color, DrawCommand, DrawList, Layer, TextAlign};
use crate::error::RenderError;
use std::sync::Arc;
use std::time::{Duration, Instant};
use wgpu::util::DeviceExt;
use winit::window::Window;

#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct Vertex {
    position: [f32; 2],
}

/// One rectangle, already in clip space: `origin` is the top-left corner,
/// `extent` points right and down (negative y)
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct RectInstance {
    origin: [f32; 2],
    extent: [f32; 2],
    color: [f32; 4],
}

const UNIT_QUAD: &[Vertex] = &[
    Vertex {
        position: [0.0, 0.0],
    },
    Vertex {
        position: [1.0, 0.0],
    },
    Vertex {
        position: [1.0, 1.0],
    },
    Vertex {
        position: [0.0, 0.0],
    },
    Vertex {
        position: [1.0, 1.0],
    },
    Vertex {
        position: [0.0, 1.0],
    },
];

const INITIAL_INSTANCES: usize = 256;
const STATS_COLOR: glyphon::Color = glyphon::Color::rgb(255, 255, 160);

pub struct FrameStats {
    pub last_present: Instant,
    pub frame_time_accum: Duration,
    pub frame_count: u32,
    pub avg_frame_time_ms: f32,
    pub present_fps: u32,

    pub ticks_accum: u32,
    pub tick_rate: u32,

    pub render_count: u32,
    pub render_fps: u32,

    pub entity_count: usize,
    pub rect_count: usize,

    pub last_report: Instant,
    pub report_dt: Duration,
}

impl FrameStats {
    pub fn new(now: Instant) -> Self {
        Self {
            last_present: now,
            frame_time_accum: Duration::ZERO,
            frame_count: 0,
            avg_frame_time_ms: 0.0,
            present_fps: 0,
            ticks_accum: 0,
            tick_rate: 0,
            render_count: 0,
            render_fps: 0,
            entity_count: 0,
            rect_count: 0,
            last_report: now,
            report_dt: Duration::from_secs(1),
        }
    }

    pub fn needs_update(&self) -> bool {
        Instant::now() - self.last_report >= self.report_dt
    }

    pub fn update(&mut self) {
        let now = Instant::now();
        let secs = (now - self.last_report).as_secs_f32();

        if self.frame_count > 0 {
            let avg_dt = self.frame_time_accum.as_secs_f32() / self.frame_count as f32;
            self.avg_frame_time_ms = avg_dt * 1000.0;
            self.present_fps = (1.0 / avg_dt).round() as u32;
        }

        self.tick_rate = (self.ticks_accum as f32 / secs).round() as u32;
        self.render_fps = (self.render_count as f32 / secs).round() as u32;

        self.frame_time_accum = Duration::ZERO;
        self.frame_count = 0;
        self.ticks_accum = 0;
        self.render_count = 0;
        self.last_report = now;
    }

    pub fn record_frame(&mut self, dt: Duration) {
        self.frame_time_accum += dt;
        self.frame_count += 1;
    }

    fn text(&self) -> String {
        format!(
            "Frame:    {:5.2} ms ({:3} fps)\nTick:     {:3} /s\nRender:   {:3} fps\nEntities: {:5}\nRects:    {:5}",
            self.avg_frame_time_ms,
            self.present_fps,
            self.tick_rate,
            self.render_fps,
            self.entity_count,
            self.rect_count,
        )
    }
}

/// Maps a layer's logical coordinates onto the surface
#[derive(Clone, Copy, Debug)]
struct LayerTransform {
    scale: [f32; 2],
}

impl LayerTransform {
    fn new(layer: &Layer, surface: [f32; 2]) -> Self {
        let [w, h] = layer.size;
        Self {
            scale: [
                if w > 0.0 { surface[0] / w } else { 1.0 },
                if h > 0.0 { surface[1] / h } else { 1.0 },
            ],
        }
    }

    fn to_screen(self, position: [f32; 2]) -> [f32; 2] {
        [position[0] * self.scale[0], position[1] * self.scale[1]]
    }

    fn rect(self, position: [f32; 2], size: [f32; 2], color: Color, surface: [f32; 2]) -> RectInstance {
        let [x, y] = self.to_screen(position);
        let [w, h] = self.to_screen(size);
        RectInstance {
            origin: [x / surface[0] * 2.0 - 1.0, 1.0 - y / surface[1] * 2.0],
            extent: [w / surface[0] * 2.0, -h / surface[1] * 2.0],
            color,
        }
    }
}

fn glyph_color(color: Color) -> glyphon::Color {
    let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
    glyphon::Color::rgba(
        channel(color[0]),
        channel(color[1]),
        channel(color[2]),
        channel(color[3]),
    )
}

/// Shaped text waiting for a `TextArea`
struct TextItem {
    buffer: glyphon::Buffer,
    left: f32,
    top: f32,
    color: glyphon::Color,
}

pub struct Renderer {
    pub window: Arc<Window>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    surface_format: wgpu::TextureFormat,
    size: winit::dpi::PhysicalSize<u32>,

    render_pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,

    // Text rendering
    font_system: glyphon::FontSystem,
    swash_cache: glyphon::SwashCache,
    viewport: glyphon::Viewport,
    atlas: glyphon::TextAtlas,
    text_renderer: glyphon::TextRenderer,
    stats_buffer: glyphon::Buffer,

    pub show_stats: bool,
    pub frame_stats: FrameStats,
}

impl Renderer {
    pub async fn new(window: Arc<Window>) -> Result<Self, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions::default())
            .await?;
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await?;
        log::info!("using adapter {:?}", adapter.get_info().name);

        let size = window.inner_size();
        let surface = instance.create_surface(window.clone())?;
        let cap = surface.get_capabilities(&adapter);
        let surface_format = cap
            .formats
            .iter()
            .copied()
            .find(wgpu::TextureFormat::is_srgb)
            .or_else(|| cap.formats.first().copied())
            .unwrap_or(wgpu::TextureFormat::Bgra8UnormSrgb);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Rect Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shader.wgsl").into()),
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Rect Pipeline"),
            layout: None,
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![0 => Float32x2],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<RectInstance>() as wgpu::BufferAddress,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            1 => Float32x2,
                            2 => Float32x2,
                            3 => Float32x4,
                        ],
                    },
                ],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(UNIT_QUAD),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let instance_buffer = Self::create_instance_buffer(&device, INITIAL_INSTANCES);

        // Text rendering setup
        let mut font_system = glyphon::FontSystem::new();
        let swash_cache = glyphon::SwashCache::new();
        let cache = glyphon::Cache::new(&device);
        let viewport = glyphon::Viewport::new(&device, &cache);
        let mut atlas = glyphon::TextAtlas::new(&device, &queue, &cache, surface_format);
        let text_renderer = glyphon::TextRenderer::new(
            &mut atlas,
            &device,
            wgpu::MultisampleState::default(),
            None,
        );

        let mut stats_buffer =
            glyphon::Buffer::new(&mut font_system, glyphon::Metrics::new(18.0, 24.0));
        stats_buffer.set_size(&mut font_system, None, None);
        stats_buffer.set_text(
            &mut font_system,
            "FPS: --",
            &glyphon::Attrs::new().family(glyphon::Family::Monospace),
            glyphon::Shaping::Advanced,
            None,
        );
        stats_buffer.shape_until_scroll(&mut font_system, false);

        let renderer = Self {
            window,
            device,
            queue,
            surface,
            surface_format,
            size,
            render_pipeline,
            vertex_buffer,
            instance_buffer,
            instance_capacity: INITIAL_INSTANCES,
            font_system,
            swash_cache,
            viewport,
            atlas,
            text_renderer,
            stats_buffer,
            show_stats: false,
            frame_stats: FrameStats::new(Instant::now()),
        };

        renderer.configure_surface();
        Ok(renderer)
    }

    fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Instance Buffer"),
            size: (std::mem::size_of::<RectInstance>() * capacity) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn configure_surface(&self) {
        if self.size.width == 0 || self.size.height == 0 {
            return;
        }
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: self.surface_format,
            view_formats: vec![],
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            width: self.size.width,
            height: self.size.height,
            desired_maximum_frame_latency: 2,
            present_mode: wgpu::PresentMode::AutoVsync,
        };
        self.surface.configure(&self.device, &surface_config);
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.size = new_size;
        self.configure_surface();
    }

    pub fn toggle_stats(&mut self) {
        self.show_stats = !self.show_stats;
    }

    pub fn update_stats_text(&mut self) {
        let s = self.frame_stats.text();
        self.stats_buffer.set_text(
            &mut self.font_system,
            &s,
            &glyphon::Attrs::new()
                .family(glyphon::Family::Monospace)
                .color(STATS_COLOR),
            glyphon::Shaping::Basic,
            None,
        );
        self.stats_buffer
            .shape_until_scroll(&mut self.font_system, false);
    }

    fn surface_size(&self) -> [f32; 2] {
        [self.size.width as f32, self.size.height as f32]
    }

    fn collect_rects(&self, draw: &DrawList) -> Vec<RectInstance> {
        let surface = self.surface_size();
        let mut rects = Vec::with_capacity(draw.rect_count());
        for layer in draw.layers() {
            let transform = LayerTransform::new(layer, surface);
            for command in &layer.commands {
                if let DrawCommand::Rect {
                    position,
                    size,
                    color,
                } = command
                {
                    rects.push(transform.rect(*position, *size, *color, surface));
                }
            }
        }
        rects
    }

    fn shape_text(&mut self, draw: &DrawList) -> Vec<TextItem> {
        let surface = self.surface_size();
        let mut items = Vec::new();
        for layer in draw.layers() {
            let transform = LayerTransform::new(layer, surface);
            for command in &layer.commands {
                let DrawCommand::Text {
                    content,
                    position,
                    font_size,
                    color,
                    align,
                } = command
                else {
                    continue;
                };

                let font_size = font_size * transform.scale[1];
                let line_height = font_size * 1.2;
                let mut buffer = glyphon::Buffer::new(
                    &mut self.font_system,
                    glyphon::Metrics::new(font_size, line_height),
                );
                buffer.set_size(&mut self.font_system, None, None);
                buffer.set_text(
                    &mut self.font_system,
                    content,
                    &glyphon::Attrs::new().family(glyphon::Family::SansSerif),
                    glyphon::Shaping::Advanced,
                    None,
                );
                buffer.shape_until_scroll(&mut self.font_system, false);

                let [x, y] = transform.to_screen(*position);
                let (left, top) = match align {
                    TextAlign::TopLeft => (x, y),
                    TextAlign::Center => {
                        let (width, lines) = buffer
                            .layout_runs()
                            .fold((0.0f32, 0usize), |(width, lines), run| {
                                (width.max(run.line_w), lines + 1)
                            });
                        (x - width * 0.5, y - lines as f32 * line_height * 0.5)
                    }
                };

                items.push(TextItem {
                    buffer,
                    left: left.round(),
                    top: top.round(),
                    color: glyph_color(*color),
                });
            }
        }
        items
    }

    fn upload_rects(&mut self, rects: &[RectInstance]) {
        if rects.len() > self.instance_capacity {
            self.instance_capacity = rects.len().next_power_of_two();
            self.instance_buffer = Self::create_instance_buffer(&self.device, self.instance_capacity);
            log::debug!("instance buffer grown to {}", self.instance_capacity);
        }
        self.queue
            .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(rects));
    }

    /// Replays the tick's draw list. A lost or outdated surface is
    /// reconfigured and the frame skipped.
    pub fn render(&mut self, draw: &DrawList) -> Result<(), RenderError> {
        if self.size.width == 0 || self.size.height == 0 {
            return Ok(());
        }
        self.frame_stats.render_count += 1;

        let rects = self.collect_rects(draw);
        self.frame_stats.rect_count = rects.len();
        self.upload_rects(&rects);
        let texts = self.shape_text(draw);

        self.viewport.update(
            &self.queue,
            glyphon::Resolution {
                width: self.size.width,
                height: self.size.height,
            },
        );

        let mut text_areas: Vec<_> = texts
            .iter()
            .map(|item| glyphon::TextArea {
                buffer: &item.buffer,
                left: item.left,
                top: item.top,
                scale: 1.0,
                bounds: glyphon::TextBounds::default(),
                default_color: item.color,
                custom_glyphs: &[],
            })
            .collect();

        if self.show_stats {
            text_areas.push(glyphon::TextArea {
                buffer: &self.stats_buffer,
                left: 12.0,
                top: (self.size.height as f32 * 0.5).round(),
                scale: 1.0,
                bounds: glyphon::TextBounds::default(),
                default_color: STATS_COLOR,
                custom_glyphs: &[],
            });
        }

        self.text_renderer.prepare(
            &self.device,
            &self.queue,
            &mut self.font_system,
            &mut self.atlas,
            &self.viewport,
            text_areas,
            &mut self.swash_cache,
        )?;

        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("surface lost, reconfiguring");
                self.configure_surface();
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.device.create_command_encoder(&Default::default());

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: None,
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            if !rects.is_empty() {
                render_pass.set_pipeline(&self.render_pipeline);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
                render_pass.draw(0..UNIT_QUAD.len() as u32, 0..rects.len() as u32);
            }

            self.text_renderer
                .render(&mut self.atlas, &mut self.viewport, &mut render_pass)?;
        }

        self.queue.submit([encoder.finish()]);
        surface_texture.present();
        self.atlas.trim();

        let now = Instant::now();
        let dt = now - self.frame_stats.last_present;
        self.frame_stats.last_present = now;
        self.frame_stats.record_frame(dt);

        if self.frame_stats.needs_update() {
            self.frame_stats.update();
            self.update_stats_text();
        }

        Ok(())
    }
}
