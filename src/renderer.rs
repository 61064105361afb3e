use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use glam::Vec3;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::camera::OrbitCamera;
use crate::core::GpuContext;
use crate::geometry::TRAIL_COLOR;
use crate::scene::{RenderableLibrary, Scene};
use crate::types::{BoxInstance, ColorChannel, Rgb};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// #050505
const BACKGROUND: wgpu::Color = wgpu::Color {
    r: 5.0 / 255.0,
    g: 5.0 / 255.0,
    b: 5.0 / 255.0,
    a: 1.0,
};

const POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const COLOR_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];
const INSTANCE_ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
    1 => Float32x4,
    2 => Float32x4,
    3 => Float32x4,
    4 => Float32x4,
    5 => Float32x4,
];

/// Vertex buffer plus the number of elements in it
struct GpuBuffer {
    buffer: wgpu::Buffer,
    len: u32,
}

/// Draws the scene's point sets, trails and label boxes, then the egui
/// overlay. GPU buffers are created the first time a renderable is drawn
/// and kept for the rest of the run; a frame's positions are uploaded once
/// and shared by its four color channels.
pub struct ViewerRenderer {
    gpu: GpuContext,
    depth_view: wgpu::TextureView,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    point_pipeline: wgpu::RenderPipeline,
    box_pipeline: wgpu::RenderPipeline,
    cube: GpuBuffer,
    positions: HashMap<usize, GpuBuffer>,
    colors: HashMap<(usize, ColorChannel), GpuBuffer>,
    trails: HashMap<(usize, usize), (GpuBuffer, GpuBuffer)>,
    boxes: HashMap<usize, GpuBuffer>,
    egui_renderer: egui_wgpu::Renderer,
    egui_state: egui_winit::State,
    egui_ctx: egui::Context,
}

impl ViewerRenderer {
    pub async fn new(window: Arc<Window>) -> Result<Self> {
        let gpu = GpuContext::new(window.clone()).await?;
        let device = gpu.device();
        let (width, height) = gpu.size();

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[OrbitCamera::new().to_uniform(gpu.aspect())]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("camera_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera_bind_group"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let point_pipeline = Self::create_point_pipeline(device, &camera_layout, gpu.format());
        let box_pipeline = Self::create_box_pipeline(device, &camera_layout, gpu.format());
        let depth_view = Self::create_depth_view(device, width, height);

        let cube_vertices = unit_cube();
        let cube = GpuBuffer {
            buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Unit Cube"),
                contents: bytemuck::cast_slice(&cube_vertices),
                usage: wgpu::BufferUsages::VERTEX,
            }),
            len: cube_vertices.len() as u32,
        };

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer =
            egui_wgpu::Renderer::new(device, gpu.format(), egui_wgpu::RendererOptions::default());

        Ok(Self {
            gpu,
            depth_view,
            camera_buffer,
            camera_bind_group,
            point_pipeline,
            box_pipeline,
            cube,
            positions: HashMap::new(),
            colors: HashMap::new(),
            trails: HashMap::new(),
            boxes: HashMap::new(),
            egui_renderer,
            egui_state,
            egui_ctx,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if self.gpu.resize(width, height) {
            self.depth_view = Self::create_depth_view(self.gpu.device(), width, height);
        }
    }

    /// Feed a window event to egui; true when egui consumed it
    pub fn handle_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        self.egui_state.on_window_event(window, event).consumed
    }

    /// Run the UI for this frame; controls mutate state inside `run_ui`
    pub fn run_ui(&mut self, window: &Window, run_ui: impl FnMut(&egui::Context)) -> egui::FullOutput {
        let raw_input = self.egui_state.take_egui_input(window);
        self.egui_ctx.run(raw_input, run_ui)
    }

    pub fn render(
        &mut self,
        window: &Window,
        library: &RenderableLibrary,
        scene: &Scene,
        camera: &OrbitCamera,
        ui: egui::FullOutput,
    ) -> std::result::Result<(), wgpu::SurfaceError> {
        self.upload_scene(library, scene);
        self.gpu.queue().write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera.to_uniform(self.gpu.aspect())]),
        );

        let output = self.gpu.acquire()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(BACKGROUND),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            self.draw_scene(&mut render_pass, scene);
        }

        self.draw_ui(window, &mut encoder, &view, ui);

        self.gpu.queue().submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    /// Uploads every renderable in the scene that has no GPU buffer yet
    fn upload_scene(&mut self, library: &RenderableLibrary, scene: &Scene) {
        let device = self.gpu.device();

        for (frame, channel) in scene.point_sets() {
            let Some(set) = library.point_set(frame, channel) else {
                continue;
            };
            self.positions
                .entry(frame)
                .or_insert_with(|| vertex_buffer(device, "Positions", &set.positions()[..]));
            self.colors
                .entry((frame, channel))
                .or_insert_with(|| vertex_buffer(device, "Colors", set.colors()));
        }

        for (frame, trail) in scene.trails() {
            let Some(set) = library.trail(frame, trail) else {
                continue;
            };
            self.trails.entry((frame, trail)).or_insert_with(|| {
                let colors: Vec<Rgb> = vec![TRAIL_COLOR; set.len()];
                (
                    vertex_buffer(device, "Trail Positions", set.positions()),
                    vertex_buffer(device, "Trail Colors", colors.as_slice()),
                )
            });
        }

        for (frame, _) in scene.label_boxes() {
            self.boxes.entry(frame).or_insert_with(|| {
                let instances: Vec<BoxInstance> = library
                    .label_boxes(frame)
                    .iter()
                    .map(|b| b.to_instance())
                    .collect();
                vertex_buffer(device, "Label Boxes", instances.as_slice())
            });
        }
    }

    fn draw_scene(&self, render_pass: &mut wgpu::RenderPass<'_>, scene: &Scene) {
        render_pass.set_pipeline(&self.point_pipeline);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

        for (frame, channel) in scene.point_sets() {
            if let (Some(positions), Some(colors)) =
                (self.positions.get(&frame), self.colors.get(&(frame, channel)))
            {
                draw_points(render_pass, positions, colors);
            }
        }
        for key in scene.trails() {
            if let Some((positions, colors)) = self.trails.get(&key) {
                draw_points(render_pass, positions, colors);
            }
        }

        // Translucent boxes last so the points behind them show through
        render_pass.set_pipeline(&self.box_pipeline);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.cube.buffer.slice(..));
        for (frame, index) in scene.label_boxes() {
            let Some(instances) = self.boxes.get(&frame) else {
                continue;
            };
            let index = index as u32;
            if index < instances.len {
                render_pass.set_vertex_buffer(1, instances.buffer.slice(..));
                render_pass.draw(0..self.cube.len, index..index + 1);
            }
        }
    }

    fn draw_ui(
        &mut self,
        window: &Window,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        ui: egui::FullOutput,
    ) {
        self.egui_state
            .handle_platform_output(window, ui.platform_output);

        let device = self.gpu.device();
        let queue = self.gpu.queue();
        let tris = self
            .egui_ctx
            .tessellate(ui.shapes, self.egui_ctx.pixels_per_point());
        for (id, image_delta) in &ui.textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        let (width, height) = self.gpu.size();
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: window.scale_factor() as f32,
        };
        self.egui_renderer
            .update_buffers(device, queue, encoder, &tris, &screen_descriptor);

        {
            let mut render_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    occlusion_query_set: None,
                    timestamp_writes: None,
                })
                .forget_lifetime();
            self.egui_renderer
                .render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &ui.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }

    fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some("Depth Texture"),
                size: wgpu::Extent3d {
                    width: width.max(1),
                    height: height.max(1),
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: DEPTH_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
            .create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn create_point_pipeline(
        device: &wgpu::Device,
        camera_layout: &wgpu::BindGroupLayout,
        surface_format: wgpu::TextureFormat,
    ) -> wgpu::RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Point Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("points.wgsl").into()),
        });

        let buffers = [
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<Vec3>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &POSITION_ATTRIBUTES,
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<Rgb>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &COLOR_ATTRIBUTES,
            },
        ];

        Self::create_pipeline(
            device,
            camera_layout,
            "Point Pipeline",
            &shader,
            &buffers,
            surface_format,
            wgpu::PrimitiveTopology::PointList,
            wgpu::BlendState::REPLACE,
            true,
        )
    }

    fn create_box_pipeline(
        device: &wgpu::Device,
        camera_layout: &wgpu::BindGroupLayout,
        surface_format: wgpu::TextureFormat,
    ) -> wgpu::RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Box Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("boxes.wgsl").into()),
        });

        let buffers = [
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<Vec3>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &POSITION_ATTRIBUTES,
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<BoxInstance>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &INSTANCE_ATTRIBUTES,
            },
        ];

        // Translucent: depth tested against the points but never written
        Self::create_pipeline(
            device,
            camera_layout,
            "Box Pipeline",
            &shader,
            &buffers,
            surface_format,
            wgpu::PrimitiveTopology::TriangleList,
            wgpu::BlendState::ALPHA_BLENDING,
            false,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn create_pipeline(
        device: &wgpu::Device,
        camera_layout: &wgpu::BindGroupLayout,
        label: &str,
        shader: &wgpu::ShaderModule,
        buffers: &[wgpu::VertexBufferLayout<'_>],
        surface_format: wgpu::TextureFormat,
        topology: wgpu::PrimitiveTopology,
        blend: wgpu::BlendState,
        depth_write_enabled: bool,
    ) -> wgpu::RenderPipeline {
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(label),
            bind_group_layouts: &[camera_layout],
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers,
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        })
    }
}

fn vertex_buffer<T: bytemuck::Pod>(device: &wgpu::Device, label: &str, data: &[T]) -> GpuBuffer {
    GpuBuffer {
        buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(data),
            usage: wgpu::BufferUsages::VERTEX,
        }),
        len: data.len() as u32,
    }
}

fn draw_points(render_pass: &mut wgpu::RenderPass<'_>, positions: &GpuBuffer, colors: &GpuBuffer) {
    let count = positions.len.min(colors.len);
    if count == 0 {
        return;
    }
    render_pass.set_vertex_buffer(0, positions.buffer.slice(..));
    render_pass.set_vertex_buffer(1, colors.buffer.slice(..));
    render_pass.draw(0..count, 0..1);
}

/// Triangle list of the cube spanning [-0.5, 0.5] on every axis
fn unit_cube() -> Vec<Vec3> {
    const CORNERS: [[f32; 3]; 8] = [
        [-0.5, -0.5, -0.5],
        [0.5, -0.5, -0.5],
        [0.5, 0.5, -0.5],
        [-0.5, 0.5, -0.5],
        [-0.5, -0.5, 0.5],
        [0.5, -0.5, 0.5],
        [0.5, 0.5, 0.5],
        [-0.5, 0.5, 0.5],
    ];
    const FACES: [[usize; 4]; 6] = [
        [0, 1, 2, 3],
        [5, 4, 7, 6],
        [4, 0, 3, 7],
        [1, 5, 6, 2],
        [3, 2, 6, 7],
        [4, 5, 1, 0],
    ];

    FACES
        .iter()
        .flat_map(|&[a, b, c, d]| [a, b, c, a, c, d])
        .map(|i| Vec3::from_array(CORNERS[i]))
        .collect()
}
