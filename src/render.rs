use std::borrow::Cow;

use glam::Vec2;
use log::warn;
use wgpu::util::DeviceExt;

use crate::error::Result;
use crate::gpu::GpuContext;
use crate::gui::EguiIntegration;
use crate::surface::{Color, RenderSurface};

/// Per-instance vertex data for one filled disc
#[derive(bytemuck::Zeroable, Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct DiscInstance {
    pub center: Vec2,
    pub radius: f32,
    pub color: Color,
}

unsafe impl bytemuck::Pod for DiscInstance {}

/// Two triangles spanning the disc's bounding square in unit space
const QUAD: [f32; 12] = [
    -1.0, -1.0, 1.0, -1.0, 1.0, 1.0, //
    -1.0, -1.0, 1.0, 1.0, -1.0, 1.0,
];

pub struct RenderModule {
    screen_size_buffer: wgpu::Buffer,
    vertices_buffer: wgpu::Buffer,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,

    bind_group: wgpu::BindGroup,
    pipeline: wgpu::RenderPipeline,
}

impl RenderModule {
    pub fn new(
        device: &wgpu::Device,
        swapchain_format: wgpu::TextureFormat,
        max_particles: usize,
    ) -> Self {
        let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("discs"),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(include_str!("render.wgsl"))),
        });

        let screen_size_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Screen Size Buffer"),
            size: 4 * 4,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let vertices_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Disc Quad Buffer"),
            contents: bytemuck::cast_slice(&QUAD),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let instance_capacity = max_particles.max(1);
        let instance_buffer = create_instance_buffer(device, instance_capacity);

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: None,
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
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: None,
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: screen_size_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("render"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: None,
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader_module,
                entry_point: "vertex",
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<DiscInstance>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32, 2 => Float32x4],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: 2 * 4,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![3 => Float32x2],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader_module,
                entry_point: "fragment",
                targets: &[Some(swapchain_format.into())],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        Self {
            screen_size_buffer,
            vertices_buffer,
            instance_buffer,
            instance_capacity,

            bind_group,
            pipeline,
        }
    }

    /// Arena size the shader maps onto the full viewport.
    pub fn update_size(&self, queue: &wgpu::Queue, width: u32, height: u32) {
        queue.write_buffer(
            &self.screen_size_buffer,
            0,
            bytemuck::bytes_of(&[width as f32, height as f32, 0.0, 0.0]),
        );
    }

    pub fn write_instances(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        instances: &[DiscInstance],
    ) {
        if instances.len() > self.instance_capacity {
            self.instance_capacity = instances.len().next_power_of_two();
            self.instance_buffer = create_instance_buffer(device, self.instance_capacity);
        }

        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(instances));
        }
    }

    pub fn begin_pass<'a>(
        &'a self,
        encoder: &'a mut wgpu::CommandEncoder,
        view: &'a wgpu::TextureView,
        clear: Color,
        num_instances: u32,
    ) -> wgpu::RenderPass<'a> {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: None,
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear.into()),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.instance_buffer.slice(..));
        rpass.set_vertex_buffer(1, self.vertices_buffer.slice(..));
        rpass.draw(0..6, 0..num_instances);

        rpass
    }
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Disc Instance Buffer"),
        size: (std::mem::size_of::<DiscInstance>() * capacity) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// The window's swapchain as a [`RenderSurface`].
///
/// Circles are batched between `fill` and `present` and drawn in one
/// instanced pass, with the statistics overlay on top.
pub struct GpuCanvas {
    gpu: GpuContext<'static>,
    module: RenderModule,
    pub overlay: EguiIntegration,
    pub show_overlay: bool,

    clear: Color,
    instances: Vec<DiscInstance>,
}

impl GpuCanvas {
    pub fn new(
        gpu: GpuContext<'static>,
        arena_width: u32,
        arena_height: u32,
        max_particles: usize,
    ) -> Self {
        let format = gpu.surface_format();
        let module = RenderModule::new(&gpu.device, format, max_particles);
        module.update_size(&gpu.queue, arena_width, arena_height);

        let mut overlay = EguiIntegration::new(&gpu.device, format);
        overlay.resize(gpu.config.width, gpu.config.height);

        Self {
            gpu,
            module,
            overlay,
            show_overlay: true,

            clear: Color::BLACK,
            instances: Vec::with_capacity(max_particles),
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
        self.overlay.resize(width, height);
    }
}

impl RenderSurface for GpuCanvas {
    fn fill(&mut self, color: Color) {
        self.clear = color;
        self.instances.clear();
    }

    fn draw_filled_circle(&mut self, color: Color, center: Vec2, radius: f32) {
        self.instances.push(DiscInstance {
            center,
            radius,
            color,
        });
    }

    fn present(&mut self) -> Result<()> {
        let frame = match self.gpu.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost or outdated, reconfiguring");
                self.gpu.reconfigure_surface();
                self.instances.clear();
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("Timed out acquiring a frame, skipping it");
                self.instances.clear();
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let device = &self.gpu.device;
        let queue = &self.gpu.queue;
        self.module.write_instances(device, queue, &self.instances);

        let mut encoder =
            device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        if self.show_overlay {
            self.overlay.pre_render(device, queue, &mut encoder);
        }

        {
            let view = frame
                .texture
                .create_view(&wgpu::TextureViewDescriptor::default());

            let mut rpass = self.module.begin_pass(
                &mut encoder,
                &view,
                self.clear,
                self.instances.len() as u32,
            );

            if self.show_overlay {
                self.overlay.render(&mut rpass);
            }
        }

        queue.submit(Some(encoder.finish()));
        frame.present();
        self.instances.clear();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_layout_matches_vertex_attributes() {
        // Float32x2 + Float32 + Float32x4, tightly packed
        assert_eq!(std::mem::size_of::<DiscInstance>(), 28);

        let instance = DiscInstance {
            center: Vec2::new(10.0, 20.0),
            radius: 5.0,
            color: Color::rgb(0.25, 0.5, 0.75),
        };
        let floats: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&instance));
        assert_eq!(floats, &[10.0, 20.0, 5.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn quad_covers_unit_disc() {
        let corners: Vec<Vec2> = QUAD
            .chunks_exact(2)
            .map(|c| Vec2::new(c[0], c[1]))
            .collect();
        assert_eq!(corners.len(), 6);
        for corner in &corners {
            assert_eq!(corner.abs(), Vec2::ONE);
        }
        for target in [
            Vec2::new(-1.0, -1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, -1.0),
            Vec2::new(-1.0, 1.0),
        ] {
            assert!(corners.contains(&target));
        }
    }

    #[test]
    fn shader_is_valid_wgsl() {
        let module = naga::front::wgsl::parse_str(include_str!("render.wgsl"))
            .unwrap_or_else(|e| panic!("WGSL parse error: {e:?}"));

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator
            .validate(&module)
            .unwrap_or_else(|e| panic!("WGSL validation error: {e:?}"));

        let entry_points: Vec<&str> = module
            .entry_points
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(entry_points, vec!["vertex", "fragment"]);
    }
}
