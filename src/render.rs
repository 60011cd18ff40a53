use crate::Particle;
use std::borrow::Cow;
use wgpu::{util::DeviceExt, PipelineCompilationOptions};

const BACKGROUND: wgpu::Color = wgpu::Color {
  r: 0.0,
  g: 0.0,
  b: 0.01,
  a: 1.0,
};

/// Two triangles spanning [-1, 1]^2, expanded to a billboard in the vertex shader.
#[rustfmt::skip]
const QUAD: [[f32; 2]; 6] = [
  [-1.0, -1.0], [1.0, -1.0], [1.0, 1.0],
  [-1.0, -1.0], [1.0, 1.0], [-1.0, 1.0],
];

/// Instance buffer for one point cloud with a fixed capacity.
struct Layer {
  buffer: wgpu::Buffer,
  capacity: u32,
  count: u32,
}

impl Layer {
  fn new(device: &wgpu::Device, label: &str, capacity: u32) -> Self {
    let capacity = capacity.max(1);
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
      label: Some(label),
      size: u64::from(capacity) * std::mem::size_of::<Particle>() as u64,
      usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
      mapped_at_creation: false,
    });
    Self {
      buffer,
      capacity,
      count: 0,
    }
  }

  fn upload(&mut self, queue: &wgpu::Queue, particles: &[Particle]) {
    let n = particles.len().min(self.capacity as usize);
    if n < particles.len() {
      log::warn!("dropping {} particles over buffer capacity", particles.len() - n);
    }
    queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&particles[..n]));
    self.count = n as u32;
  }
}

/// Sizes of the instance buffers.
#[derive(Copy, Clone, Debug)]
pub struct Capacity {
  pub galaxy: u32,
  pub dust: u32,
  pub bodies: u32,
}

/// Draws the galaxy, the dust and the sun and planets as soft round points.
pub struct Render {
  vertices_buffer: wgpu::Buffer,
  render_pipeline: wgpu::RenderPipeline,
  galaxy: Layer,
  dust: Layer,
  bodies: Layer,
}

impl Render {
  #[must_use]
  pub fn init(
    config: &wgpu::SurfaceConfiguration,
    device: &wgpu::Device,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    capacity: Capacity,
  ) -> Self {
    let draw_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
      label: Some("draw"),
      source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(include_str!("shaders/draw.wgsl"))),
    });

    let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
      label: Some("render"),
      bind_group_layouts: &[camera_bind_group_layout],
      push_constant_ranges: &[],
    });
    let particle_buffer = wgpu::VertexBufferLayout {
      array_stride: std::mem::size_of::<Particle>() as wgpu::BufferAddress, // pos3 + color3 + size
      step_mode: wgpu::VertexStepMode::Instance,
      attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32],
    };
    let vertex_buffer = wgpu::VertexBufferLayout {
      array_stride: 2 * 4,
      step_mode: wgpu::VertexStepMode::Vertex,
      attributes: &wgpu::vertex_attr_array![3 => Float32x2],
    };
    let additive = wgpu::BlendState {
      color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
      },
      alpha: wgpu::BlendComponent::OVER,
    };
    let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
      label: Some("Render Pipeline"),
      layout: Some(&render_pipeline_layout),
      vertex: wgpu::VertexState {
        module: &draw_shader,
        entry_point: "main_vs",
        compilation_options: PipelineCompilationOptions::default(),
        buffers: &[particle_buffer, vertex_buffer],
      },
      fragment: Some(wgpu::FragmentState {
        module: &draw_shader,
        entry_point: "main_fs",
        compilation_options: PipelineCompilationOptions::default(),
        targets: &[Some(wgpu::ColorTargetState {
          format: config.view_formats[0],
          blend: Some(additive),
          write_mask: wgpu::ColorWrites::ALL,
        })],
      }),
      primitive: wgpu::PrimitiveState::default(),
      depth_stencil: None,
      multisample: wgpu::MultisampleState::default(),
      multiview: None,
      cache: None,
    });

    let vertices_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
      label: Some("Quad Buffer"),
      contents: bytemuck::cast_slice(&QUAD),
      usage: wgpu::BufferUsages::VERTEX,
    });

    Render {
      vertices_buffer,
      render_pipeline,
      galaxy: Layer::new(device, "Galaxy Buffer", capacity.galaxy),
      dust: Layer::new(device, "Dust Buffer", capacity.dust),
      bodies: Layer::new(device, "Body Buffer", capacity.bodies),
    }
  }

  pub fn upload(&mut self, queue: &wgpu::Queue, galaxy: &[Particle], dust: &[Particle], bodies: &[Particle]) {
    self.galaxy.upload(queue, galaxy);
    self.dust.upload(queue, dust);
    self.bodies.upload(queue, bodies);
  }

  pub fn render(
    &mut self,
    view: &wgpu::TextureView,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    camera_bind_group: &wgpu::BindGroup,
  ) {
    let color_attachments = [Some(wgpu::RenderPassColorAttachment {
      view,
      resolve_target: None,
      ops: wgpu::Operations {
        load: wgpu::LoadOp::Clear(BACKGROUND),
        store: wgpu::StoreOp::Store,
      },
    })];
    let render_pass_descriptor = wgpu::RenderPassDescriptor {
      label: None,
      color_attachments: &color_attachments,
      depth_stencil_attachment: None,
      timestamp_writes: None,
      occlusion_query_set: None,
    };
    let mut command_encoder =
      device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
    {
      let mut rpass = command_encoder.begin_render_pass(&render_pass_descriptor);
      rpass.set_pipeline(&self.render_pipeline);
      rpass.set_bind_group(0, camera_bind_group, &[]);
      rpass.set_vertex_buffer(1, self.vertices_buffer.slice(..));
      // back to front: the far galaxy first, bodies last
      for layer in [&self.galaxy, &self.dust, &self.bodies] {
        if layer.count == 0 {
          continue;
        }
        rpass.set_vertex_buffer(0, layer.buffer.slice(..));
        rpass.draw(0..QUAD.len() as u32, 0..layer.count);
      }
    }
    queue.submit(Some(command_encoder.finish()));
  }
}
