use crate::camera::{Camera, CameraUniform};
use crate::content::Project;
use crate::input::{Action, InputMapper};
use crate::render::{Capacity, Render};
use crate::scene::{Scene, SceneConfig};
use crate::scroll::{max_index, ScrollInput, OVERVIEW_INDEX};
use anyhow::Context;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use wgpu::util::DeviceExt;
use winit::{
  dpi::PhysicalSize,
  event::{Event, WindowEvent},
  event_loop::{EventLoop, EventLoopWindowTarget},
  window::Window,
};

const FRAME_TIME: Duration = Duration::from_micros(16_667);
/// Wheel distance of one scripted headless swipe; well past the threshold.
const SCRIPTED_SWIPE: f32 = 100.0;

#[derive(Copy, Clone, Debug)]
pub struct ViewerOptions {
  pub config: SceneConfig,
  pub headless: bool,
  /// stop after this many frames (headless only)
  pub frames: Option<u64>,
  /// time spent on each stop of the headless tour
  pub dwell: Duration,
}

struct EventLoopWrapper {
  event_loop: EventLoop<()>,
  window: Arc<Window>,
}

impl EventLoopWrapper {
  pub fn new(title: &str) -> anyhow::Result<Self> {
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let builder = winit::window::WindowBuilder::new()
      .with_title(title)
      .with_inner_size(PhysicalSize::new(1280, 720));
    let window = Arc::new(builder.build(&event_loop).context("failed to open window")?);

    Ok(Self { event_loop, window })
  }
}

struct SurfaceWrapper {
  surface: wgpu::Surface<'static>,
  config: wgpu::SurfaceConfiguration,
}

impl SurfaceWrapper {
  fn new(
    surface: wgpu::Surface<'static>,
    context: &State,
    size: PhysicalSize<u32>,
  ) -> anyhow::Result<Self> {
    let mut config = surface
      .get_default_config(&context.adapter, size.width.max(1), size.height.max(1))
      .context("surface is not supported by the adapter")?;
    let view_format = config.format.add_srgb_suffix();
    config.view_formats.push(view_format);
    surface.configure(&context.device, &config);
    Ok(Self { surface, config })
  }

  fn resize(&mut self, context: &State, size: PhysicalSize<u32>) {
    if size.width == 0 || size.height == 0 {
      return;
    }
    self.config.width = size.width;
    self.config.height = size.height;
    self.surface.configure(&context.device, &self.config);
  }

  fn acquire(&mut self, context: &State) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
    match self.surface.get_current_texture() {
      Ok(frame) => Ok(frame),
      Err(wgpu::SurfaceError::Timeout) => self.surface.get_current_texture(),
      Err(
        wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost | wgpu::SurfaceError::OutOfMemory,
      ) => {
        self.surface.configure(&context.device, &self.config);
        self.surface.get_current_texture()
      }
    }
  }

  fn aspect(&self) -> f32 {
    self.config.width as f32 / self.config.height.max(1) as f32
  }
}

/// GPU handles plus the camera uniform they feed.
struct State {
  _instance: wgpu::Instance,
  adapter: wgpu::Adapter,
  device: wgpu::Device,
  queue: wgpu::Queue,
  camera: Camera,
  camera_uniform: CameraUniform,
  camera_buffer: wgpu::Buffer,
  camera_bind_group: wgpu::BindGroup,
  camera_bind_group_layout: wgpu::BindGroupLayout,
}

impl State {
  async fn init(
    instance: wgpu::Instance,
    surface: &wgpu::Surface<'static>,
    size: PhysicalSize<u32>,
  ) -> anyhow::Result<Self> {
    let adapter = instance
      .request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::default(),
        compatible_surface: Some(surface),
        force_fallback_adapter: false,
      })
      .await
      .context("no suitable GPU adapter")?;
    log::info!("using adapter {:?}", adapter.get_info().name);

    let (device, queue) = adapter
      .request_device(
        &wgpu::DeviceDescriptor {
          label: None,
          required_features: wgpu::Features::empty(),
          required_limits: wgpu::Limits::default(),
          memory_hints: Default::default(),
        },
        None,
      )
      .await
      .context("failed to create device")?;

    let camera = Camera::new(size.width as f32 / size.height.max(1) as f32);
    let mut camera_uniform = CameraUniform::new();
    camera_uniform.update_view_proj(&camera);

    let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
      label: Some("Camera Buffer"),
      contents: bytemuck::cast_slice(&[camera_uniform]),
      usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    });
    let camera_bind_group_layout =
      device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
        label: Some("camera_bind_group_layout"),
      });
    let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
      layout: &camera_bind_group_layout,
      entries: &[wgpu::BindGroupEntry {
        binding: 0,
        resource: camera_buffer.as_entire_binding(),
      }],
      label: Some("camera_bind_group"),
    });

    Ok(Self {
      _instance: instance,
      adapter,
      device,
      queue,
      camera,
      camera_uniform,
      camera_buffer,
      camera_bind_group,
      camera_bind_group_layout,
    })
  }

  fn write_camera(&mut self) {
    self.camera_uniform.update_view_proj(&self.camera);
    self.queue.write_buffer(
      &self.camera_buffer,
      0,
      bytemuck::cast_slice(&[self.camera_uniform]),
    );
  }
}

/// Everything the window event loop closure owns.
struct Viewer {
  context: State,
  surface: SurfaceWrapper,
  render: Render,
  scene: Scene,
  input: InputMapper,
  started: Instant,
  last_frame: Instant,
}

impl Viewer {
  fn now_ms(&self) -> u64 {
    self.started.elapsed().as_millis() as u64
  }

  /// Returns false once the viewer should close.
  fn handle(&mut self, event: &WindowEvent) -> bool {
    if let WindowEvent::Resized(size) = event {
      self.surface.resize(&self.context, *size);
      self.context.camera.aspect = self.surface.aspect();
    }
    match self.input.map(event) {
      Some(Action::Quit) => return false,
      Some(Action::Scroll(input)) => {
        let now = self.now_ms();
        self.scene.handle_input(input, now);
      }
      Some(Action::Pointer(mouse)) => self.scene.set_mouse(mouse),
      Some(Action::Pick { ndc_x, ndc_y }) => {
        if let Some((origin, dir)) = self.context.camera.ray(ndc_x, ndc_y) {
          self.scene.pick(origin, dir);
        }
      }
      Some(Action::Navigate(index)) => {
        self.scene.navigate_to(index);
      }
      None => {}
    }
    true
  }

  fn redraw(&mut self) -> Result<(), wgpu::SurfaceError> {
    let now = Instant::now();
    self.scene.advance(now - self.last_frame);
    self.last_frame = now;

    let snapshot = self.scene.frame();
    self.context.camera.set_pose(&snapshot.pose);
    self.context.write_camera();
    let bodies = self.scene.body_particles(&snapshot);
    self.render.upload(
      &self.context.queue,
      self.scene.galaxy_particles(),
      self.scene.dust_particles(),
      &bodies,
    );

    let frame = self.surface.acquire(&self.context)?;
    let view = frame.texture.create_view(&wgpu::TextureViewDescriptor {
      format: Some(self.surface.config.view_formats[0]),
      ..wgpu::TextureViewDescriptor::default()
    });
    self.render.render(
      &view,
      &self.context.device,
      &self.context.queue,
      &self.context.camera_bind_group,
    );
    frame.present();
    Ok(())
  }
}

async fn start(projects: Vec<Project>, options: ViewerOptions) -> anyhow::Result<()> {
  let window_loop = EventLoopWrapper::new("Orrery")?;
  let size = window_loop.window.inner_size();
  let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
    #[cfg(not(target_arch = "wasm32"))]
    backends: wgpu::Backends::PRIMARY,
    ..Default::default()
  });
  let surface = instance
    .create_surface(window_loop.window.clone())
    .context("failed to create surface")?;
  let context = State::init(instance, &surface, size).await?;
  let surface = SurfaceWrapper::new(surface, &context, size)?;

  let scene = Scene::new(projects, options.config);
  let capacity = Capacity {
    galaxy: scene.galaxy_particles().len() as u32,
    dust: scene.dust_particles().len() as u32,
    bodies: scene.projects().len() as u32 + 1,
  };
  let render = Render::init(
    &surface.config,
    &context.device,
    &context.camera_bind_group_layout,
    capacity,
  );
  let now = Instant::now();
  let mut viewer = Viewer {
    input: InputMapper::new(size, window_loop.window.scale_factor()),
    context,
    surface,
    render,
    scene,
    started: now,
    last_frame: now,
  };

  let window = window_loop.window.clone();
  window_loop
    .event_loop
    .run(move |event, target: &EventLoopWindowTarget<()>| match event {
      Event::WindowEvent { event, window_id } if window_id == window.id() => {
        if !viewer.handle(&event) {
          target.exit();
          return;
        }
        if let WindowEvent::RedrawRequested = event {
          if let Err(e) = viewer.redraw() {
            log::error!("surface error: {e}");
            target.exit();
          }
        }
      }
      Event::AboutToWait => window.request_redraw(),
      _ => {}
    })
    .context("event loop failed")
}

/// Window-less tour: one forward swipe per dwell period, back to the
/// overview after the last project. Time is simulated at a fixed frame
/// rate so runs are reproducible.
fn run_headless(projects: Vec<Project>, options: ViewerOptions) -> anyhow::Result<()> {
  let running = Arc::new(AtomicBool::new(true));
  let r = running.clone();
  ctrlc::set_handler(move || r.store(false, Ordering::SeqCst))
    .context("failed to install Ctrl-C handler")?;

  let mut scene = Scene::new(projects, options.config);
  let last_index = max_index(scene.projects().len());
  let dwell_ms = options.dwell.as_millis() as u64;
  let mut now_ms = 0u64;
  let mut next_swipe = dwell_ms;
  let mut frame = 0u64;

  while running.load(Ordering::SeqCst) && options.frames.map_or(true, |max| frame < max) {
    if now_ms >= next_swipe {
      if scene.target_index() >= last_index {
        scene.navigate_to(OVERVIEW_INDEX);
      } else {
        scene.handle_input(ScrollInput::Wheel { delta_y: SCRIPTED_SWIPE }, now_ms);
      }
      next_swipe += dwell_ms.max(1);
    }

    scene.advance(FRAME_TIME);
    let snapshot = scene.frame();
    if frame % 60 == 0 {
      let eye = snapshot.pose.eye;
      log::info!(
        "frame {frame}: progress {:.3} target {} eye ({:.1}, {:.1}, {:.1})",
        snapshot.progress,
        snapshot.target,
        eye.x,
        eye.y,
        eye.z
      );
    }

    frame += 1;
    now_ms = frame * FRAME_TIME.as_micros() as u64 / 1000;
    std::thread::sleep(FRAME_TIME);
  }

  log::info!("headless run finished after {frame} frames");
  Ok(())
}

pub fn run(projects: Vec<Project>, options: ViewerOptions) -> anyhow::Result<()> {
  if options.headless {
    run_headless(projects, options)
  } else {
    pollster::block_on(start(projects, options))
  }
}
