pub mod camera;
pub mod content;
pub mod gallery;
pub mod initialize;
pub mod input;
pub mod orbit;
pub mod particles;
pub mod render;
pub mod scene;
pub mod scroll;
pub mod state;
pub mod time;

use std::f32::consts::PI;

/// Per-project orbit layout. Every value is derived from the reversed
/// project index, never stored per planet.
#[derive(Copy, Clone, Debug)]
pub struct OrbitParams {
  pub base_radius: f32,
  pub radius_step: f32,
  pub angle_step: f32,
  pub angle_offset: f32,
  pub base_speed: f32,
  pub height: f32,
  pub height_freq: f32,
  /// simulated time added per clock tick
  pub time_step: f32,
  /// wall-clock length of one clock tick, in seconds
  pub tick: f32,
}

impl Default for OrbitParams {
  fn default() -> Self {
    Self {
      base_radius: 20.0,
      radius_step: 18.0,
      angle_step: 0.4 * PI,
      angle_offset: PI / 4.0,
      base_speed: 0.1,
      height: 2.0,
      height_freq: 0.5,
      time_step: 0.01,
      tick: 0.016,
    }
  }
}

#[derive(Copy, Clone, Debug)]
pub struct GalaxyParams {
  pub particle_count: u32,
  pub branches: u32,
  pub radius: f32,
  pub spin_factor: f32,
  pub randomness_power: f32,
  pub point_size: f32,
  /// rotation about +Y applied every rendered frame (radians, negative spins clockwise)
  pub spin_per_frame: f32,
}

impl Default for GalaxyParams {
  fn default() -> Self {
    Self {
      particle_count: 15000,
      branches: 3,
      radius: 120.0,
      spin_factor: 4.0,
      randomness_power: 3.0,
      point_size: 0.35,
      spin_per_frame: -0.0002,
    }
  }
}

#[derive(Copy, Clone, Debug)]
pub struct DustParams {
  pub particle_count: u32,
  /// full box size on each axis, centered on the origin
  pub extent: [f32; 3],
  /// full width of the per-axis velocity range, centered on zero
  pub speed_range: [f32; 3],
  pub min_brightness: f32,
  pub max_brightness: f32,
  pub point_size: f32,
}

impl Default for DustParams {
  fn default() -> Self {
    Self {
      particle_count: 5000,
      extent: [300.0, 200.0, 300.0],
      speed_range: [0.05, 0.03, 0.05],
      min_brightness: 0.3,
      max_brightness: 0.8,
      point_size: 0.2,
    }
  }
}

impl DustParams {
  /// Half extents; a particle past one of these on an axis gets reflected.
  pub fn bounds(&self) -> [f32; 3] {
    [self.extent[0] / 2.0, self.extent[1] / 2.0, self.extent[2] / 2.0]
  }
}

#[derive(Copy, Clone, Debug)]
pub struct ScrollParams {
  pub delta_threshold: f32,
  pub accumulator_reset_ms: u64,
  pub cooldown_ms: u64,
  pub lock_ms: u64,
  pub min_swipe_px: f32,
  pub easing: f32,
  pub snap_epsilon: f32,
  /// integrator rate, steps per second
  pub smoothing_hz: f32,
}

impl Default for ScrollParams {
  fn default() -> Self {
    Self {
      delta_threshold: 20.0,
      accumulator_reset_ms: 150,
      cooldown_ms: 1000,
      lock_ms: 800,
      min_swipe_px: 50.0,
      easing: 0.08,
      snap_epsilon: 0.001,
      smoothing_hz: 60.0,
    }
  }
}

#[derive(Copy, Clone, Debug)]
pub struct CameraParams {
  pub overview_eye: [f32; 3],
  pub approach_distance: f32,
  pub overview_lift: f32,
  pub focus_lift: f32,
  pub arc_height: f32,
  pub parallax: [f32; 2],
}

impl Default for CameraParams {
  fn default() -> Self {
    Self {
      overview_eye: [120.0, 80.0, 120.0],
      approach_distance: 12.0,
      overview_lift: 6.0,
      focus_lift: 3.0,
      arc_height: 8.0,
      parallax: [4.0, 3.0],
    }
  }
}

/// One instanced point as the renderer consumes it.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Particle {
  pub pos: [f32; 3],
  pub color: [f32; 3],
  pub size: f32,
}
