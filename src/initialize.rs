use crate::{DustParams, GalaxyParams, Particle};
use rand::Rng;
use rand_distr::{Distribution, Uniform};
use std::f32::consts::PI;

// Galaxy palette, sRGB in [0, 1]
pub const SUN_YELLOW: [f32; 3] = [1.0, 215.0 / 255.0, 0.0];
pub const LIGHT_GRAY: [f32; 3] = [184.0 / 255.0, 184.0 / 255.0, 168.0 / 255.0];
pub const DARK_GRAY: [f32; 3] = [106.0 / 255.0, 106.0 / 255.0, 106.0 / 255.0];
pub const NEAR_BLACK: [f32; 3] = [26.0 / 255.0, 26.0 / 255.0, 26.0 / 255.0];

const CORE_RADIUS: f32 = 10.0;
const INNER_RADIUS: f32 = 35.0;
const MID_RADIUS: f32 = 70.0;
const OUTER_RADIUS: f32 = 100.0;
const FADE_LENGTH: f32 = 20.0;
const CORE_BOOST: f32 = 1.2;

fn lerp_color(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
  [
    a[0] + (b[0] - a[0]) * t,
    a[1] + (b[1] - a[1]) * t,
    a[2] + (b[2] - a[2]) * t,
  ]
}

/// Color of a galaxy particle by its distance from the center: a bright
/// core fading out through gray to near black at the rim. Channels are
/// clamped to [0, 1].
pub fn galaxy_color(radius: f32) -> [f32; 3] {
  let color = if radius < CORE_RADIUS {
    SUN_YELLOW.map(|c| c * CORE_BOOST)
  } else if radius < INNER_RADIUS {
    SUN_YELLOW
  } else if radius < MID_RADIUS {
    let t = (radius - INNER_RADIUS) / (MID_RADIUS - INNER_RADIUS);
    lerp_color(SUN_YELLOW, LIGHT_GRAY, t)
  } else if radius < OUTER_RADIUS {
    let t = (radius - MID_RADIUS) / (OUTER_RADIUS - MID_RADIUS);
    lerp_color(LIGHT_GRAY, DARK_GRAY, t)
  } else {
    let t = ((radius - OUTER_RADIUS) / FADE_LENGTH).min(1.0);
    lerp_color(DARK_GRAY, NEAR_BLACK, t)
  };
  color.map(|c| c.clamp(0.0, 1.0))
}

/// `random^power` with a random sign, scaled by `spread`.
fn scatter<R: Rng + ?Sized>(rng: &mut R, power: f32, spread: f32) -> f32 {
  let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
  rng.gen::<f32>().powf(power) * sign * spread
}

/// Spiral-galaxy point cloud. Particles are dealt round-robin onto
/// `branches` arms that wind tighter with distance; density is biased
/// toward the center and scatter grows toward the rim.
#[must_use]
pub fn create_galaxy<R: Rng + ?Sized>(params: &GalaxyParams, rng: &mut R) -> Vec<Particle> {
  let branches = params.branches.max(1);
  let mut particles = Vec::with_capacity(params.particle_count as usize);

  for i in 0..params.particle_count {
    let radius = rng.gen::<f32>().powf(1.5) * params.radius;
    let spin_angle = radius * params.spin_factor * 0.015;
    let branch_angle = (i % branches) as f32 / branches as f32 * 2.0 * PI;
    let angle = branch_angle + spin_angle;

    let dx = scatter(rng, params.randomness_power, 2.0 + radius * 0.05);
    let dy = scatter(rng, params.randomness_power, 1.0 + radius * 0.02);
    let dz = scatter(rng, params.randomness_power, 2.0 + radius * 0.05);

    particles.push(Particle {
      pos: [angle.cos() * radius + dx, dy, angle.sin() * radius + dz],
      color: galaxy_color(radius),
      size: params.point_size,
    });
  }
  particles
}

/// Free-floating dust: points spread uniformly through a box around the
/// origin, each with a fixed drift velocity that lives as long as the field.
#[must_use]
pub fn create_dust<R: Rng + ?Sized>(params: &DustParams, rng: &mut R) -> (Vec<Particle>, Vec<[f32; 3]>) {
  let count = params.particle_count as usize;
  let mut particles = Vec::with_capacity(count);
  let mut velocities = Vec::with_capacity(count);

  let half = params.bounds();
  let axis = |h: f32| Uniform::new_inclusive(-h, h);
  let pos_dist = [axis(half[0]), axis(half[1]), axis(half[2])];
  let vel_dist = [
    axis(params.speed_range[0] / 2.0),
    axis(params.speed_range[1] / 2.0),
    axis(params.speed_range[2] / 2.0),
  ];
  let brightness = Uniform::new_inclusive(params.min_brightness, params.max_brightness);

  for _ in 0..count {
    let pos = [
      pos_dist[0].sample(rng),
      pos_dist[1].sample(rng),
      pos_dist[2].sample(rng),
    ];
    let vel = [
      vel_dist[0].sample(rng),
      vel_dist[1].sample(rng),
      vel_dist[2].sample(rng),
    ];
    let b = brightness.sample(rng);
    particles.push(Particle {
      pos,
      color: [b, b, b],
      size: params.point_size,
    });
    velocities.push(vel);
  }
  (particles, velocities)
}
