use crate::OrbitParams;
use cgmath::Vector3;

/// Reversed index used for layout: the first project orbits farthest out,
/// the last one closest to the sun.
#[inline]
pub fn orbit_index(project_count: usize, index: usize) -> usize {
  project_count - 1 - index
}

#[inline]
fn orbit_radius(params: &OrbitParams, j: usize) -> f32 {
  params.base_radius + params.radius_step * j as f32
}

/// Position of one planet at simulated time `time`. The angle is formed in
/// f64 so a long-running clock keeps its resolution.
pub fn planet_position(params: &OrbitParams, j: usize, time: f64) -> Vector3<f32> {
  let radius = orbit_radius(params, j);
  let j = j as f32;
  let base_angle = params.angle_step * j + params.angle_offset;
  let speed = params.base_speed / (j + 1.0);
  let height = params.height * (params.height_freq * j).sin();
  let angle = (f64::from(base_angle) + time * f64::from(speed)).rem_euclid(std::f64::consts::TAU) as f32;
  Vector3::new(radius * angle.cos(), height, radius * angle.sin())
}

/// Positions of all planets, in project list order.
#[must_use]
pub fn planet_positions(params: &OrbitParams, project_count: usize, time: f64) -> Vec<Vector3<f32>> {
  (0..project_count)
    .map(|i| planet_position(params, orbit_index(project_count, i), time))
    .collect()
}
