use crate::CameraParams;
use cgmath::{EuclideanSpace, InnerSpace, Matrix, SquareMatrix, Vector3, VectorSpace};
use std::f32::consts::PI;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Cursor offset from the viewport center, each axis in [-1, 1].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct MousePosition {
  pub x: f32,
  pub y: f32,
}

impl MousePosition {
  pub fn new(x: f32, y: f32) -> Self {
    Self {
      x: x.clamp(-1.0, 1.0),
      y: y.clamp(-1.0, 1.0),
    }
  }
}

/// Where the camera sits and what it looks at.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CameraPose {
  pub eye: Vector3<f32>,
  pub target: Vector3<f32>,
}

/// Unit vector from the world origin toward `p`, flattened onto the XZ plane.
fn radial(p: Vector3<f32>) -> Vector3<f32> {
  let flat = Vector3::new(p.x, 0.0, p.z);
  if flat.magnitude2() == 0.0 {
    flat
  } else {
    flat.normalize()
  }
}

/// Pose hovering just outside `planet`, looking at it.
fn focus_pose(params: &CameraParams, planet: Vector3<f32>, lift: f32) -> CameraPose {
  let eye = planet + radial(planet) * params.approach_distance + Vector3::unit_y() * lift;
  CameraPose { eye, target: planet }
}

fn overview_pose(params: &CameraParams) -> CameraPose {
  CameraPose {
    eye: params.overview_eye.into(),
    target: Vector3::new(0.0, 0.0, 0.0),
  }
}

fn parallax(params: &CameraParams, mouse: MousePosition) -> Vector3<f32> {
  Vector3::new(mouse.x * params.parallax[0], mouse.y * params.parallax[1], 0.0)
}

/// Camera pose for a displayed scroll `progress`.
///
/// Progress in [-1, 0) flies from the overview toward the first planet;
/// progress in [0, N-1] moves between neighbouring planets. During a move
/// the camera hops over the scene along a sine arc. The mouse nudges the
/// eye only, never the look-at target.
pub fn camera_pose(
  params: &CameraParams,
  progress: f32,
  planets: &[Vector3<f32>],
  mouse: MousePosition,
) -> CameraPose {
  if planets.is_empty() {
    let pose = overview_pose(params);
    return CameraPose {
      eye: pose.eye + parallax(params, mouse),
      target: pose.target,
    };
  }

  let max_index = (planets.len() - 1) as f32;
  let progress = progress.clamp(-1.0, max_index);

  let (from, to, t) = if progress < 0.0 {
    (
      overview_pose(params),
      focus_pose(params, planets[0], params.overview_lift),
      progress + 1.0,
    )
  } else {
    let current = progress.floor() as usize;
    let next = (current + 1).min(planets.len() - 1);
    (
      focus_pose(params, planets[current], params.focus_lift),
      focus_pose(params, planets[next], params.focus_lift),
      progress - current as f32,
    )
  };

  let mut eye = from.eye.lerp(to.eye, t);
  if t > 0.0 && t < 1.0 {
    eye.y += params.arc_height * (t * PI).sin();
  }
  eye += parallax(params, mouse);

  CameraPose {
    eye,
    target: from.target.lerp(to.target, t),
  }
}

pub struct Camera {
  pub eye: cgmath::Point3<f32>,
  pub target: cgmath::Point3<f32>,
  pub up: cgmath::Vector3<f32>,
  pub aspect: f32,
  pub fovy: f32,
  pub znear: f32,
  pub zfar: f32,
}

impl Camera {
  pub fn new(aspect: f32) -> Self {
    Self {
      eye: (120.0, 80.0, 120.0).into(),
      target: (0.0, 0.0, 0.0).into(),
      up: cgmath::Vector3::unit_y(),
      aspect,
      fovy: 60.0,
      znear: 0.1,
      zfar: 1000.0,
    }
  }

  pub fn set_pose(&mut self, pose: &CameraPose) {
    self.eye = cgmath::Point3::from_vec(pose.eye);
    self.target = cgmath::Point3::from_vec(pose.target);
  }

  pub fn view_matrix(&self) -> cgmath::Matrix4<f32> {
    cgmath::Matrix4::look_at_rh(self.eye, self.target, self.up)
  }

  pub fn build_view_projection_matrix(&self) -> cgmath::Matrix4<f32> {
    let proj = cgmath::perspective(cgmath::Deg(self.fovy), self.aspect, self.znear, self.zfar);
    OPENGL_TO_WGPU_MATRIX * proj * self.view_matrix()
  }

  /// World-space ray through normalized device coordinates (`ndc_x`, `ndc_y` in [-1, 1], y up).
  pub fn ray(&self, ndc_x: f32, ndc_y: f32) -> Option<(Vector3<f32>, Vector3<f32>)> {
    let inv = self.build_view_projection_matrix().invert()?;
    let near = inv * cgmath::Vector4::new(ndc_x, ndc_y, 0.0, 1.0);
    let far = inv * cgmath::Vector4::new(ndc_x, ndc_y, 1.0, 1.0);
    let far = far.truncate() / far.w;
    let origin = near.truncate() / near.w;
    Some((origin, (far - origin).normalize()))
  }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
  view_proj: [[f32; 4]; 4],
  // camera basis for billboarding, w unused
  right: [f32; 4],
  up: [f32; 4],
}

impl CameraUniform {
  pub fn new() -> Self {
    Self {
      view_proj: cgmath::Matrix4::identity().into(),
      right: [1.0, 0.0, 0.0, 0.0],
      up: [0.0, 1.0, 0.0, 0.0],
    }
  }

  pub fn update_view_proj(&mut self, camera: &Camera) {
    self.view_proj = camera.build_view_projection_matrix().into();
    // rows of the view rotation are the camera axes in world space
    let view = camera.view_matrix().transpose();
    self.right = [view.x.x, view.x.y, view.x.z, 0.0];
    self.up = [view.y.x, view.y.y, view.y.z, 0.0];
  }
}

impl Default for CameraUniform {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::orbit::planet_positions;
  use crate::OrbitParams;

  fn close(a: Vector3<f32>, b: Vector3<f32>) -> bool {
    (a - b).magnitude() < 1e-4
  }

  fn planets(n: usize) -> Vec<Vector3<f32>> {
    planet_positions(&OrbitParams::default(), n, 1.5)
  }

  #[test]
  fn full_overview_pose() {
    let params = CameraParams::default();
    let pose = camera_pose(&params, -1.0, &planets(3), MousePosition::default());
    assert!(close(pose.eye, Vector3::new(120.0, 80.0, 120.0)));
    assert!(close(pose.target, Vector3::new(0.0, 0.0, 0.0)));
  }

  #[test]
  fn settled_on_planet() {
    let params = CameraParams::default();
    let ps = planets(3);
    let pose = camera_pose(&params, 1.0, &ps, MousePosition::default());
    let expected = ps[1] + radial(ps[1]) * 12.0 + Vector3::new(0.0, 3.0, 0.0);
    assert!(close(pose.eye, expected));
    assert!(close(pose.target, ps[1]));
  }

  #[test]
  fn overview_lands_higher_over_first_planet() {
    let params = CameraParams::default();
    let ps = planets(3);
    let pose = camera_pose(&params, 0.0, &ps, MousePosition::default());
    // progress 0 is in the planet regime: lift 3
    assert!((pose.eye.y - (ps[0].y + 3.0)).abs() < 1e-4);
    // just before 0, the approach targets a lift of 6 and the arc is nearly gone
    let almost = camera_pose(&params, -1e-4, &ps, MousePosition::default());
    assert!((almost.eye.y - (ps[0].y + 6.0)).abs() < 0.05);
  }

  #[test]
  fn midway_arc_adds_hop() {
    let params = CameraParams::default();
    let ps = planets(3);
    let a = focus_pose(&params, ps[0], 3.0);
    let b = focus_pose(&params, ps[1], 3.0);
    let pose = camera_pose(&params, 0.5, &ps, MousePosition::default());
    let flat = a.eye.lerp(b.eye, 0.5);
    assert!((pose.eye.y - (flat.y + 8.0)).abs() < 1e-3);
    assert!(close(pose.target, a.target.lerp(b.target, 0.5)));
  }

  #[test]
  fn parallax_moves_eye_only() {
    let params = CameraParams::default();
    let ps = planets(4);
    for progress in [-1.0, -0.3, 0.0, 1.7, 3.0] {
      let still = camera_pose(&params, progress, &ps, MousePosition::new(0.0, 0.0));
      let moved = camera_pose(&params, progress, &ps, MousePosition::new(1.0, 1.0));
      assert!(close(moved.eye - still.eye, Vector3::new(4.0, 3.0, 0.0)));
      assert_eq!(moved.target, still.target);
    }
  }

  #[test]
  fn progress_past_end_is_clamped() {
    let params = CameraParams::default();
    let ps = planets(3);
    let at_end = camera_pose(&params, 2.0, &ps, MousePosition::default());
    let beyond = camera_pose(&params, 2.0001, &ps, MousePosition::default());
    assert_eq!(at_end, beyond);
  }

  #[test]
  fn no_planets_means_overview() {
    let params = CameraParams::default();
    let pose = camera_pose(&params, 2.0, &[], MousePosition::new(-1.0, 0.5));
    assert!(close(pose.eye, Vector3::new(116.0, 81.5, 120.0)));
  }

  #[test]
  fn ray_through_center_points_at_target() {
    let mut camera = Camera::new(16.0 / 9.0);
    camera.set_pose(&CameraPose {
      eye: Vector3::new(0.0, 0.0, 50.0),
      target: Vector3::new(0.0, 0.0, 0.0),
    });
    let (_, dir) = camera.ray(0.0, 0.0).unwrap();
    assert!(close(dir, Vector3::new(0.0, 0.0, -1.0)));
  }
}
