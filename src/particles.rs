use crate::initialize::{create_dust, create_galaxy};
use crate::{DustParams, GalaxyParams, Particle};
use rand::Rng;

/// Add each velocity to its particle and reflect any axis that left the
/// box by negating it. Negation flips the particle to the mirrored point,
/// it does not wrap to the opposite face, and the velocity is untouched.
pub fn update_dust(particles: &mut [Particle], velocities: &[[f32; 3]], bounds: [f32; 3]) {
  for (p, v) in particles.iter_mut().zip(velocities) {
    for axis in 0..3 {
      p.pos[axis] += v[axis];
      if p.pos[axis].abs() > bounds[axis] {
        p.pos[axis] = -p.pos[axis];
      }
    }
  }
}

/// Ambient dust that drifts every frame, independent of navigation.
pub struct DustField {
  particles: Vec<Particle>,
  velocities: Vec<[f32; 3]>,
  bounds: [f32; 3],
}

impl DustField {
  pub fn generate<R: Rng + ?Sized>(params: &DustParams, rng: &mut R) -> Self {
    let (particles, velocities) = create_dust(params, rng);
    Self {
      particles,
      velocities,
      bounds: params.bounds(),
    }
  }

  pub fn update(&mut self) {
    update_dust(&mut self.particles, &self.velocities, self.bounds);
  }

  pub fn particles(&self) -> &[Particle] {
    &self.particles
  }
}

/// Static spiral galaxy slowly spinning about +Y.
pub struct GalaxyField {
  base: Vec<Particle>,
  rotated: Vec<Particle>,
  angle: f32,
  spin_per_frame: f32,
}

impl GalaxyField {
  pub fn generate<R: Rng + ?Sized>(params: &GalaxyParams, rng: &mut R) -> Self {
    let base = create_galaxy(params, rng);
    Self {
      rotated: base.clone(),
      base,
      angle: 0.0,
      spin_per_frame: params.spin_per_frame,
    }
  }

  pub fn update(&mut self) {
    self.angle = (self.angle + self.spin_per_frame) % std::f32::consts::TAU;
    let (s, c) = self.angle.sin_cos();
    for (out, p) in self.rotated.iter_mut().zip(&self.base) {
      let [x, y, z] = p.pos;
      out.pos = [x * c + z * s, y, -x * s + z * c];
    }
  }

  pub fn angle(&self) -> f32 {
    self.angle
  }

  pub fn particles(&self) -> &[Particle] {
    &self.rotated
  }
}
