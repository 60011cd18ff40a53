//! The one place that owns mutable scene state.
//!
//! Two periodic tasks drive it. `advance` runs the fixed-rate work (scroll
//! easing at `smoothing_hz`, the orbit clock at its own tick) and `frame`
//! runs once per rendered frame, producing a snapshot the renderer reads.

use crate::camera::{camera_pose, CameraPose, MousePosition};
use crate::content::{find_project, Project, ProjectStatus};
use crate::initialize::SUN_YELLOW;
use crate::input::{pick_planet, PLANET_PICK_RADIUS};
use crate::orbit::planet_positions;
use crate::particles::{DustField, GalaxyField};
use crate::scroll::{ProgressSmoother, ScrollController, ScrollInput, Transition, OVERVIEW_INDEX};
use crate::time::{FixedTimestep, OrbitClock};
use crate::{CameraParams, DustParams, GalaxyParams, OrbitParams, Particle, ScrollParams};
use cgmath::Vector3;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::time::Duration;

/// Displayed progress at or below this counts as the overview.
pub const OVERVIEW_THRESHOLD: f32 = -0.95;

const SUN_SIZE: f32 = 6.0;
const PLANET_SIZE: f32 = 1.6;
const ACTIVE_PLANET_SIZE: f32 = 2.2;
/// planets that carry their own model are drawn this much larger
const MODEL_SCALE: f32 = 1.25;

#[derive(Copy, Clone, Debug)]
pub struct SceneConfig {
  pub seed: u64,
  pub orbit: OrbitParams,
  pub galaxy: GalaxyParams,
  pub dust: DustParams,
  pub scroll: ScrollParams,
  pub camera: CameraParams,
}

impl Default for SceneConfig {
  fn default() -> Self {
    Self {
      seed: 42,
      orbit: OrbitParams::default(),
      galaxy: GalaxyParams::default(),
      dust: DustParams::default(),
      scroll: ScrollParams::default(),
      camera: CameraParams::default(),
    }
  }
}

/// What one rendered frame needs to know.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSnapshot {
  pub planets: Vec<Vector3<f32>>,
  pub pose: CameraPose,
  pub progress: f32,
  pub target: i32,
  pub active_index: usize,
  pub overview: bool,
}

impl FrameSnapshot {
  /// Labels hide for the planet the camera is parked on.
  pub fn label_visible(&self, index: usize) -> bool {
    self.progress < 0.0 || index != self.active_index
  }
}

pub fn active_index(progress: f32, project_count: usize) -> usize {
  let i = progress.round().max(0.0) as usize;
  i.min(project_count.saturating_sub(1))
}

fn planet_size(focused: bool, has_model: bool) -> f32 {
  let size = if focused { ACTIVE_PLANET_SIZE } else { PLANET_SIZE };
  if has_model {
    size * MODEL_SCALE
  } else {
    size
  }
}

fn status_color(status: ProjectStatus) -> [f32; 3] {
  match status {
    ProjectStatus::Completed => [0.35, 0.75, 1.0],
    ProjectStatus::InProgress => [1.0, 0.6, 0.2],
    ProjectStatus::Planned => [0.6, 0.6, 0.65],
  }
}

pub struct Scene {
  projects: Vec<Project>,
  config: SceneConfig,
  scroll: ScrollController,
  smoother: ProgressSmoother,
  smoothing: FixedTimestep,
  clock: OrbitClock,
  mouse: MousePosition,
  galaxy: GalaxyField,
  dust: DustField,
}

impl Scene {
  pub fn new(projects: Vec<Project>, config: SceneConfig) -> Self {
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let galaxy = GalaxyField::generate(&config.galaxy, &mut rng);
    let dust = DustField::generate(&config.dust, &mut rng);
    log::info!(
      "scene: {} projects, {} galaxy points, {} dust points",
      projects.len(),
      galaxy.particles().len(),
      dust.particles().len()
    );

    Self {
      scroll: ScrollController::new(projects.len(), config.scroll),
      smoother: ProgressSmoother::new(OVERVIEW_INDEX as f32, &config.scroll),
      smoothing: FixedTimestep::from_hz(config.scroll.smoothing_hz),
      clock: OrbitClock::new(config.orbit.tick, config.orbit.time_step),
      mouse: MousePosition::default(),
      projects,
      config,
      galaxy,
      dust,
    }
  }

  pub fn projects(&self) -> &[Project] {
    &self.projects
  }

  fn announce(&self, transition: Transition) {
    match usize::try_from(transition.to).ok().and_then(|i| self.projects.get(i)) {
      Some(p) => log::info!("viewing [{}] {}", transition.to, p.title),
      None => log::info!("viewing overview"),
    }
  }

  /// Feed one wheel or touch event stamped with a monotonic millisecond clock.
  pub fn handle_input(&mut self, input: ScrollInput, now_ms: u64) -> Option<Transition> {
    let effect = self.scroll.handle(input, now_ms);
    if let Some(t) = effect {
      self.announce(t);
    }
    effect
  }

  pub fn navigate_to(&mut self, index: i32) -> Option<Transition> {
    let effect = self.scroll.navigate_to(index);
    if let Some(t) = effect {
      self.announce(t);
    }
    effect
  }

  /// Navigate to the project a free-text query resolves to.
  pub fn navigate_query(&mut self, query: &str) -> Option<usize> {
    let index = find_project(&self.projects, query)?;
    self.navigate_to(index as i32);
    Some(index)
  }

  /// Navigate to whichever planet the ray hits first.
  pub fn pick(&mut self, ray_origin: Vector3<f32>, ray_dir: Vector3<f32>) -> Option<usize> {
    let planets = self.planets();
    let index = pick_planet(ray_origin, ray_dir, &planets, PLANET_PICK_RADIUS)?;
    self.navigate_to(index as i32);
    Some(index)
  }

  pub fn set_mouse(&mut self, mouse: MousePosition) {
    self.mouse = mouse;
  }

  /// Run the fixed-rate tasks for `dt` of wall-clock time.
  pub fn advance(&mut self, dt: Duration) {
    let target = self.scroll.target_index() as f32;
    for _ in 0..self.smoothing.accumulate(dt) {
      self.smoother.step(target);
    }
    self.clock.advance(dt);
  }

  pub fn target_index(&self) -> i32 {
    self.scroll.target_index()
  }

  pub fn progress(&self) -> f32 {
    self.smoother.displayed()
  }

  pub fn time(&self) -> f64 {
    self.clock.time()
  }

  pub fn planets(&self) -> Vec<Vector3<f32>> {
    planet_positions(&self.config.orbit, self.projects.len(), self.clock.time())
  }

  /// Per-frame pass: drift the dust, spin the galaxy, place the planets,
  /// then the camera.
  pub fn frame(&mut self) -> FrameSnapshot {
    self.dust.update();
    self.galaxy.update();

    let planets = self.planets();
    let progress = self.smoother.displayed();
    let pose = camera_pose(&self.config.camera, progress, &planets, self.mouse);

    FrameSnapshot {
      active_index: active_index(progress, planets.len()),
      overview: progress <= OVERVIEW_THRESHOLD,
      target: self.scroll.target_index(),
      planets,
      pose,
      progress,
    }
  }

  pub fn galaxy_particles(&self) -> &[Particle] {
    self.galaxy.particles()
  }

  pub fn dust_particles(&self) -> &[Particle] {
    self.dust.particles()
  }

  /// Sun plus one point per planet. The focused planet and planets with a
  /// model asset are drawn larger.
  pub fn body_particles(&self, snapshot: &FrameSnapshot) -> Vec<Particle> {
    let sun = Particle {
      pos: [0.0; 3],
      color: SUN_YELLOW,
      size: SUN_SIZE,
    };
    let planets = snapshot.planets.iter().zip(&self.projects).enumerate().map(|(i, (p, project))| {
      let focused = !snapshot.overview && i == snapshot.active_index;
      Particle {
        pos: [p.x, p.y, p.z],
        color: status_color(project.status),
        size: planet_size(focused, project.model_path.is_some()),
      }
    });
    std::iter::once(sun).chain(planets).collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::content::parse_projects;

  fn small_config() -> SceneConfig {
    SceneConfig {
      galaxy: GalaxyParams {
        particle_count: 200,
        ..Default::default()
      },
      dust: DustParams {
        particle_count: 100,
        ..Default::default()
      },
      ..Default::default()
    }
  }

  fn projects(n: usize) -> Vec<Project> {
    let items: Vec<String> = (0..n)
      .map(|i| format!(r#"{{"id": "p{i}", "title": "Project {i}", "description": "", "status": "completed"}}"#))
      .collect();
    parse_projects(&format!("[{}]", items.join(","))).unwrap()
  }

  #[test]
  fn starts_in_overview() {
    let mut scene = Scene::new(projects(3), small_config());
    let snap = scene.frame();
    assert_eq!(snap.target, OVERVIEW_INDEX);
    assert_eq!(snap.progress, -1.0);
    assert!(snap.overview);
    assert_eq!(snap.planets.len(), 3);
    assert!((0..3).all(|i| snap.label_visible(i)));
  }

  #[test]
  fn active_index_rounds_and_clamps() {
    assert_eq!(active_index(-1.0, 4), 0);
    assert_eq!(active_index(-0.4, 4), 0);
    assert_eq!(active_index(1.49, 4), 1);
    assert_eq!(active_index(1.5, 4), 2);
    assert_eq!(active_index(3.0, 4), 3);
    assert_eq!(active_index(0.0, 0), 0);
  }

  #[test]
  fn label_hidden_only_for_parked_planet() {
    let snap = FrameSnapshot {
      planets: Vec::new(),
      pose: CameraPose {
        eye: Vector3::new(0.0, 0.0, 0.0),
        target: Vector3::new(0.0, 0.0, 0.0),
      },
      progress: 1.0,
      target: 1,
      active_index: 1,
      overview: false,
    };
    assert!(snap.label_visible(0));
    assert!(!snap.label_visible(1));
  }

  #[test]
  fn easing_runs_at_fixed_rate() {
    let mut scene = Scene::new(projects(3), small_config());
    scene.navigate_to(0);
    // under one 60 Hz tick: nothing moves yet
    scene.advance(Duration::from_millis(10));
    assert_eq!(scene.progress(), -1.0);
    scene.advance(Duration::from_millis(10));
    assert!((scene.progress() - (-1.0 + 0.08)).abs() < 1e-6);
  }

  #[test]
  fn query_navigation() {
    let mut scene = Scene::new(projects(4), small_config());
    assert_eq!(scene.navigate_query("project 2"), Some(2));
    assert_eq!(scene.target_index(), 2);
    assert_eq!(scene.navigate_query("missing"), None);
    assert_eq!(scene.target_index(), 2);
  }

  #[test]
  fn bodies_include_sun() {
    let mut scene = Scene::new(projects(2), small_config());
    let snap = scene.frame();
    let bodies = scene.body_particles(&snap);
    assert_eq!(bodies.len(), 3);
    assert_eq!(bodies[0].pos, [0.0; 3]);
    assert!(bodies[1..].iter().all(|b| b.size == PLANET_SIZE));
  }

  #[test]
  fn model_backed_planets_draw_larger() {
    let mut ps = projects(2);
    ps[1].model_path = Some("/models/p1.glb".to_string());
    let mut scene = Scene::new(ps, small_config());
    let snap = scene.frame();
    let bodies = scene.body_particles(&snap);
    assert_eq!(bodies[1].size, PLANET_SIZE);
    assert!((bodies[2].size - PLANET_SIZE * MODEL_SCALE).abs() < 1e-6);
  }

  #[test]
  fn same_seed_same_fields() {
    let a = Scene::new(projects(1), small_config());
    let b = Scene::new(projects(1), small_config());
    assert_eq!(a.galaxy_particles(), b.galaxy_particles());
    assert_eq!(a.dust_particles(), b.dust_particles());
  }
}
