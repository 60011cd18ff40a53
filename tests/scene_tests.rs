use cgmath::{InnerSpace, Vector3};
use orrery::camera::{camera_pose, MousePosition};
use orrery::content::{bundled_projects, parse_projects, Project};
use orrery::initialize::{galaxy_color, NEAR_BLACK};
use orrery::orbit::planet_positions;
use orrery::particles::update_dust;
use orrery::scene::{Scene, SceneConfig};
use orrery::scroll::{ProgressSmoother, ScrollController, ScrollInput, OVERVIEW_INDEX};
use orrery::{CameraParams, DustParams, GalaxyParams, OrbitParams, Particle, ScrollParams};
use std::time::Duration;

const TICK: Duration = Duration::from_micros(16_667);

fn projects(n: usize) -> Vec<Project> {
  let items: Vec<String> = (0..n)
    .map(|i| format!(r#"{{"id": "p{i}", "title": "Project {i}", "description": "", "status": "planned"}}"#))
    .collect();
  parse_projects(&format!("[{}]", items.join(","))).unwrap()
}

fn light_config() -> SceneConfig {
  SceneConfig {
    galaxy: GalaxyParams {
      particle_count: 300,
      ..Default::default()
    },
    dust: DustParams {
      particle_count: 300,
      ..Default::default()
    },
    ..Default::default()
  }
}

#[test]
fn orbit_positions_are_deterministic() {
  let params = OrbitParams::default();
  assert_eq!(planet_positions(&params, 5, 7.5), planet_positions(&params, 5, 7.5));
}

#[test]
fn first_project_has_widest_orbit() {
  let positions = planet_positions(&OrbitParams::default(), 5, 0.0);
  let radius = |p: Vector3<f32>| Vector3::new(p.x, 0.0, p.z).magnitude();
  let radii: Vec<f32> = positions.into_iter().map(radius).collect();
  let widest = radii.iter().cloned().fold(f32::MIN, f32::max);
  let narrowest = radii.iter().cloned().fold(f32::MAX, f32::min);
  assert_eq!(radii[0], widest);
  assert_eq!(radii[4], narrowest);
  assert!((radii[0] - 92.0).abs() < 1e-3);
  assert!((radii[4] - 20.0).abs() < 1e-3);
}

#[test]
fn scroll_target_is_clamped_at_both_ends() {
  let n = 4;
  let mut c = ScrollController::new(n, ScrollParams::default());
  c.navigate_to(n as i32 - 1);
  let mut now = 100_000;
  for _ in 0..20 {
    c.handle(ScrollInput::Wheel { delta_y: 500.0 }, now);
    now += 5_000;
  }
  assert_eq!(c.target_index(), 3);

  c.navigate_to(OVERVIEW_INDEX);
  for _ in 0..20 {
    c.handle(ScrollInput::Wheel { delta_y: -500.0 }, now);
    now += 5_000;
  }
  assert_eq!(c.target_index(), OVERVIEW_INDEX);
}

#[test]
fn integrator_reaches_target_exactly() {
  let mut s = ProgressSmoother::new(-1.0, &ScrollParams::default());
  let mut previous = -1.0;
  for _ in 0..200 {
    let v = s.step(2.0);
    assert!(v >= previous && v <= 2.0);
    previous = v;
  }
  assert_eq!(s.displayed(), 2.0);
}

#[test]
fn bursts_inside_cooldown_count_once() {
  let mut c = ScrollController::new(5, ScrollParams::default());
  let first = c.handle(ScrollInput::Wheel { delta_y: 60.0 }, 10_000);
  let second = c.handle(ScrollInput::Wheel { delta_y: 60.0 }, 10_500);
  assert!(first.is_some());
  assert!(second.is_none());
  assert_eq!(c.target_index(), 0);
}

#[test]
fn dust_reflects_per_axis() {
  let mut dust = vec![Particle {
    pos: [151.0, 99.0, -20.0],
    color: [0.5; 3],
    size: 0.2,
  }];
  update_dust(&mut dust, &[[0.05, 0.02, 0.01]], DustParams::default().bounds());
  assert!((dust[0].pos[0] + 151.05).abs() < 1e-3);
  assert!((dust[0].pos[1] - 99.02).abs() < 1e-4);
  assert!((dust[0].pos[2] + 19.99).abs() < 1e-4);
}

#[test]
fn galaxy_core_and_rim_colors() {
  assert_eq!(galaxy_color(5.0), [1.0, 1.0, 0.0]);
  let rim = galaxy_color(150.0);
  for (c, expected) in rim.iter().zip(NEAR_BLACK) {
    assert!((c - expected).abs() < 1e-6);
  }
}

#[test]
fn parallax_shifts_eye_not_target() {
  let params = CameraParams::default();
  let planets = planet_positions(&OrbitParams::default(), 3, 2.0);
  let still = camera_pose(&params, 0.4, &planets, MousePosition::new(0.0, 0.0));
  let moved = camera_pose(&params, 0.4, &planets, MousePosition::new(1.0, 1.0));
  let shift = moved.eye - still.eye;
  assert!((shift - Vector3::new(4.0, 3.0, 0.0)).magnitude() < 1e-4);
  assert_eq!(moved.target, still.target);
}

#[test]
fn swipe_flies_camera_to_first_planet() {
  let mut scene = Scene::new(projects(3), light_config());
  let start = scene.frame();
  assert!(start.overview);

  let t = scene.handle_input(ScrollInput::Wheel { delta_y: 120.0 }, 5_000);
  assert!(t.is_some());
  assert_eq!(scene.target_index(), 0);

  let mut last = scene.frame();
  for _ in 0..300 {
    scene.advance(TICK);
    last = scene.frame();
  }
  assert_eq!(last.progress, 0.0);
  assert!(!last.overview);
  assert_eq!(last.active_index, 0);
  assert!(!last.label_visible(0));
  assert!(last.label_visible(1));
  // parked: looking straight at planet 0
  assert!((last.pose.target - last.planets[0]).magnitude() < 1e-4);
}

#[test]
fn orbit_clock_keeps_planets_moving() {
  let mut scene = Scene::new(projects(2), light_config());
  let before = scene.frame().planets;
  for _ in 0..120 {
    scene.advance(TICK);
  }
  let after = scene.frame().planets;
  assert!(scene.time() > 0.0);
  assert_ne!(before, after);
}

#[test]
fn empty_project_list_is_all_overview() {
  let mut scene = Scene::new(Vec::new(), light_config());
  assert_eq!(scene.navigate_to(2), None);
  scene.advance(Duration::from_secs(1));
  let snap = scene.frame();
  assert!(snap.planets.is_empty());
  assert!(snap.overview);
  assert_eq!(scene.body_particles(&snap).len(), 1);
}

#[test]
fn bundled_content_drives_a_scene() {
  let projects = bundled_projects();
  let n = projects.len();
  let mut scene = Scene::new(projects, light_config());
  scene.navigate_to(99);
  assert_eq!(scene.target_index(), n as i32 - 1);
  assert_eq!(scene.frame().planets.len(), n);
}
