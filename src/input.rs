use crate::camera::MousePosition;
use crate::scroll::{ScrollInput, OVERVIEW_INDEX};
use cgmath::{InnerSpace, Vector3};
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{
  ElementState, KeyEvent, MouseButton, MouseScrollDelta, Touch, TouchPhase, WindowEvent,
};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Pixels one wheel notch is worth, so line-based mice feed the same
/// accumulator threshold as pixel-precise trackpads.
pub const LINE_HEIGHT_PX: f32 = 50.0;

/// Radius of the sphere a click has to hit to select a planet.
pub const PLANET_PICK_RADIUS: f32 = 4.0;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Action {
  Scroll(ScrollInput),
  Pointer(MousePosition),
  /// Click at normalized device coordinates, y up.
  Pick { ndc_x: f32, ndc_y: f32 },
  Navigate(i32),
  Quit,
}

/// Forward scroll distance of a wheel event. winit reports positive y
/// for scrolling up (away from the user), which moves backward here.
pub fn wheel_delta(delta: MouseScrollDelta, scale_factor: f64) -> f32 {
  match delta {
    MouseScrollDelta::LineDelta(_, y) => -y * LINE_HEIGHT_PX,
    MouseScrollDelta::PixelDelta(pos) => -(pos.to_logical::<f64>(scale_factor).y as f32),
  }
}

/// Cursor offset from the center of the window. Screen y grows downward
/// and is kept that way.
pub fn normalize_cursor(x: f64, y: f64, size: PhysicalSize<u32>) -> MousePosition {
  let w = size.width.max(1) as f64;
  let h = size.height.max(1) as f64;
  MousePosition::new(((x / w - 0.5) * 2.0) as f32, ((y / h - 0.5) * 2.0) as f32)
}

pub fn cursor_ndc(x: f64, y: f64, size: PhysicalSize<u32>) -> (f32, f32) {
  let w = size.width.max(1) as f64;
  let h = size.height.max(1) as f64;
  ((x / w * 2.0 - 1.0) as f32, (1.0 - y / h * 2.0) as f32)
}

pub fn key_action(code: KeyCode) -> Option<Action> {
  let digit = match code {
    KeyCode::Digit0 => 0,
    KeyCode::Digit1 => 1,
    KeyCode::Digit2 => 2,
    KeyCode::Digit3 => 3,
    KeyCode::Digit4 => 4,
    KeyCode::Digit5 => 5,
    KeyCode::Digit6 => 6,
    KeyCode::Digit7 => 7,
    KeyCode::Digit8 => 8,
    KeyCode::Digit9 => 9,
    KeyCode::Home => return Some(Action::Navigate(OVERVIEW_INDEX)),
    KeyCode::Escape => return Some(Action::Quit),
    _ => return None,
  };
  Some(Action::Navigate(digit))
}

/// Distance along the ray to the first hit, if any. `ray_dir` must be unit length.
pub fn ray_sphere(
  ray_origin: Vector3<f32>,
  ray_dir: Vector3<f32>,
  center: Vector3<f32>,
  radius: f32,
) -> Option<f32> {
  let oc = ray_origin - center;
  let b = oc.dot(ray_dir);
  let c = oc.dot(oc) - radius * radius;
  let disc = b * b - c;
  if disc < 0.0 {
    return None;
  }
  let t = -b - disc.sqrt();
  (t >= 0.0).then_some(t)
}

/// Index of the nearest planet the ray passes through.
pub fn pick_planet(
  ray_origin: Vector3<f32>,
  ray_dir: Vector3<f32>,
  planets: &[Vector3<f32>],
  radius: f32,
) -> Option<usize> {
  planets
    .iter()
    .enumerate()
    .filter_map(|(i, &c)| ray_sphere(ray_origin, ray_dir, c, radius).map(|t| (i, t)))
    .min_by(|a, b| a.1.total_cmp(&b.1))
    .map(|(i, _)| i)
}

/// Remembers what a single window event does not carry: where the cursor
/// is, how big the window is and its DPI scale.
pub struct InputMapper {
  cursor: PhysicalPosition<f64>,
  size: PhysicalSize<u32>,
  scale_factor: f64,
}

impl InputMapper {
  pub fn new(size: PhysicalSize<u32>, scale_factor: f64) -> Self {
    Self {
      cursor: PhysicalPosition::new(size.width as f64 / 2.0, size.height as f64 / 2.0),
      size,
      scale_factor,
    }
  }

  pub fn map(&mut self, event: &WindowEvent) -> Option<Action> {
    match event {
      WindowEvent::Resized(size) => {
        self.size = *size;
        None
      }
      WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
        self.scale_factor = *scale_factor;
        None
      }
      WindowEvent::CloseRequested => Some(Action::Quit),
      WindowEvent::MouseWheel { delta, .. } => Some(Action::Scroll(ScrollInput::Wheel {
        delta_y: wheel_delta(*delta, self.scale_factor),
      })),
      WindowEvent::CursorMoved { position, .. } => {
        self.cursor = *position;
        Some(Action::Pointer(normalize_cursor(position.x, position.y, self.size)))
      }
      WindowEvent::MouseInput {
        state: ElementState::Pressed,
        button: MouseButton::Left,
        ..
      } => {
        let (ndc_x, ndc_y) = cursor_ndc(self.cursor.x, self.cursor.y, self.size);
        Some(Action::Pick { ndc_x, ndc_y })
      }
      WindowEvent::Touch(Touch {
        phase, location, ..
      }) => {
        let y = location.to_logical::<f32>(self.scale_factor).y;
        let input = match phase {
          TouchPhase::Started => ScrollInput::TouchStart { y },
          TouchPhase::Moved => ScrollInput::TouchMove { y },
          TouchPhase::Ended => ScrollInput::TouchEnd,
          TouchPhase::Cancelled => return None,
        };
        Some(Action::Scroll(input))
      }
      WindowEvent::KeyboardInput {
        event:
          KeyEvent {
            state: ElementState::Pressed,
            physical_key: PhysicalKey::Code(code),
            ..
          },
        ..
      } => key_action(*code),
      _ => None,
    }
  }
}
