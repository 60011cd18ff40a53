//! Discrete navigation from continuous wheel and touch input.
//!
//! A trackpad emits dozens of small wheel deltas for one physical gesture.
//! Deltas are summed until they cross a threshold, at which point the
//! target index moves by exactly one and further input is ignored for a
//! while. The displayed progress then eases toward that target every tick.
//!
//! Time is injected as milliseconds on a monotonic clock so the machine
//! can be driven without real timers.

use crate::ScrollParams;

/// Index meaning "camera pulled back over the whole system".
pub const OVERVIEW_INDEX: i32 = -1;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Debounce {
  Idle,
  CoolingDown { until: u64 },
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ScrollInput {
  /// Positive scrolls forward (toward later projects).
  Wheel { delta_y: f32 },
  TouchStart { y: f32 },
  TouchMove { y: f32 },
  TouchEnd,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Transition {
  pub from: i32,
  pub to: i32,
}

/// Everything the controller remembers between events.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScrollState {
  pub target: i32,
  pub debounce: Debounce,
  pub accumulated: f32,
  pub last_wheel_at: Option<u64>,
  pub last_accepted_at: Option<u64>,
  pub touch_start_y: f32,
  pub touch_end_y: f32,
}

impl ScrollState {
  pub fn new(target: i32) -> Self {
    Self {
      target,
      debounce: Debounce::Idle,
      accumulated: 0.0,
      last_wheel_at: None,
      last_accepted_at: None,
      touch_start_y: 0.0,
      touch_end_y: 0.0,
    }
  }

  pub fn is_cooling_down(&self, now: u64) -> bool {
    matches!(self.debounce, Debounce::CoolingDown { until } if now < until)
  }

  fn within_cooldown(&self, now: u64, cooldown_ms: u64) -> bool {
    self
      .last_accepted_at
      .is_some_and(|t| now.saturating_sub(t) < cooldown_ms)
  }
}

/// Highest valid target for `project_count` projects.
#[inline]
pub fn max_index(project_count: usize) -> i32 {
  project_count as i32 - 1
}

#[inline]
pub fn clamp_index(index: i32, project_count: usize) -> i32 {
  index.clamp(OVERVIEW_INDEX, max_index(project_count).max(OVERVIEW_INDEX))
}

fn step_target(state: &mut ScrollState, direction: i32, project_count: usize) -> Option<Transition> {
  let from = state.target;
  let to = clamp_index(from + direction, project_count);
  (to != from).then(|| {
    state.target = to;
    Transition { from, to }
  })
}

/// Pure transition function: `(state, input, now) -> (state', effect)`.
pub fn transition(
  mut state: ScrollState,
  input: ScrollInput,
  now: u64,
  project_count: usize,
  params: &ScrollParams,
) -> (ScrollState, Option<Transition>) {
  if !state.is_cooling_down(now) {
    state.debounce = Debounce::Idle;
  }

  match input {
    ScrollInput::Wheel { delta_y } => {
      // input that arrives while locked is dropped, not banked
      if state.is_cooling_down(now) || state.within_cooldown(now, params.cooldown_ms) {
        return (state, None);
      }
      if let Some(last) = state.last_wheel_at {
        if now.saturating_sub(last) >= params.accumulator_reset_ms {
          state.accumulated = 0.0;
        }
      }
      state.last_wheel_at = Some(now);
      state.accumulated += delta_y;

      if state.accumulated.abs() < params.delta_threshold {
        return (state, None);
      }
      let direction = if state.accumulated > 0.0 { 1 } else { -1 };
      let effect = step_target(&mut state, direction, project_count);
      if effect.is_some() {
        state.accumulated = 0.0;
        state.last_accepted_at = Some(now);
        state.debounce = Debounce::CoolingDown {
          until: now + params.lock_ms,
        };
      }
      (state, effect)
    }
    ScrollInput::TouchStart { y } => {
      state.touch_start_y = y;
      state.touch_end_y = y;
      (state, None)
    }
    ScrollInput::TouchMove { y } => {
      state.touch_end_y = y;
      (state, None)
    }
    ScrollInput::TouchEnd => {
      if state.is_cooling_down(now) {
        return (state, None);
      }
      // finger moving up the screen scrolls forward
      let swipe = state.touch_start_y - state.touch_end_y;
      if swipe.abs() <= params.min_swipe_px {
        return (state, None);
      }
      let direction = if swipe > 0.0 { 1 } else { -1 };
      let effect = step_target(&mut state, direction, project_count);
      if effect.is_some() {
        state.debounce = Debounce::CoolingDown {
          until: now + params.lock_ms,
        };
      }
      (state, effect)
    }
  }
}

/// Owns the scroll state for one scene.
pub struct ScrollController {
  state: ScrollState,
  project_count: usize,
  params: ScrollParams,
}

impl ScrollController {
  pub fn new(project_count: usize, params: ScrollParams) -> Self {
    Self {
      state: ScrollState::new(OVERVIEW_INDEX),
      project_count,
      params,
    }
  }

  pub fn handle(&mut self, input: ScrollInput, now: u64) -> Option<Transition> {
    let (state, effect) = transition(self.state, input, now, self.project_count, &self.params);
    self.state = state;
    if let Some(t) = effect {
      log::debug!("scroll {} -> {} at {}ms", t.from, t.to, now);
    }
    effect
  }

  /// Jump straight to `index`, bypassing wheel and touch debouncing. Any
  /// pending lock and wheel cooldown are released.
  pub fn navigate_to(&mut self, index: i32) -> Option<Transition> {
    let from = self.state.target;
    let to = clamp_index(index, self.project_count);
    self.state.target = to;
    self.state.accumulated = 0.0;
    self.state.debounce = Debounce::Idle;
    self.state.last_accepted_at = None;
    (to != from).then_some(Transition { from, to })
  }

  pub fn target_index(&self) -> i32 {
    self.state.target
  }

  pub fn state(&self) -> &ScrollState {
    &self.state
  }

  pub fn project_count(&self) -> usize {
    self.project_count
  }
}

/// Exponential easing of the displayed progress toward the target.
#[derive(Copy, Clone, Debug)]
pub struct ProgressSmoother {
  displayed: f32,
  rate: f32,
  snap_epsilon: f32,
}

impl ProgressSmoother {
  pub fn new(initial: f32, params: &ScrollParams) -> Self {
    Self {
      displayed: initial,
      rate: params.easing,
      snap_epsilon: params.snap_epsilon,
    }
  }

  /// One integrator tick. Never overshoots `target`.
  pub fn step(&mut self, target: f32) -> f32 {
    let diff = target - self.displayed;
    self.displayed = if diff.abs() < self.snap_epsilon {
      target
    } else {
      self.displayed + diff * self.rate
    };
    self.displayed
  }

  pub fn displayed(&self) -> f32 {
    self.displayed
  }

  pub fn is_settled(&self, target: f32) -> bool {
    self.displayed == target
  }
}
