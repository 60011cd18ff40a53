use std::time::Duration;

/// Turns variable frame deltas into a whole number of fixed-rate ticks.
#[derive(Copy, Clone, Debug)]
pub struct FixedTimestep {
  step: f32,
  accumulator: f32,
  max_steps: u32,
}

impl FixedTimestep {
  pub fn new(step_secs: f32) -> Self {
    Self {
      step: step_secs,
      accumulator: 0.0,
      max_steps: 10,
    }
  }

  pub fn from_hz(hz: f32) -> Self {
    Self::new(1.0 / hz)
  }

  /// Feed elapsed wall-clock time, get back how many ticks to run.
  /// A long stall (window dragged, laptop asleep) is capped rather than replayed.
  pub fn accumulate(&mut self, dt: Duration) -> u32 {
    self.accumulator = (self.accumulator + dt.as_secs_f32()).min(self.step * self.max_steps as f32);
    let steps = (self.accumulator / self.step) as u32;
    self.accumulator -= steps as f32 * self.step;
    steps
  }

}

/// Simulated orbit time, advanced by a constant amount per fixed tick so
/// planets move at the same speed whatever the display refresh rate.
/// Kept in f64: the value grows for as long as the scene runs.
#[derive(Copy, Clone, Debug)]
pub struct OrbitClock {
  timestep: FixedTimestep,
  increment: f64,
  time: f64,
}

impl OrbitClock {
  pub fn new(tick_secs: f32, increment: f32) -> Self {
    Self {
      timestep: FixedTimestep::new(tick_secs),
      increment: f64::from(increment),
      time: 0.0,
    }
  }

  pub fn advance(&mut self, dt: Duration) -> f64 {
    let ticks = self.timestep.accumulate(dt);
    self.time += f64::from(ticks) * self.increment;
    self.time
  }

  pub fn time(&self) -> f64 {
    self.time
  }
}
