//! Tunable simulation parameters.

use crate::{
    engine::DEFAULT_LIVE_PROBABILITY,
    error::{LifeError, Result},
    grid::MAX_DIMENSION,
};
use std::time::Duration;

pub const MIN_STEP_INTERVAL_MS: u64 = 10;
pub const MAX_STEP_INTERVAL_MS: u64 = 1000;
/// Granularity of speed adjustments
pub const STEP_INTERVAL_INCREMENT_MS: u64 = 10;

/// The board sizes offered by the front-end
pub const GRID_SIZE_PRESETS: [usize; 4] = [25, 35, 42, 50];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimConfig {
    grid_size: usize,
    step_interval_ms: u64,
    live_probability: f64,
}

impl SimConfig {
    pub fn new(grid_size: usize, step_interval_ms: u64, live_probability: f64) -> Result<Self> {
        let mut config = Self::default();
        config.set_grid_size(grid_size)?;
        config.set_step_interval_ms(step_interval_ms)?;
        config.set_live_probability(live_probability)?;
        Ok(config)
    }

    #[inline]
    pub fn grid_size(&self) -> usize {
        self.grid_size
    }
    #[inline]
    pub fn step_interval_ms(&self) -> u64 {
        self.step_interval_ms
    }
    #[inline]
    pub fn step_interval(&self) -> Duration {
        Duration::from_millis(self.step_interval_ms)
    }
    #[inline]
    pub fn live_probability(&self) -> f64 {
        self.live_probability
    }

    pub fn set_grid_size(&mut self, size: usize) -> Result<()> {
        if !(1..=MAX_DIMENSION).contains(&size) {
            return Err(LifeError::InvalidGridSize(size));
        }
        self.grid_size = size;
        Ok(())
    }

    pub fn set_step_interval_ms(&mut self, millis: u64) -> Result<()> {
        if !(MIN_STEP_INTERVAL_MS..=MAX_STEP_INTERVAL_MS).contains(&millis) {
            return Err(LifeError::InvalidStepInterval(millis));
        }
        self.step_interval_ms = millis;
        Ok(())
    }

    pub fn set_live_probability(&mut self, p: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&p) {
            return Err(LifeError::InvalidProbability(p));
        }
        self.live_probability = p;
        Ok(())
    }

    /// Moves the step interval by `delta_ms`, saturating at the allowed range
    pub fn nudge_step_interval(&mut self, delta_ms: i64) -> u64 {
        let next = self
            .step_interval_ms
            .saturating_add_signed(delta_ms)
            .clamp(MIN_STEP_INTERVAL_MS, MAX_STEP_INTERVAL_MS);
        self.step_interval_ms = next;
        next
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            grid_size: 42,
            step_interval_ms: 100,
            live_probability: DEFAULT_LIVE_PROBABILITY,
        }
    }
}
