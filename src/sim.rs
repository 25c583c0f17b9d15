//! Run-state machine driving the engine.
//!
//! A [`Simulation`] owns the current grid and steps it along a
//! self-rescheduling chain: starting hands back a [`PendingStep`] that is due
//! immediately, and every step hands back the one after it, due one step
//! interval later. Each pending step is stamped with the
//! run epoch it was scheduled in, and [`Simulation::fire`] re-checks both the
//! run-state and the epoch before touching the grid. Starting or stopping moves
//! the epoch forward, so a step scheduled before a stop is inert even if the
//! simulation was started again in the meantime.

use crate::{
    config::SimConfig,
    engine,
    error::{LifeError, Result},
    grid::Grid,
    pos::Coord,
};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Stopped,
    Running,
}

/// A step scheduled by a running [`Simulation`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingStep {
    epoch: u64,
    due: Instant,
}
impl PendingStep {
    #[inline]
    pub fn due(&self) -> Instant {
        self.due
    }
    #[inline]
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.due
    }
}

#[derive(Debug)]
pub struct Simulation {
    grid: Grid,
    config: SimConfig,
    state: RunState,
    generation: u64,
    epoch: u64,
    parallel: bool,
}

impl Simulation {
    /// A stopped simulation over an empty board sized by `config`
    pub fn new(config: SimConfig) -> Result<Self> {
        let size = config.grid_size();
        Ok(Self::with_grid(config, engine::empty_grid(size, size)?))
    }

    pub fn with_grid(config: SimConfig, grid: Grid) -> Self {
        Self {
            grid,
            config,
            state: RunState::Stopped,
            generation: 0,
            epoch: 0,
            parallel: false,
        }
    }

    /// Computes generations with [`engine::step_parallel`] instead of [`engine::step`]
    pub fn set_parallel(&mut self, parallel: bool) {
        self.parallel = parallel;
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }
    #[inline]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }
    #[inline]
    pub fn state(&self) -> RunState {
        self.state
    }
    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Stopped -> Running, returning the first step of the new chain, due at `now`
    pub fn start(&mut self, now: Instant) -> Option<PendingStep> {
        if self.is_running() {
            return None;
        }
        self.state = RunState::Running;
        self.epoch += 1;
        log::info!("simulation started at generation {}", self.generation);
        Some(PendingStep {
            epoch: self.epoch,
            due: now,
        })
    }

    /// Running -> Stopped; any step already scheduled will be ignored
    pub fn stop(&mut self) {
        if !self.is_running() {
            return;
        }
        self.state = RunState::Stopped;
        self.epoch += 1;
        log::info!("simulation stopped at generation {}", self.generation);
    }

    pub fn toggle_running(&mut self, now: Instant) -> Option<PendingStep> {
        if self.is_running() {
            self.stop();
            None
        } else {
            self.start(now)
        }
    }

    /// Schedules the next step one step interval after `now`
    pub fn schedule(&self, now: Instant) -> PendingStep {
        PendingStep {
            epoch: self.epoch,
            due: now + self.config.step_interval(),
        }
    }

    /// Runs a scheduled step, returning the step that follows it
    ///
    /// Does nothing and ends the chain if the simulation is no longer running
    /// or was restarted since `pending` was scheduled.
    pub fn fire(&mut self, pending: PendingStep, now: Instant) -> Option<PendingStep> {
        if !self.is_running() || pending.epoch != self.epoch {
            log::debug!(
                "dropping stale step (epoch {} current {})",
                pending.epoch,
                self.epoch
            );
            return None;
        }
        self.advance();
        Some(self.schedule(now))
    }

    /// Advances a single generation while stopped
    pub fn step_once(&mut self) -> Result<()> {
        self.ensure_stopped()?;
        self.advance();
        Ok(())
    }

    fn advance(&mut self) {
        self.grid = if self.parallel {
            engine::step_parallel(&self.grid)
        } else {
            engine::step(&self.grid)
        };
        self.generation += 1;
        log::trace!(
            "generation {}: {} alive",
            self.generation,
            self.grid.alive_count()
        );
    }

    fn ensure_stopped(&self) -> Result<()> {
        if self.is_running() {
            log::warn!("rejected board edit while running");
            return Err(LifeError::Running);
        }
        Ok(())
    }

    pub fn toggle(&mut self, pos: Coord) -> Result<()> {
        self.ensure_stopped()?;
        self.grid = engine::toggle_cell(&self.grid, pos.row, pos.col)?;
        Ok(())
    }

    /// Replaces the board with an empty one of the same size
    pub fn clear(&mut self) -> Result<()> {
        self.ensure_stopped()?;
        self.grid = engine::empty_grid(self.grid.rows(), self.grid.cols())?;
        self.generation = 0;
        log::debug!("board cleared");
        Ok(())
    }

    pub fn randomize(&mut self) -> Result<()> {
        self.ensure_stopped()?;
        self.grid = engine::randomize(
            self.grid.rows(),
            self.grid.cols(),
            self.config.live_probability(),
        )?;
        self.generation = 0;
        log::debug!("board randomized, {} alive", self.grid.alive_count());
        Ok(())
    }

    /// Replaces the board with an empty `size x size` one
    pub fn resize(&mut self, size: usize) -> Result<()> {
        self.ensure_stopped()?;
        let grid = engine::resize(size)?;
        self.config.set_grid_size(size)?;
        self.grid = grid;
        self.generation = 0;
        log::debug!("board resized to {size}x{size}");
        Ok(())
    }

    /// Loads `grid` as the new board
    pub fn load(&mut self, grid: Grid) -> Result<()> {
        self.ensure_stopped()?;
        self.grid = grid;
        self.generation = 0;
        Ok(())
    }

    /// Changes the speed; a running chain picks it up from its next schedule
    pub fn set_step_interval_ms(&mut self, millis: u64) -> Result<()> {
        self.config.set_step_interval_ms(millis)
    }

    pub fn nudge_step_interval(&mut self, delta_ms: i64) -> u64 {
        self.config.nudge_step_interval(delta_ms)
    }

    pub fn set_live_probability(&mut self, p: f64) -> Result<()> {
        self.config.set_live_probability(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn blinker_sim() -> Simulation {
        let config = SimConfig::new(10, 100, 0.3).unwrap();
        let grid = Grid::from_alive(10, 10, [(5, 4), (5, 5), (5, 6)]).unwrap();
        Simulation::with_grid(config, grid)
    }

    #[test]
    fn starts_stopped_and_empty() {
        let sim = Simulation::new(SimConfig::default()).unwrap();

        assert_eq!(sim.state(), RunState::Stopped);
        assert_eq!(sim.generation(), 0);
        assert_eq!((sim.grid().rows(), sim.grid().cols()), (42, 42));
        assert_eq!(sim.grid().alive_count(), 0);
    }

    #[test]
    fn chain_advances_one_generation_per_fire() {
        let mut sim = blinker_sim();
        let t0 = Instant::now();

        // the first step fires right away, later ones wait an interval
        let pending = sim.start(t0).expect("first step");
        assert_eq!(pending.due(), t0);
        assert!(pending.is_due(t0));

        let next = sim.fire(pending, t0).expect("chain continues");
        assert_eq!(sim.generation(), 1);
        assert_eq!(next.due(), t0 + Duration::from_millis(100));
        assert!(!next.is_due(t0));

        sim.fire(next, next.due()).expect("chain continues");
        assert_eq!(sim.generation(), 2);
        assert_eq!(sim.grid(), blinker_sim().grid());
    }

    #[test]
    fn stop_cancels_pending_step() {
        let mut sim = blinker_sim();
        let t0 = Instant::now();

        let pending = sim.start(t0).unwrap();
        sim.stop();

        assert_eq!(sim.fire(pending, t0), None);
        assert_eq!(sim.generation(), 0);
        assert_eq!(sim.grid(), blinker_sim().grid());
    }

    #[test]
    fn restart_does_not_revive_stale_step() {
        let mut sim = blinker_sim();
        let t0 = Instant::now();

        let stale = sim.start(t0).unwrap();
        sim.stop();
        let fresh = sim.start(t0).unwrap();

        assert_eq!(sim.fire(stale, t0), None);
        assert_eq!(sim.generation(), 0);
        assert!(sim.fire(fresh, t0).is_some());
        assert_eq!(sim.generation(), 1);
    }

    #[test]
    fn start_while_running_is_noop() {
        let mut sim = blinker_sim();
        let t0 = Instant::now();

        let pending = sim.start(t0).unwrap();
        assert_eq!(sim.start(t0), None);
        assert!(sim.fire(pending, t0).is_some());
    }

    #[test]
    fn edits_are_rejected_while_running() {
        let mut sim = blinker_sim();
        sim.start(Instant::now());

        assert!(matches!(sim.toggle(Coord::new(0, 0)), Err(LifeError::Running)));
        assert!(matches!(sim.clear(), Err(LifeError::Running)));
        assert!(matches!(sim.randomize(), Err(LifeError::Running)));
        assert!(matches!(sim.resize(25), Err(LifeError::Running)));
        assert!(matches!(sim.step_once(), Err(LifeError::Running)));
        assert_eq!(sim.grid(), blinker_sim().grid());
    }

    #[test]
    fn clear_randomize_resize_reset_generation() {
        let mut sim = blinker_sim();

        sim.step_once().unwrap();
        assert_eq!(sim.generation(), 1);
        sim.clear().unwrap();
        assert_eq!(sim.generation(), 0);
        assert_eq!(sim.grid().alive_count(), 0);

        sim.step_once().unwrap();
        sim.randomize().unwrap();
        assert_eq!(sim.generation(), 0);
        assert_eq!((sim.grid().rows(), sim.grid().cols()), (10, 10));

        sim.step_once().unwrap();
        sim.resize(35).unwrap();
        assert_eq!(sim.generation(), 0);
        assert_eq!(sim.config().grid_size(), 35);
        assert_eq!((sim.grid().rows(), sim.grid().cols()), (35, 35));
        assert_eq!(sim.grid().alive_count(), 0);
    }

    #[test]
    fn stop_keeps_last_grid() {
        let mut sim = blinker_sim();
        let t0 = Instant::now();

        let pending = sim.start(t0).unwrap();
        sim.fire(pending, t0);
        let after_one = sim.grid().clone();
        sim.stop();

        assert_eq!(sim.grid(), &after_one);
        assert_eq!(sim.generation(), 1);
    }

    #[test]
    fn toggle_while_stopped_edits_grid() {
        let mut sim = Simulation::new(SimConfig::new(5, 100, 0.3).unwrap()).unwrap();

        for col in 1..=3 {
            sim.toggle(Coord::new(2, col)).unwrap();
        }
        sim.step_once().unwrap();

        let alive: Vec<_> = sim.grid().alive().collect();
        assert_eq!(
            alive,
            vec![Coord::new(1, 2), Coord::new(2, 2), Coord::new(3, 2)]
        );
        assert!(sim.toggle(Coord::new(5, 0)).is_err());
    }

    #[test]
    fn interval_change_applies_to_next_schedule() {
        let mut sim = blinker_sim();
        let t0 = Instant::now();

        let pending = sim.start(t0).unwrap();
        sim.set_step_interval_ms(500).unwrap();
        let next = sim.fire(pending, t0).unwrap();

        assert_eq!(next.due(), t0 + Duration::from_millis(500));
        assert!(sim.set_step_interval_ms(2000).is_err());
    }

    #[test]
    fn parallel_stepping_matches_serial() {
        let mut serial = blinker_sim();
        let mut parallel = blinker_sim();
        parallel.set_parallel(true);

        for _ in 0..3 {
            serial.step_once().unwrap();
            parallel.step_once().unwrap();
        }
        assert_eq!(serial.grid(), parallel.grid());
    }

    #[test]
    fn oversized_resize_is_rejected() {
        let mut sim = blinker_sim();

        assert!(sim.resize(usize::MAX / 2 + 1).is_err());
        assert!(matches!(sim.resize(0), Err(LifeError::InvalidGridSize(0))));
        assert_eq!(sim.config().grid_size(), 10);
        assert_eq!(sim.grid(), blinker_sim().grid());
    }
}
