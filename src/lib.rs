//! Conway's Game of Life on a bounded, edge-clamped grid.

pub mod config;
pub mod enc;
pub mod engine;
pub mod error;
pub mod grid;
pub mod pos;
pub mod sim;

pub use config::SimConfig;
pub use enc::{GridCodec, RunLengthEncoded};
pub use engine::GridWindow;
pub use error::{LifeError, Result};
pub use grid::{Cell, Grid};
pub use pos::Coord;
pub use sim::{PendingStep, RunState, Simulation};
