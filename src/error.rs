//! Error types for the engine and its front-ends.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LifeError>;

#[derive(Error, Debug)]
pub enum LifeError {
    #[error("cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("grid size must be between 1 and {max}, got {0}", max = crate::grid::MAX_DIMENSION)]
    InvalidGridSize(usize),

    #[error("a {rows}x{cols} grid exceeds {max} cells per side", max = crate::grid::MAX_DIMENSION)]
    GridTooLarge { rows: usize, cols: usize },

    #[error("step interval {0}ms is outside {min}..={max}ms", min = crate::config::MIN_STEP_INTERVAL_MS, max = crate::config::MAX_STEP_INTERVAL_MS)]
    InvalidStepInterval(u64),

    #[error("live probability {0} must be between 0.0 and 1.0")]
    InvalidProbability(f64),

    #[error("the board cannot be edited while the simulation is running")]
    Running,

    #[error("invalid pattern: {0}")]
    Pattern(String),

    #[error("invalid options: {0}")]
    Options(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
