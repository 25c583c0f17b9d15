mod rule;
mod window;

pub use self::window::GridWindow;
use crate::{
    error::{LifeError, Result},
    grid::{Cell, Grid},
    pos::Coord,
};
use rand::Rng;
use rayon::prelude::*;

/// The 8 positions surrounding a cell, as `(d_row, d_col)`
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (0, 1),
    (0, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
    (-1, -1),
    (1, 0),
    (-1, 0),
];

/// Default chance of a cell starting alive after [`randomize`]
pub const DEFAULT_LIVE_PROBABILITY: f64 = 0.3;

/// Counts the live neighbors of `pos`
///
/// Neighbors outside the grid are skipped rather than wrapped, so a corner cell
/// has at most 3 neighbors and an edge cell at most 5.
pub fn live_neighbors(grid: &Grid, pos: Coord) -> usize {
    let (rows, cols) = (grid.rows(), grid.cols());
    NEIGHBOR_OFFSETS
        .iter()
        .filter_map(|&(dr, dc)| pos.offset(dr, dc, rows, cols))
        .filter(|&n| grid.is_alive(n))
        .count()
}

/// Computes one row of the next generation into `out`
fn next_row(grid: &Grid, row: usize, out: &mut [Cell]) {
    for (col, (slot, &current)) in out.iter_mut().zip(grid.row(row)).enumerate() {
        let neighbors = live_neighbors(grid, Coord::new(row, col));
        *slot = rule::next_state(current, neighbors);
    }
}

/// Computes the next generation of `grid`
///
/// Every neighbor count is taken against `grid` itself and the result is
/// written into a fresh grid, so the update is synchronous and the input is
/// left untouched.
pub fn step(grid: &Grid) -> Grid {
    let cols = grid.cols();
    let mut next = vec![Cell::Dead; grid.rows() * cols];
    if cols > 0 {
        for (row, out) in next.chunks_mut(cols).enumerate() {
            next_row(grid, row, out);
        }
    }
    Grid::from_cells(grid.rows(), cols, next)
}

/// Same as [`step`], but computes the rows of the next generation in parallel
pub fn step_parallel(grid: &Grid) -> Grid {
    let cols = grid.cols();
    let mut next = vec![Cell::Dead; grid.rows() * cols];
    if cols > 0 {
        // every band reads the shared input and writes only its own row
        next.par_chunks_mut(cols)
            .enumerate()
            .for_each(|(row, out)| next_row(grid, row, out));
    }
    Grid::from_cells(grid.rows(), cols, next)
}

/// A `rows x cols` grid with every cell dead
#[inline]
pub fn empty_grid(rows: usize, cols: usize) -> Result<Grid> {
    Grid::new(rows, cols)
}

/// A new empty `size x size` grid, replacing whatever grid the caller held
#[inline]
pub fn resize(size: usize) -> Result<Grid> {
    Grid::new(size, size)
}

/// Returns a copy of `grid` with the cell at `(row, col)` flipped
pub fn toggle_cell(grid: &Grid, row: usize, col: usize) -> Result<Grid> {
    let mut next = grid.clone();
    next.toggle(Coord::new(row, col))?;
    Ok(next)
}

/// A `rows x cols` grid where every cell is independently alive with
/// probability `live_probability`, using the thread-local RNG
pub fn randomize(rows: usize, cols: usize, live_probability: f64) -> Result<Grid> {
    randomize_with(&mut rand::rng(), rows, cols, live_probability)
}

/// Same as [`randomize`], drawing from the given RNG
pub fn randomize_with<R: Rng>(
    rng: &mut R,
    rows: usize,
    cols: usize,
    live_probability: f64,
) -> Result<Grid> {
    if !(0.0..=1.0).contains(&live_probability) {
        return Err(LifeError::InvalidProbability(live_probability));
    }

    let mut grid = Grid::new(rows, cols)?;
    for cell in grid.cells_mut() {
        *cell = Cell::from(rng.random_bool(live_probability));
    }
    Ok(grid)
}
