use crate::{
    error::{LifeError, Result},
    pos::Coord,
};

/// The binary state of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Cell {
    #[default]
    Dead = 0,
    Alive = 1,
}
impl Cell {
    #[inline]
    pub fn is_alive(self) -> bool {
        self == Cell::Alive
    }

    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            Cell::Alive => Cell::Dead,
            Cell::Dead => Cell::Alive,
        }
    }
}
impl From<bool> for Cell {
    #[inline]
    fn from(alive: bool) -> Self {
        if alive { Cell::Alive } else { Cell::Dead }
    }
}

/// The largest number of rows or columns a grid may have
pub const MAX_DIMENSION: usize = 4096;

/// A dense, fixed-size `rows x cols` board stored row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Creates a grid where every cell is [`Cell::Dead`]
    ///
    /// Fails with [`LifeError::GridTooLarge`] if either side exceeds [`MAX_DIMENSION`].
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        let len = rows
            .checked_mul(cols)
            .filter(|_| rows <= MAX_DIMENSION && cols <= MAX_DIMENSION)
            .ok_or(LifeError::GridTooLarge { rows, cols })?;
        Ok(Self {
            rows,
            cols,
            cells: vec![Cell::Dead; len],
        })
    }

    /// Builds a grid from a row-major cell vector
    pub(crate) fn from_cells(rows: usize, cols: usize, cells: Vec<Cell>) -> Self {
        debug_assert_eq!(cells.len(), rows * cols, "cell count does not match dimensions");
        Self { rows, cols, cells }
    }

    /// Builds a grid with the given coordinates alive
    pub fn from_alive<I, C>(rows: usize, cols: usize, alive: I) -> Result<Self>
    where
        I: IntoIterator<Item = C>,
        C: Into<Coord>,
    {
        let mut grid = Self::new(rows, cols)?;
        for pos in alive {
            grid.set(pos.into(), Cell::Alive)?;
        }
        Ok(grid)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn index(&self, pos: Coord) -> Option<usize> {
        pos.in_bounds(self.rows, self.cols)
            .then(|| pos.row * self.cols + pos.col)
    }

    fn checked_index(&self, pos: Coord) -> Result<usize> {
        self.index(pos).ok_or(LifeError::OutOfBounds {
            row: pos.row,
            col: pos.col,
            rows: self.rows,
            cols: self.cols,
        })
    }

    /// The cell at `pos`, or [`None`] if it lies outside the grid
    #[inline]
    pub fn get(&self, pos: Coord) -> Option<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Whether `pos` is alive; positions outside the grid are never alive
    #[inline]
    pub fn is_alive(&self, pos: Coord) -> bool {
        self.get(pos).is_some_and(Cell::is_alive)
    }

    pub fn set(&mut self, pos: Coord, cell: Cell) -> Result<()> {
        let i = self.checked_index(pos)?;
        self.cells[i] = cell;
        Ok(())
    }

    /// Flips the cell at `pos` in place
    pub fn toggle(&mut self, pos: Coord) -> Result<Cell> {
        let i = self.checked_index(pos)?;
        self.cells[i] = self.cells[i].toggled();
        Ok(self.cells[i])
    }

    /// A single row of cells; `row` must be in range
    #[inline]
    pub(crate) fn row(&self, row: usize) -> &[Cell] {
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
    #[inline]
    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Iterates the coordinates of every live cell in row-major order
    pub fn alive(&self) -> impl Iterator<Item = Coord> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_alive())
            .map(move |(i, _)| Coord::new(i / cols, i % cols))
    }

    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_alive()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_dead() {
        let grid = Grid::new(3, 4).unwrap();

        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 4);
        assert_eq!(grid.alive_count(), 0);
        assert!(grid.cells().iter().all(|&c| c == Cell::Dead));
    }

    #[test]
    fn toggle_flips_only_target() {
        let mut grid = Grid::new(3, 3).unwrap();

        assert_eq!(grid.toggle(Coord::new(1, 2)).unwrap(), Cell::Alive);
        assert_eq!(grid.alive().collect::<Vec<_>>(), vec![Coord::new(1, 2)]);
        assert_eq!(grid.toggle(Coord::new(1, 2)).unwrap(), Cell::Dead);
        assert_eq!(grid.alive_count(), 0);
    }

    #[test]
    fn out_of_range_is_rejected() {
        let mut grid = Grid::new(2, 2).unwrap();

        assert!(matches!(
            grid.toggle(Coord::new(2, 0)),
            Err(LifeError::OutOfBounds { row: 2, col: 0, .. })
        ));
        assert!(grid.set(Coord::new(0, 5), Cell::Alive).is_err());
        assert_eq!(grid.get(Coord::new(9, 9)), None);
        assert!(!grid.is_alive(Coord::new(9, 9)));
    }

    #[test]
    fn alive_is_row_major() {
        let grid = Grid::from_alive(3, 3, [(2, 0), (0, 2), (1, 1)]).unwrap();

        assert_eq!(
            grid.alive().collect::<Vec<_>>(),
            vec![Coord::new(0, 2), Coord::new(1, 1), Coord::new(2, 0)]
        );
        assert_eq!(grid.row(1), &[Cell::Dead, Cell::Alive, Cell::Dead]);
    }

    #[test]
    fn oversized_grids_are_rejected() {
        assert!(matches!(
            Grid::new(usize::MAX / 2 + 1, usize::MAX / 2 + 1),
            Err(LifeError::GridTooLarge { .. })
        ));
        assert!(matches!(
            Grid::new(MAX_DIMENSION + 1, 1),
            Err(LifeError::GridTooLarge { .. })
        ));
        assert!(Grid::new(MAX_DIMENSION, 1).is_ok());
    }
}
