use crate::{grid::Grid, pos::Coord};

/// A rectangular viewport over a [`Grid`], clipped to the grid's bounds
pub struct GridWindow<'a> {
    tl: Coord,
    br: Coord,
    grid: &'a Grid,
}
impl<'a> GridWindow<'a> {
    /// A window of at most `rows x cols` cells whose top-left corner is `top_left`
    pub fn new(grid: &'a Grid, top_left: Coord, rows: usize, cols: usize) -> Self {
        let tl = Coord::new(top_left.row.min(grid.rows()), top_left.col.min(grid.cols()));
        let br = Coord::new(
            tl.row.saturating_add(rows).min(grid.rows()),
            tl.col.saturating_add(cols).min(grid.cols()),
        );
        Self { tl, br, grid }
    }

    #[inline]
    pub fn top_left(&self) -> Coord {
        self.tl
    }

    /// The visible `(rows, cols)` after clipping
    #[inline]
    pub fn size(&self) -> (usize, usize) {
        (self.br.row - self.tl.row, self.br.col - self.tl.col)
    }

    /// Live cells inside the window, in grid coordinates
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = Coord> + '_ {
        let rx = self.tl.row..self.br.row;
        let cx = self.tl.col..self.br.col;
        self.grid
            .alive()
            .filter(move |pos| rx.contains(&pos.row) && cx.contains(&pos.col))
    }
}

impl std::fmt::Display for GridWindow<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.tl.row..self.br.row {
            if row != self.tl.row {
                writeln!(f)?;
            }
            for &cell in &self.grid.row(row)[self.tl.col..self.br.col] {
                f.write_str(if cell.is_alive() { "█" } else { " " })?;
            }
        }
        Ok(())
    }
}
