use crate::{
    error::{LifeError, Result},
    grid::{Grid, MAX_DIMENSION},
    pos::Coord,
};
use regex::Regex;

pub trait GridCodec {
    fn encode(self, grid: &Grid) -> String;
    fn decode(self, value: &str) -> Result<Grid>;
}

struct RunEncoder {
    sequence: String,
    line_len: usize,
    max_line_len: usize,
}
impl RunEncoder {
    fn new(max_line_len: usize) -> Self {
        Self {
            sequence: String::new(),
            line_len: 0,
            max_line_len,
        }
    }

    fn push_run(&mut self, run: usize, c: char) {
        let append = match run {
            0 => String::new(),
            1 => c.to_string(),
            n => format!("{}{}", n, c),
        };
        if self.line_len + append.len() > self.max_line_len {
            self.sequence.push('\n');
            self.line_len = 0;
        }
        self.line_len += append.len();
        self.sequence.push_str(&append);
    }

    pub fn end(mut self) -> String {
        self.sequence.push('!');
        self.sequence
    }
}

/// The run-length encoded pattern format (`b` dead, `o` alive, `$` end of row, `!` end)
pub struct RunLengthEncoded {
    name: Option<String>,
}
impl RunLengthEncoded {
    pub fn set_name<T: AsRef<str>>(mut self, name: T) -> Self {
        self.name = Some(name.as_ref().to_owned());
        self
    }

    fn encode_header(&self, grid: &Grid) -> String {
        let mut header = String::new();
        if let Some(name) = &self.name {
            header.push_str(&format!("#N {}\n", name));
        }
        header.push_str(&format!(
            "x = {}, y = {}, rule = B3/S23\n",
            grid.cols(),
            grid.rows()
        ));
        header
    }

    fn encode_cells(&self, grid: &Grid) -> String {
        let mut last: Option<Coord> = None;
        let mut alive_run = 0;
        let mut seq = RunEncoder::new(70);
        for pos in grid.alive() {
            // if we're one ahead of the last, then only increment the run
            if let Some(prev) = last {
                if prev.row == pos.row && prev.col + 1 == pos.col {
                    alive_run += 1;
                    last = Some(pos);
                    continue;
                }
            }

            let (lines_run, dead_run) = match last {
                None => (pos.row, pos.col),
                Some(prev) if prev.row == pos.row => (0, pos.col - prev.col - 1),
                Some(prev) => (pos.row - prev.row, pos.col),
            };
            // NOTE: order matters!
            seq.push_run(alive_run, 'o');
            seq.push_run(lines_run, '$');
            seq.push_run(dead_run, 'b');

            alive_run = 1;
            last = Some(pos);
        }

        seq.push_run(alive_run, 'o');
        seq.end()
    }

    /// Parses an `x = W, y = H` header line
    fn decode_header(line: &str) -> Result<Option<(usize, usize)>> {
        let re = Regex::new(r"^\s*x\s*=\s*(\d+)\s*,\s*y\s*=\s*(\d+)")
            .map_err(|e| LifeError::Pattern(e.to_string()))?;
        let Some(caps) = re.captures(line) else {
            return Ok(None);
        };
        let parse = |s: &str| {
            s.parse::<usize>()
                .map_err(|e| LifeError::Pattern(format!("bad header dimension {s:?}: {e}")))
        };
        Ok(Some((parse(&caps[2])?, parse(&caps[1])?)))
    }

    /// Moves a cursor coordinate forward by `run`, staying within a grid side
    fn advance(pos: usize, run: usize) -> Result<usize> {
        pos.checked_add(run)
            .filter(|&end| end <= MAX_DIMENSION)
            .ok_or_else(|| {
                LifeError::Pattern(format!("pattern runs past {MAX_DIMENSION} cells per side"))
            })
    }

    /// Parses `value` into its live cells without allocating a grid
    fn decode_pattern(value: &str) -> Result<Pattern> {
        let re = Regex::new(r"(\d*)([^\d\s])").map_err(|e| LifeError::Pattern(e.to_string()))?;

        let mut dims = None;
        let mut alive = Vec::new();
        let mut cursor = Coord::default();
        let mut extent = (0, 0);
        'lines_loop: for mut line in value.lines() {
            if let Some(i) = line.find('#') {
                line = &line[..i];
            }
            if let Some(header) = Self::decode_header(line)? {
                dims = Some(header);
                continue;
            }

            for (_, [run_str, state]) in re.captures_iter(line).map(|x| x.extract()) {
                let run = match run_str {
                    "" => 1,
                    s => s
                        .parse::<usize>()
                        .map_err(|e| LifeError::Pattern(format!("bad run {s:?}: {e}")))?,
                };
                match state {
                    "!" => break 'lines_loop,
                    "o" => {
                        let end = Self::advance(cursor.col, run)?;
                        if cursor.row >= MAX_DIMENSION {
                            return Err(LifeError::Pattern(format!(
                                "pattern runs past {MAX_DIMENSION} cells per side"
                            )));
                        }
                        alive.extend((cursor.col..end).map(|col| Coord::new(cursor.row, col)));
                        cursor.col = end;
                        extent.0 = extent.0.max(cursor.row + 1);
                        extent.1 = extent.1.max(cursor.col);
                    }
                    "b" => cursor.col = Self::advance(cursor.col, run)?,
                    "$" => {
                        cursor.col = 0;
                        cursor.row = Self::advance(cursor.row, run)?;
                    }
                    other => {
                        return Err(LifeError::Pattern(format!("unexpected tag {other:?}")));
                    }
                }
            }
        }

        let (rows, cols) = dims.unwrap_or(extent);
        if rows > MAX_DIMENSION || cols > MAX_DIMENSION {
            return Err(LifeError::Pattern(format!(
                "declared {cols}x{rows} size exceeds {MAX_DIMENSION} cells per side"
            )));
        }
        if extent.0 > rows || extent.1 > cols {
            return Err(LifeError::Pattern(format!(
                "cells extend past the declared {}x{} size",
                cols, rows
            )));
        }
        Ok(Pattern { rows, cols, alive })
    }

    /// Decodes `value` and places the pattern in the middle of an empty `rows x cols` grid
    pub fn decode_centered(self, value: &str, rows: usize, cols: usize) -> Result<Grid> {
        let pattern = Self::decode_pattern(value)?;
        if pattern.rows > rows || pattern.cols > cols {
            return Err(LifeError::Pattern(format!(
                "{}x{} pattern does not fit a {}x{} grid",
                pattern.rows, pattern.cols, rows, cols
            )));
        }

        let top = (rows - pattern.rows) / 2;
        let left = (cols - pattern.cols) / 2;
        Grid::from_alive(
            rows,
            cols,
            pattern
                .alive
                .into_iter()
                .map(|pos| Coord::new(pos.row + top, pos.col + left)),
        )
    }
}
impl Default for RunLengthEncoded {
    fn default() -> Self {
        Self { name: None }
    }
}

/// Live cells of a decoded pattern and the size it declares
struct Pattern {
    rows: usize,
    cols: usize,
    alive: Vec<Coord>,
}

impl GridCodec for RunLengthEncoded {
    fn encode(self, grid: &Grid) -> String {
        format!("{}{}\n", self.encode_header(grid), self.encode_cells(grid))
    }

    fn decode(self, value: &str) -> Result<Grid> {
        let pattern = Self::decode_pattern(value)?;
        Grid::from_alive(pattern.rows, pattern.cols, pattern.alive)
    }
}
