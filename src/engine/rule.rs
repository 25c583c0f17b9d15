use crate::grid::Cell;
use std::sync::OnceLock;

/// The number of possible live-neighbor counts, `0..=8`
const NEIGHBOR_COUNTS: usize = 9;
/// One row of outcomes per current cell state
const PERMUTATIONS: usize = 2 * NEIGHBOR_COUNTS;
type LifeRuleTable = [Cell; PERMUTATIONS];

/// Returns a Singleton lookup table for the Game of Life ruleset
///
/// Equivalent to calling [`generate_rule_table`] once and storing the result
fn get_rule_table() -> &'static LifeRuleTable {
    static TABLE: OnceLock<LifeRuleTable> = OnceLock::new();
    TABLE.get_or_init(generate_rule_table)
}

/// Creates a lookup table for the Game of Life ruleset
///
/// The table is indexed by `state * 9 + neighbors`, where `state` is `0` for a
/// dead cell and `1` for a live one.
fn generate_rule_table() -> LifeRuleTable {
    let mut table = [Cell::Dead; PERMUTATIONS];
    for (i, slot) in table.iter_mut().enumerate() {
        let current = Cell::from(i >= NEIGHBOR_COUNTS);
        let neighbors = i % NEIGHBOR_COUNTS;
        *slot = match (current, neighbors) {
            (_, n) if n < 2 || n > 3 => Cell::Dead,
            (Cell::Dead, 3) => Cell::Alive,
            (cell, _) => cell,
        };
    }
    table
}

/// The next state of a cell given its current state and live-neighbor count
#[inline]
pub(super) fn next_state(current: Cell, neighbors: usize) -> Cell {
    debug_assert!(neighbors < NEIGHBOR_COUNTS, "a cell has at most 8 neighbors");
    get_rule_table()[current as usize * NEIGHBOR_COUNTS + neighbors]
}
