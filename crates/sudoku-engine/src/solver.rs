use crate::{Grid, Position};

/// Depth-first backtracking solver.
///
/// Scans for empty cells in row-major order and tries digits 1-9 ascending.
/// Worst-case time is exponential; the board is fixed at 9x9 and puzzles are
/// generator-produced, so in practice a solve is near-instant.
pub struct Solver;

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver {
    pub fn new() -> Self {
        Self
    }

    /// Solve a copy of the grid, returning the solved grid if a completion
    /// exists.
    pub fn solve(&self, grid: &Grid) -> Option<Grid> {
        let mut working = grid.clone();
        if self.solve_in_place(&mut working) {
            Some(working)
        } else {
            None
        }
    }

    /// Fill every empty cell in place so the whole board validates. Returns
    /// false when no completion exists, in which case every cell tried
    /// during the search has been reverted and the grid is unchanged.
    pub fn solve_in_place(&self, grid: &mut Grid) -> bool {
        self.solve_from(grid, Position::new(0, 0))
    }

    fn solve_from(&self, grid: &mut Grid, from: Position) -> bool {
        let pos = match Self::find_next_empty(grid, from) {
            Some(pos) => pos,
            None => return true, // board is full
        };
        for digit in 1..=9 {
            if Self::candidate_fits(grid, pos, digit) {
                grid.set(pos, Some(digit));
                if self.solve_from(grid, pos) {
                    return true;
                }
                // revert before trying the next digit
                grid.set(pos, None);
            }
        }
        false
    }

    /// Next empty cell scanning row-major from `from`, wrapping past the end
    /// to the top-left corner. None when the grid is full.
    fn find_next_empty(grid: &Grid, from: Position) -> Option<Position> {
        let start = from.row * 9 + from.col;
        for i in (start..81).chain(0..start) {
            let pos = Position::new(i / 9, i % 9);
            if grid.get(pos).is_none() {
                return Some(pos);
            }
        }
        None
    }

    /// Whether `digit` appears nowhere in the row, column, or box of `pos`.
    fn candidate_fits(grid: &Grid, pos: Position, digit: u8) -> bool {
        for i in 0..9 {
            if grid.get(Position::new(pos.row, i)) == Some(digit) {
                return false;
            }
            if grid.get(Position::new(i, pos.col)) == Some(digit) {
                return false;
            }
        }
        let box_row = pos.row / 3 * 3;
        let box_col = pos.col / 3 * 3;
        for row in box_row..box_row + 3 {
            for col in box_col..box_col + 3 {
                if grid.get(Position::new(row, col)) == Some(digit) {
                    return false;
                }
            }
        }
        true
    }
}
