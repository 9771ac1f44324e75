use crate::{Grid, Position};

/// Number of cells erased from a full grid to form a puzzle (60 of 81).
pub const EMPTY_CELLS: usize = 81 * 3 / 4;

/// Puzzle generator.
///
/// Builds a full valid grid by permuting a base Latin-square pattern, then
/// erases a fixed fraction of cells. The result is always consistent with a
/// complete solution, but a unique completion is not guaranteed.
pub struct Generator {
    rng: SimpleRng,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    /// Create an entropy-seeded generator.
    pub fn new() -> Self {
        Self {
            rng: SimpleRng::new(),
        }
    }

    /// Create a generator with a specific seed for reproducibility.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SimpleRng::with_seed(seed),
        }
    }

    /// Base pattern: a valid solved grid before any shuffling. Rows, columns,
    /// and boxes are all permutations of 0-8.
    fn pattern(r: usize, c: usize) -> usize {
        (3 * (r % 3) + r / 3 + c) % 9
    }

    /// A row (or column) order that preserves box validity: the three bands
    /// are shuffled, then the three lines within each band.
    fn shuffled_axis(&mut self) -> [usize; 9] {
        let mut bands = [0usize, 1, 2];
        self.shuffle(&mut bands);

        let mut order = [0usize; 9];
        let mut next = 0;
        for band in bands {
            let mut lines = [0usize, 1, 2];
            self.shuffle(&mut lines);
            for line in lines {
                order[next] = band * 3 + line;
                next += 1;
            }
        }
        order
    }

    /// Generate a completely filled valid grid, every cell given.
    pub fn generate_solution(&mut self) -> Grid {
        let rows = self.shuffled_axis();
        let cols = self.shuffled_axis();

        let mut digits: [u8; 9] = [1, 2, 3, 4, 5, 6, 7, 8, 9];
        self.shuffle(&mut digits);

        let mut grid = Grid::empty();
        for r in 0..9 {
            for c in 0..9 {
                let value = digits[Self::pattern(rows[r], cols[c])];
                grid.set_given(Position::new(r, c), value);
            }
        }
        grid
    }

    /// Generate a playable puzzle: a full solution with `EMPTY_CELLS` cells
    /// erased at distinct random positions. Erased cells are editable; the
    /// 21 surviving cells stay given.
    pub fn generate(&mut self) -> Grid {
        let mut grid = self.generate_solution();

        let mut positions: Vec<Position> = Position::all().collect();
        self.shuffle(&mut positions);
        for pos in positions.into_iter().take(EMPTY_CELLS) {
            *grid.cell_mut(pos) = Default::default();
        }
        grid
    }

    /// Fisher-Yates shuffle.
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.rng.next_usize(i + 1);
            slice.swap(i, j);
        }
    }
}

/// Simple PCG-style PRNG so the engine crate stays free of heavyweight
/// randomness dependencies.
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new() -> Self {
        let mut seed_bytes = [0u8; 8];
        getrandom::getrandom(&mut seed_bytes).unwrap_or_else(|_| {
            // Fallback: a static counter if getrandom fails
            static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);
            let counter = COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            seed_bytes = counter.to_le_bytes();
        });
        Self::with_seed(u64::from_le_bytes(seed_bytes))
    }

    fn with_seed(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(1),
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let xorshifted = (((self.state >> 18) ^ self.state) >> 27) as u32;
        let rot = (self.state >> 59) as u32;
        (xorshifted.rotate_right(rot)) as u64
    }

    fn next_usize(&mut self, bound: usize) -> usize {
        (self.next_u64() as usize) % bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solution_is_a_full_valid_grid() {
        let mut generator = Generator::with_seed(42);
        let grid = generator.generate_solution();
        assert_eq!(grid.empty_count(), 0);
        assert_eq!(grid.given_count(), 81);
        assert!(grid.is_complete_and_valid());
    }

    #[test]
    fn every_seed_yields_valid_rows_cols_and_boxes() {
        for seed in 0..50 {
            let grid = Generator::with_seed(seed).generate_solution();
            for i in 0..9 {
                assert!(grid.is_row_valid(i), "seed {} row {}", seed, i);
                assert!(grid.is_col_valid(i), "seed {} col {}", seed, i);
            }
            for box_row in 0..3 {
                for box_col in 0..3 {
                    assert!(
                        grid.is_box_valid(box_row, box_col),
                        "seed {} box ({},{})",
                        seed,
                        box_row,
                        box_col
                    );
                }
            }
        }
    }

    #[test]
    fn puzzle_has_exactly_60_empties_and_21_givens() {
        let mut generator = Generator::with_seed(7);
        let grid = generator.generate();
        assert_eq!(grid.empty_count(), EMPTY_CELLS);
        assert_eq!(grid.given_count(), 81 - EMPTY_CELLS);
        for pos in Position::all() {
            let cell = grid.cell(pos);
            // erased cells are editable, surviving cells stay given
            assert_eq!(cell.is_given(), !cell.is_empty());
        }
    }

    #[test]
    fn puzzle_givens_are_mutually_consistent() {
        let mut generator = Generator::with_seed(99);
        let grid = generator.generate();
        for i in 0..9 {
            assert!(grid.is_row_valid(i));
            assert!(grid.is_col_valid(i));
        }
        for box_row in 0..3 {
            for box_col in 0..3 {
                assert!(grid.is_box_valid(box_row, box_col));
            }
        }
    }

    #[test]
    fn same_seed_reproduces_the_same_puzzle() {
        let a = Generator::with_seed(1234).generate();
        let b = Generator::with_seed(1234).generate();
        assert_eq!(a.to_string_compact(), b.to_string_compact());
    }
}
