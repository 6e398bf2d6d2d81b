//! # 2048 Game Core Engine
//!
//! A pure Rust implementation of the 2048 board engine with deterministic,
//! seedable PRNG for reproducible gameplay, single-level undo, and a greedy
//! one-ply auto-play move selector. Designed for easy integration with
//! terminal or graphical front-ends.
//!
//! ## Example
//!
//! ```rust
//! use puzzle_2048_core::{Board, Direction};
//!
//! let mut board = Board::new(42);  // Create board with seed 42
//! board.apply_move(Direction::Left);
//! println!("Score: {}", board.score());
//! ```

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

mod session;

pub use session::{Command, Game};

/// Board side length. The grid is always `GRID_SIZE` x `GRID_SIZE`.
pub const GRID_SIZE: usize = 4;

/// Reaching a tile of this value wins the game.
pub const WINNING_TILE: Tile = 2048;

/// A single cell value. 0 denotes an empty cell.
pub type Tile = u32;

/// The 4x4 playing field in row-major order.
pub type Grid = [[Tile; GRID_SIZE]; GRID_SIZE];

/// The four possible move directions in 2048.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

/// Pre-move snapshot for single-level undo. Capacity is exactly one:
/// each new move overwrites it, rollback consumes it.
#[derive(Clone)]
struct Snapshot {
    grid: Grid,
    score: u32,
}

/// How promising a candidate auto-play move looked after simulation.
///
/// Plain record compared lexicographically by `(empty_cells, score)`;
/// ties keep the earlier candidate in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MoveRating {
    empty_cells: i32,
    score: u32,
}

impl MoveRating {
    fn beats(&self, other: &MoveRating) -> bool {
        (self.empty_cells, self.score) > (other.empty_cells, other.score)
    }
}

/// The 2048 board engine.
///
/// Owns the grid, the score, the max-tile tracker and a one-slot move
/// history. All four directional moves are expressed as rotations around
/// a single left-compaction primitive.
#[derive(Clone)]
pub struct Board {
    grid: Grid,
    score: u32,
    max_tile: Tile,
    history: Option<Snapshot>,
    save_needed: bool,
    rng: SmallRng,
}

impl Board {
    /// Create a new board with the given seed.
    ///
    /// The board starts with two random tiles (90% chance of 2, 10% chance of 4).
    pub fn new(seed: u64) -> Self {
        let mut board = Board {
            grid: [[0; GRID_SIZE]; GRID_SIZE],
            score: 0,
            max_tile: 0,
            history: None,
            save_needed: true,
            rng: SmallRng::seed_from_u64(seed),
        };
        board.add_tile();
        board.add_tile();
        board
    }

    /// Reset to a fresh starting position: empty grid, two random tiles,
    /// score and max tile zeroed, history cleared.
    ///
    /// The RNG stream keeps running; determinism is anchored at `new`.
    pub fn reset(&mut self) {
        self.grid = [[0; GRID_SIZE]; GRID_SIZE];
        self.score = 0;
        self.max_tile = 0;
        self.history = None;
        self.save_needed = true;
        self.add_tile();
        self.add_tile();
    }

    /// Get a read view of the grid, row-major.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Get the current score.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Get the largest tile value ever merged this session.
    ///
    /// Monotonically non-decreasing; unlike the grid it is not restored
    /// by [`Board::rollback`].
    pub fn max_tile(&self) -> Tile {
        self.max_tile
    }

    /// Get the number of empty cells on the board.
    pub fn empty_count(&self) -> usize {
        self.grid.iter().flatten().filter(|&&v| v == 0).count()
    }

    /// Execute a move in the given direction.
    pub fn apply_move(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.left(),
            Direction::Right => self.right(),
            Direction::Up => self.up(),
            Direction::Down => self.down(),
        }
    }

    /// The primitive directional move. All other directions are a rotation,
    /// a `left`, and a compensating rotation back.
    ///
    /// Saves a pre-move snapshot unless a compound move already did, runs
    /// compress-then-merge on every row, and spawns one random tile if
    /// anything moved or merged.
    pub fn left(&mut self) {
        if self.save_needed {
            self.save_state();
        }
        let mut moved = false;
        for r in 0..GRID_SIZE {
            let mut row = self.grid[r];
            if Self::compress(&mut row) {
                moved = true;
            }
            let (gained, largest) = Self::merge(&mut row);
            if gained > 0 {
                self.score += gained;
                if largest > self.max_tile {
                    self.max_tile = largest;
                }
                moved = true;
            }
            self.grid[r] = row;
        }
        if moved {
            self.add_tile();
        }
        self.save_needed = true;
    }

    /// Move right: two quarter-rotations around the left primitive.
    pub fn right(&mut self) {
        self.save_state();
        self.rotate();
        self.rotate();
        self.left();
        self.rotate();
        self.rotate();
    }

    /// Move up: three quarter-rotations, left, one back.
    pub fn up(&mut self) {
        self.save_state();
        self.rotate();
        self.rotate();
        self.rotate();
        self.left();
        self.rotate();
    }

    /// Move down: one quarter-rotation, left, three back.
    pub fn down(&mut self) {
        self.save_state();
        self.rotate();
        self.left();
        self.rotate();
        self.rotate();
        self.rotate();
    }

    /// Restore grid and score from the snapshot slot, consuming it.
    /// Silent no-op when the slot is empty. Max tile is left untouched.
    pub fn rollback(&mut self) {
        if let Some(snapshot) = self.history.take() {
            self.grid = snapshot.grid;
            self.score = snapshot.score;
        }
    }

    /// Whether any move is still possible: an empty cell exists, or some
    /// horizontally or vertically adjacent pair holds equal values.
    ///
    /// The equality check deliberately does not exclude zero (two adjacent
    /// empty cells also satisfy it; the empty-cell check already covers
    /// that case).
    pub fn can_move(&self) -> bool {
        if self.grid.iter().flatten().any(|&v| v == 0) {
            return true;
        }
        for r in 0..GRID_SIZE {
            for c in 0..GRID_SIZE - 1 {
                if self.grid[r][c] == self.grid[r][c + 1] {
                    return true;
                }
            }
        }
        for r in 0..GRID_SIZE - 1 {
            for c in 0..GRID_SIZE {
                if self.grid[r][c] == self.grid[r + 1][c] {
                    return true;
                }
            }
        }
        false
    }

    /// Whether the total tile value differs from the most recent snapshot.
    ///
    /// Used transiently by [`Board::auto_move`] to detect no-op candidate
    /// moves. Sum comparison cannot see a pure shift without a merge or a
    /// spawn; that gap is part of the auto-play contract.
    pub fn has_board_changed(&self) -> bool {
        match &self.history {
            Some(snapshot) => grid_sum(&self.grid) != grid_sum(&snapshot.grid),
            None => false,
        }
    }

    /// Greedy one-ply auto-play: simulate each direction, rate the outcome
    /// by `(empty cells, score)`, roll the simulation back, then apply the
    /// best-rated direction for real.
    ///
    /// Candidates whose simulation left the tile sum unchanged are rated
    /// `(-1, 0)`. Ties keep the earlier direction in evaluation order
    /// Left, Up, Right, Down.
    pub fn auto_move(&mut self) {
        const EVAL_ORDER: [Direction; 4] = [
            Direction::Left,
            Direction::Up,
            Direction::Right,
            Direction::Down,
        ];

        let mut best: Option<(MoveRating, Direction)> = None;
        for direction in EVAL_ORDER {
            self.apply_move(direction);
            let rating = if self.has_board_changed() {
                MoveRating {
                    empty_cells: self.empty_count() as i32,
                    score: self.score,
                }
            } else {
                MoveRating {
                    empty_cells: -1,
                    score: 0,
                }
            };
            self.rollback();
            if best.as_ref().map_or(true, |(b, _)| rating.beats(b)) {
                best = Some((rating, direction));
            }
        }
        if let Some((_, direction)) = best {
            self.apply_move(direction);
        }
    }

    /// Apply a uniformly random direction (mod-4 draw from the board RNG).
    pub fn random_move(&mut self) {
        let n: u8 = self.rng.gen_range(0..4);
        match n {
            0 => self.left(),
            1 => self.right(),
            2 => self.up(),
            _ => self.down(),
        }
    }

    // -------------------------------------------------------------------------
    // Private methods
    // -------------------------------------------------------------------------

    /// Overwrite the snapshot slot with the current grid and score and mark
    /// the pending flag so a compound move saves only once.
    fn save_state(&mut self) {
        self.history = Some(Snapshot {
            grid: self.grid,
            score: self.score,
        });
        self.save_needed = false;
    }

    /// Spawn a new tile in a uniformly random empty cell.
    /// 90% chance of 2, 10% chance of 4. No-op on a full board.
    fn add_tile(&mut self) {
        let empty_cells: Vec<(usize, usize)> = (0..GRID_SIZE)
            .flat_map(|r| (0..GRID_SIZE).map(move |c| (r, c)))
            .filter(|&(r, c)| self.grid[r][c] == 0)
            .collect();

        if empty_cells.is_empty() {
            return;
        }

        let (r, c) = empty_cells[self.rng.gen_range(0..empty_cells.len())];
        self.grid[r][c] = if self.rng.gen::<f32>() < 0.9 { 2 } else { 4 };
    }

    /// Rotate the grid 90 degrees clockwise: `new[c][N-1-r] = old[r][c]`.
    fn rotate(&mut self) {
        let mut rotated: Grid = [[0; GRID_SIZE]; GRID_SIZE];
        for r in 0..GRID_SIZE {
            for c in 0..GRID_SIZE {
                rotated[c][GRID_SIZE - 1 - r] = self.grid[r][c];
            }
        }
        self.grid = rotated;
    }

    /// Shift all non-zero values to the front of the row, preserving order,
    /// and zero-fill the tail.
    ///
    /// Returns true when a tail position that ends up zero held a non-zero
    /// value beforehand, i.e. when the shift displaced anything.
    fn compress(row: &mut [Tile; GRID_SIZE]) -> bool {
        let mut write = 0;
        for read in 0..GRID_SIZE {
            let value = row[read];
            if value != 0 {
                row[write] = value;
                write += 1;
            }
        }
        let mut changed = false;
        for cell in row.iter_mut().skip(write) {
            if *cell != 0 {
                changed = true;
            }
            *cell = 0;
        }
        changed
    }

    /// Scan adjacent pairs left-to-right once; merge equal non-zero
    /// neighbors, re-compressing in place so the scan continues over the
    /// closed gap. Chains of 3+ equal tiles therefore merge pairwise from
    /// the left, never all at once.
    ///
    /// Expects a compressed row. Returns the score gained and the largest
    /// tile produced by a merge (0 if none).
    fn merge(row: &mut [Tile; GRID_SIZE]) -> (u32, Tile) {
        let mut gained = 0;
        let mut largest = 0;
        for i in 0..GRID_SIZE - 1 {
            if row[i] != 0 && row[i] == row[i + 1] {
                row[i] *= 2;
                row[i + 1] = 0;
                Self::compress(row);
                gained += row[i];
                largest = largest.max(row[i]);
            }
        }
        (gained, largest)
    }

    #[cfg(test)]
    pub(crate) fn force_grid(&mut self, grid: Grid) {
        self.grid = grid;
    }
}

fn grid_sum(grid: &Grid) -> u32 {
    grid.iter().flatten().sum()
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Board {{ score: {}, max_tile: {} }}",
            self.score, self.max_tile
        )?;
        for row in &self.grid {
            for &val in row {
                if val == 0 {
                    write!(f, "    .")?;
                } else {
                    write!(f, "{:5}", val)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Score: {}", self.score)?;
        writeln!(f, "+------+------+------+------+")?;
        for row in &self.grid {
            write!(f, "|")?;
            for &val in row {
                if val == 0 {
                    write!(f, "      |")?;
                } else {
                    write!(f, "{:^6}|", val)?;
                }
            }
            writeln!(f)?;
            writeln!(f, "+------+------+------+------+")?;
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
