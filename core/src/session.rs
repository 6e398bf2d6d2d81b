//! Game session layer: wraps a [`Board`] with win/loss flags and maps
//! discrete input commands from the presentation layer onto engine
//! operations.

use crate::{Board, Direction, Grid, WINNING_TILE};

/// A discrete input command from the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Undo,
    RandomMove,
    AutoMove,
    Reset,
}

/// One play session: a board plus derived win/loss state.
///
/// Every command is processed to completion before the next is accepted;
/// flags are re-evaluated after each mutating command.
pub struct Game {
    board: Board,
    won: bool,
    lost: bool,
}

impl Game {
    /// Start a new session with the given seed.
    pub fn new(seed: u64) -> Self {
        Game {
            board: Board::new(seed),
            won: false,
            lost: false,
        }
    }

    /// Process one input command.
    ///
    /// Reset is always honored. For every other command the order is:
    /// loss check, then the command effect while the game is still active,
    /// then the win check. Once won or lost, everything but Reset is a
    /// no-op.
    pub fn process_input(&mut self, command: Command) {
        if command == Command::Reset {
            self.reset();
            return;
        }

        if !self.board.can_move() {
            self.lost = true;
        }
        if self.won || self.lost {
            return;
        }

        match command {
            Command::Move(direction) => self.board.apply_move(direction),
            Command::Undo => self.board.rollback(),
            Command::RandomMove => self.board.random_move(),
            Command::AutoMove => self.board.auto_move(),
            Command::Reset => unreachable!("handled above"),
        }

        if self.board.max_tile() == WINNING_TILE {
            self.won = true;
        }
    }

    /// Move in a direction, ignored once the game is won or lost.
    pub fn move_dir(&mut self, direction: Direction) {
        if !self.won && !self.lost {
            self.board.apply_move(direction);
        }
    }

    /// Clear both flags and reinitialize the board.
    pub fn reset(&mut self) {
        self.won = false;
        self.lost = false;
        self.board.reset();
    }

    /// Read view of the grid.
    pub fn grid(&self) -> &Grid {
        self.board.grid()
    }

    /// Current score.
    pub fn score(&self) -> u32 {
        self.board.score()
    }

    /// Largest tile merged this session.
    pub fn max_tile(&self) -> crate::Tile {
        self.board.max_tile()
    }

    /// True once a 2048 tile has been merged; sticky until reset.
    pub fn is_won(&self) -> bool {
        self.won
    }

    /// True once no move is possible; sticky until reset.
    pub fn is_lost(&self) -> bool {
        self.lost
    }

    /// The underlying board, for rendering.
    pub fn board(&self) -> &Board {
        &self.board
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GRID_SIZE;

    fn stuck_grid() -> Grid {
        [
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [4, 2, 4, 2],
        ]
    }

    #[test]
    fn test_new_session_is_active() {
        let game = Game::new(42);
        assert!(!game.is_won());
        assert!(!game.is_lost());
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_loss_detected_and_moves_suppressed() {
        let mut game = Game::new(0);
        game.board.force_grid(stuck_grid());
        game.process_input(Command::Move(Direction::Left));
        assert!(game.is_lost());
        // The move itself was suppressed.
        assert_eq!(*game.grid(), stuck_grid());
        assert_eq!(game.score(), 0);
        // Further commands stay no-ops.
        game.process_input(Command::AutoMove);
        assert_eq!(*game.grid(), stuck_grid());
    }

    #[test]
    fn test_win_on_2048_merge_and_sticky() {
        let mut game = Game::new(0);
        let mut grid = [[0; GRID_SIZE]; GRID_SIZE];
        grid[0] = [1024, 1024, 0, 0];
        game.board.force_grid(grid);
        game.process_input(Command::Move(Direction::Left));
        assert_eq!(game.max_tile(), 2048);
        assert!(game.is_won());
        // Won sessions ignore movement but keep the flag.
        let frozen = *game.grid();
        game.process_input(Command::Move(Direction::Right));
        assert!(game.is_won());
        assert_eq!(*game.grid(), frozen);
    }

    #[test]
    fn test_reset_clears_flags() {
        let mut game = Game::new(0);
        game.board.force_grid(stuck_grid());
        game.process_input(Command::Move(Direction::Up));
        assert!(game.is_lost());
        game.process_input(Command::Reset);
        assert!(!game.is_lost());
        assert!(!game.is_won());
        assert_eq!(game.score(), 0);
        assert_eq!(
            game.grid().iter().flatten().filter(|&&v| v != 0).count(),
            2
        );
    }

    #[test]
    fn test_undo_command_restores_state() {
        let mut game = Game::new(8);
        let grid = *game.grid();
        let score = game.score();
        game.process_input(Command::Move(Direction::Down));
        game.process_input(Command::Undo);
        assert_eq!(*game.grid(), grid);
        assert_eq!(game.score(), score);
    }

    #[test]
    fn test_move_dir_guards_flags() {
        let mut game = Game::new(8);
        game.won = true;
        let grid = *game.grid();
        game.move_dir(Direction::Left);
        assert_eq!(*game.grid(), grid);
    }

    #[test]
    fn test_random_and_auto_commands_run() {
        let mut game = Game::new(123);
        game.process_input(Command::RandomMove);
        game.process_input(Command::AutoMove);
        assert!(!game.is_lost());
        // Two mutating commands on a fresh board leave tiles behind.
        assert!(game.grid().iter().flatten().filter(|&&v| v != 0).count() >= 2);
    }
}
