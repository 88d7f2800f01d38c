//! Board module - the game-state engine
//!
//! The board owns the frozen grid, the active piece, the preview piece and the
//! piece generator. It is a small state machine:
//!
//! - `Playing`: an active piece exists and commands are applied.
//! - `GameOver`: terminal; every command except [`Board::new_game`] is a no-op.
//!
//! Illegal moves and rotations are not errors, they are ignored. A downward
//! move that does not fit locks the piece instead (gravity rest), which is also
//! what [`Board::step`] and [`Board::hard_drop`] end with.
//!
//! Changes are queued as [`BoardEvent`]s and handed out by
//! [`Board::drain_events`].

use std::vec::Drain;

use tracing::{debug, info, trace};

use crate::event::{BoardEvent, PieceChange};
use crate::grid::{FrozenGrid, GridSnapshot};
use crate::pieces::Piece;
use crate::rng::PieceGenerator;
use crate::types::{Cell, Command, MoveDirection, RotateDirection};

/// Engine state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardState {
    Playing,
    GameOver,
}

/// What a single command did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandOutcome {
    /// The active piece moved or rotated.
    Moved,
    /// Nothing changed (blocked move/rotation, or the game is over).
    Ignored,
    /// The active piece locked and the next one spawned.
    Locked { lines: usize },
    /// The active piece locked and the next one could not spawn.
    GameOver,
    /// A new game started.
    Reset,
}

/// The game-state engine
#[derive(Debug, Clone)]
pub struct Board {
    grid: FrozenGrid,
    /// `None` only while `state == GameOver`.
    active: Option<Piece>,
    next: Piece,
    state: BoardState,
    pieces: PieceGenerator,
    /// Pending notifications, oldest first.
    events: Vec<BoardEvent>,
    /// Commands received over the board's lifetime (never reset).
    command_count: u64,
}

impl Board {
    /// Create a board with a uniform random generator seeded with `seed`
    pub fn new(seed: u32) -> Self {
        Self::with_generator(PieceGenerator::uniform(seed))
    }

    /// Create a board drawing pieces from `pieces`
    pub fn with_generator(pieces: PieceGenerator) -> Self {
        Self::from_grid(FrozenGrid::new(), pieces)
    }

    /// Start a game on an already populated grid.
    ///
    /// Used for scenario setups. If the first piece cannot spawn the board
    /// starts in `GameOver`.
    pub fn from_grid(grid: FrozenGrid, mut pieces: PieceGenerator) -> Self {
        let first = pieces.draw();
        let mut board = Self {
            grid,
            active: None,
            next: Piece::spawn(first),
            state: BoardState::Playing,
            pieces,
            events: Vec::with_capacity(8),
            command_count: 0,
        };
        board.start();
        board
    }

    pub fn state(&self) -> BoardState {
        self.state
    }

    pub fn is_game_over(&self) -> bool {
        self.state == BoardState::GameOver
    }

    pub fn active(&self) -> Option<Piece> {
        self.active
    }

    pub fn next(&self) -> Piece {
        self.next
    }

    pub fn command_count(&self) -> u64 {
        self.command_count
    }

    /// Settled cell at (x, y); `None` when empty or out of bounds.
    pub fn cell(&self, x: i8, y: i8) -> Cell {
        self.grid.get(x, y).flatten()
    }

    /// Copy of the settled cells.
    pub fn grid_snapshot(&self) -> GridSnapshot {
        self.grid.snapshot()
    }

    /// Whether `piece` would be legal on the current grid.
    pub fn fits(&self, piece: &Piece) -> bool {
        self.grid.fits(piece)
    }

    /// Notifications queued since the last drain.
    pub fn pending_events(&self) -> &[BoardEvent] {
        &self.events
    }

    /// Take all queued notifications, oldest first.
    pub fn drain_events(&mut self) -> Drain<'_, BoardEvent> {
        self.events.drain(..)
    }

    /// Apply a command
    pub fn apply(&mut self, command: Command) -> CommandOutcome {
        match command {
            Command::Move(direction) => self.move_piece(direction),
            Command::Rotate(direction) => self.rotate(direction),
            Command::Drop => self.hard_drop(),
            Command::Step => self.step(),
            Command::NewGame => self.new_game(),
        }
    }

    /// Shift the active piece one cell.
    ///
    /// A blocked left/right shift is ignored; a blocked downward shift locks
    /// the piece where it is.
    pub fn move_piece(&mut self, direction: MoveDirection) -> CommandOutcome {
        self.command_count += 1;
        let Some(active) = self.playing_piece() else {
            return CommandOutcome::Ignored;
        };

        let candidate = active.moved(direction);
        if self.grid.fits(&candidate) {
            self.set_active(candidate);
            return CommandOutcome::Moved;
        }

        if direction == MoveDirection::Down {
            return self.lock(active);
        }

        trace!(?direction, "move blocked");
        CommandOutcome::Ignored
    }

    /// Turn the active piece a quarter in place. No wall kicks: a rotation
    /// that does not fit is ignored.
    pub fn rotate(&mut self, direction: RotateDirection) -> CommandOutcome {
        self.command_count += 1;
        let Some(active) = self.playing_piece() else {
            return CommandOutcome::Ignored;
        };

        let candidate = active.rotated(direction);
        if self.grid.fits(&candidate) {
            self.set_active(candidate);
            return CommandOutcome::Moved;
        }

        trace!(?direction, kind = ?active.kind, "rotation blocked");
        CommandOutcome::Ignored
    }

    /// Drop the active piece as far as it goes and lock it there.
    ///
    /// Intermediate rows are not published; the command yields a single lock.
    pub fn hard_drop(&mut self) -> CommandOutcome {
        self.command_count += 1;
        let Some(mut piece) = self.playing_piece() else {
            return CommandOutcome::Ignored;
        };

        loop {
            let below = piece.moved(MoveDirection::Down);
            if !self.grid.fits(&below) {
                break;
            }
            piece = below;
        }

        self.lock(piece)
    }

    /// Gravity tick; same as moving down.
    pub fn step(&mut self) -> CommandOutcome {
        self.move_piece(MoveDirection::Down)
    }

    /// Throw the current game away and start over, from any state.
    pub fn new_game(&mut self) -> CommandOutcome {
        self.command_count += 1;
        self.grid.clear();
        self.pieces.reset();
        self.active = None;
        self.next = Piece::spawn(self.pieces.draw());
        self.state = BoardState::Playing;
        info!(commands = self.command_count, "new game");
        self.start();
        CommandOutcome::Reset
    }

    /// Publish the grid and spawn the first piece.
    fn start(&mut self) {
        self.events.push(BoardEvent::GridChanged(self.grid.snapshot()));
        self.spawn_next();
    }

    fn playing_piece(&self) -> Option<Piece> {
        match self.state {
            BoardState::Playing => self.active,
            BoardState::GameOver => None,
        }
    }

    fn set_active(&mut self, piece: Piece) {
        self.active = Some(piece);
        self.events.push(BoardEvent::PieceChanged(PieceChange {
            active: piece,
            next: self.next,
        }));
    }

    /// Write `piece` into the grid, clear rows, then bring in the next piece.
    fn lock(&mut self, piece: Piece) -> CommandOutcome {
        self.grid.lock(&piece);
        self.active = None;

        let cleared = self.grid.clear_full_rows();
        let lines = cleared.len();
        debug!(
            kind = ?piece.kind,
            x = piece.x,
            y = piece.y,
            lines,
            "piece locked"
        );

        self.events.push(BoardEvent::GridChanged(self.grid.snapshot()));
        if !cleared.is_empty() {
            self.events.push(BoardEvent::LinesCleared(cleared));
        }

        if self.spawn_next() {
            CommandOutcome::Locked { lines }
        } else {
            CommandOutcome::GameOver
        }
    }

    /// Promote the preview piece and draw a new preview.
    ///
    /// Returns false (and ends the game) when the promoted piece collides
    /// with the settled cells at its spawn position.
    fn spawn_next(&mut self) -> bool {
        let upcoming = Piece::spawn(self.pieces.draw());
        let spawned = std::mem::replace(&mut self.next, upcoming);

        if !self.grid.fits(&spawned) {
            self.state = BoardState::GameOver;
            self.active = None;
            self.events.push(BoardEvent::GameOver);
            info!(kind = ?spawned.kind, "spawn blocked, game over");
            return false;
        }

        self.set_active(spawned);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Color, PieceKind, Rotation};

    fn o_board() -> Board {
        Board::with_generator(PieceGenerator::sequence([PieceKind::O]))
    }

    #[test]
    fn test_new_board_is_playing() {
        let board = Board::new(12345);

        assert_eq!(board.state(), BoardState::Playing);
        assert!(board.active().is_some());
        assert_eq!(board.grid_snapshot().occupied_count(), 0);
        assert_eq!(board.command_count(), 0);
    }

    #[test]
    fn test_construction_queues_grid_then_piece() {
        let mut board = o_board();
        let events: Vec<_> = board.drain_events().collect();

        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], BoardEvent::GridChanged(_)));
        assert!(matches!(events[1], BoardEvent::PieceChanged(_)));
        assert!(board.pending_events().is_empty());
    }

    #[test]
    fn test_move_right_and_left() {
        let mut board = o_board();
        let start_x = board.active().unwrap().x;

        assert_eq!(board.move_piece(MoveDirection::Right), CommandOutcome::Moved);
        assert_eq!(board.active().unwrap().x, start_x + 1);

        assert_eq!(board.move_piece(MoveDirection::Left), CommandOutcome::Moved);
        assert_eq!(board.active().unwrap().x, start_x);
    }

    #[test]
    fn test_blocked_side_move_is_ignored() {
        let mut board = o_board();

        // O occupies columns x+1..=x+2 from x=3: four moves reach the wall.
        for _ in 0..4 {
            assert_eq!(board.move_piece(MoveDirection::Left), CommandOutcome::Moved);
        }
        board.drain_events().for_each(drop);

        let before = board.active();
        assert_eq!(board.move_piece(MoveDirection::Left), CommandOutcome::Ignored);
        assert_eq!(board.active(), before);
        assert!(board.pending_events().is_empty());
    }

    #[test]
    fn test_blocked_down_move_locks() {
        let mut board = o_board();

        let mut outcome = CommandOutcome::Moved;
        while outcome == CommandOutcome::Moved {
            outcome = board.move_piece(MoveDirection::Down);
        }

        assert_eq!(outcome, CommandOutcome::Locked { lines: 0 });
        assert_eq!(board.cell(4, 19), Some(Color::Yellow));
        assert_eq!(board.cell(5, 18), Some(Color::Yellow));
        assert_eq!(board.active(), Some(Piece::spawn(PieceKind::O)));
    }

    #[test]
    fn test_rotate_in_place() {
        let mut board = Board::with_generator(PieceGenerator::sequence([PieceKind::T]));

        assert_eq!(board.rotate(RotateDirection::Clockwise), CommandOutcome::Moved);
        assert_eq!(board.active().unwrap().rotation, Rotation::East);

        assert_eq!(
            board.rotate(RotateDirection::CounterClockwise),
            CommandOutcome::Moved
        );
        assert_eq!(board.active().unwrap().rotation, Rotation::North);
    }

    #[test]
    fn test_hard_drop_locks_on_floor() {
        let mut board = o_board();
        board.drain_events().for_each(drop);

        assert_eq!(board.hard_drop(), CommandOutcome::Locked { lines: 0 });
        assert_eq!(board.grid_snapshot().occupied_count(), 4);
        assert!(board.cell(4, 18).is_some());
        assert!(board.cell(4, 17).is_none());
    }

    #[test]
    fn test_step_matches_move_down() {
        let mut a = o_board();
        let mut b = o_board();

        assert_eq!(a.step(), b.move_piece(MoveDirection::Down));
        assert_eq!(a.active(), b.active());
    }

    #[test]
    fn test_command_count_is_monotonic_across_new_game() {
        let mut board = o_board();
        board.move_piece(MoveDirection::Left);
        board.rotate(RotateDirection::Clockwise);
        board.new_game();

        assert_eq!(board.command_count(), 3);
    }

    #[test]
    fn test_game_over_ignores_commands() {
        let mut grid = FrozenGrid::new();
        // Block the O spawn cells.
        grid.set(4, 0, Some(Color::Red));
        let mut board = Board::from_grid(grid, PieceGenerator::sequence([PieceKind::O]));

        assert!(board.is_game_over());
        assert!(board.active().is_none());
        board.drain_events().for_each(drop);

        assert_eq!(board.move_piece(MoveDirection::Left), CommandOutcome::Ignored);
        assert_eq!(board.rotate(RotateDirection::Clockwise), CommandOutcome::Ignored);
        assert_eq!(board.hard_drop(), CommandOutcome::Ignored);
        assert_eq!(board.step(), CommandOutcome::Ignored);
        assert!(board.pending_events().is_empty());

        assert_eq!(board.new_game(), CommandOutcome::Reset);
        assert_eq!(board.state(), BoardState::Playing);
    }

    #[test]
    fn test_apply_dispatches_commands() {
        let mut board = o_board();

        assert_eq!(
            board.apply(Command::Move(MoveDirection::Right)),
            CommandOutcome::Moved
        );
        assert_eq!(board.apply(Command::Drop), CommandOutcome::Locked { lines: 0 });
        assert_eq!(board.apply(Command::NewGame), CommandOutcome::Reset);
        assert_eq!(board.grid_snapshot().occupied_count(), 0);
    }
}
