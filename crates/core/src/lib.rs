//! Rules engine - pure, deterministic, and testable
//!
//! This crate contains the game rules: the settled grid, the falling piece,
//! piece generation and the board state machine that ties them together. It
//! has no dependencies on terminals or files; it only logs through `tracing`.
//!
//! # Module Structure
//!
//! - [`grid`]: 10x20 frozen grid with collision checks and row clearing
//! - [`pieces`]: Tetromino shape tables and the `Piece` value type
//! - [`rng`]: Seeded piece generation (uniform, 7-bag, fixed sequence)
//! - [`event`]: Board notifications and the observer seam
//! - [`board`]: The command-driven state machine
//! - [`scoring`]: Score, lines and level kept by an event observer
//! - [`snapshot`]: Plain-data frame description for front ends
//!
//! # Rules
//!
//! - Pieces spawn at anchor (3, 0) in the North orientation.
//! - Moves and rotations that do not fit are ignored. There are no wall kicks.
//! - A downward move that does not fit locks the piece; full rows are cleared
//!   and the rows above shift down.
//! - A spawned piece that collides with settled cells ends the game.
//!
//! # Example
//!
//! ```
//! use tetris_board_core::{Board, BoardEvent, CommandOutcome, PieceGenerator};
//! use tetris_board_core::types::{Command, MoveDirection, PieceKind};
//!
//! let mut board = Board::with_generator(PieceGenerator::sequence([PieceKind::O]));
//! board.drain_events().for_each(drop);
//!
//! board.apply(Command::Move(MoveDirection::Right));
//! let outcome = board.apply(Command::Drop);
//!
//! assert_eq!(outcome, CommandOutcome::Locked { lines: 0 });
//! let events: Vec<BoardEvent> = board.drain_events().collect();
//! assert_eq!(events[1].name(), "grid_changed");
//! ```

pub mod board;
pub mod event;
pub mod grid;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use tetris_board_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, BoardState, CommandOutcome};
pub use event::{dispatch, BoardEvent, BoardObserver, EventRecorder, PieceChange};
pub use grid::{ClearedRows, FrozenGrid, GridRow, GridSnapshot};
pub use pieces::{get_shape, Piece, SPAWN_POSITION};
pub use rng::{PieceGenerator, Randomizer, SimpleRng};
pub use scoring::ScoreTracker;
pub use snapshot::{GameSnapshot, ScoreSnapshot};
