//! Snapshot - plain-data frame description handed to front ends

use crate::grid::GridSnapshot;
use crate::pieces::Piece;
use crate::scoring::ScoreTracker;

/// Score panel values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScoreSnapshot {
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub lines_to_level_up: u32,
}

impl From<&ScoreTracker> for ScoreSnapshot {
    fn from(value: &ScoreTracker) -> Self {
        Self {
            score: value.score(),
            level: value.level(),
            lines: value.lines(),
            lines_to_level_up: value.lines_to_level_up(),
        }
    }
}

/// Everything a front end needs to draw one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub grid: GridSnapshot,
    pub active: Option<Piece>,
    pub next: Option<Piece>,
    pub score: ScoreSnapshot,
    pub paused: bool,
    pub game_over: bool,
    /// Draw dots in empty cells.
    pub show_grid: bool,
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            grid: GridSnapshot::empty(),
            active: None,
            next: None,
            score: ScoreSnapshot::from(&ScoreTracker::new()),
            paused: false,
            game_over: false,
            show_grid: false,
        }
    }
}
