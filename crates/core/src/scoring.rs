//! Scoring module - score, lines and level derived from board events
//!
//! Scoring is not part of the board. A [`ScoreTracker`] observes
//! [`BoardEvent::LinesCleared`] and keeps the running totals:
//!
//! - every cleared line is worth [`POINTS_PER_LINE`] points
//! - the level is `lines / LINES_PER_LEVEL + 1`
//! - gravity speeds up by [`LEVEL_DROP_DECREMENT_MS`] per level, never below
//!   [`DROP_INTERVAL_MIN_MS`]

use tracing::info;

use crate::event::{BoardEvent, BoardObserver};
use crate::types::{
    BASE_DROP_MS, DROP_INTERVAL_MIN_MS, LEVEL_DROP_DECREMENT_MS, LINES_PER_LEVEL, POINTS_PER_LINE,
};

/// Points for clearing `lines` rows at once
pub fn calculate_line_score(lines: usize) -> u32 {
    (lines as u32).saturating_mul(POINTS_PER_LINE)
}

/// Level (1-based) reached after `lines` total cleared lines
pub fn level_for_lines(lines: u32) -> u32 {
    lines / LINES_PER_LEVEL + 1
}

/// Gravity interval in milliseconds for `level`
pub fn drop_interval_ms(level: u32) -> u32 {
    let decrement = level.saturating_sub(1).saturating_mul(LEVEL_DROP_DECREMENT_MS);
    BASE_DROP_MS
        .saturating_sub(decrement)
        .max(DROP_INTERVAL_MIN_MS)
}

/// Running score totals fed by board events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreTracker {
    score: u32,
    lines: u32,
}

impl ScoreTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        level_for_lines(self.lines)
    }

    /// Lines still missing before the next level
    pub fn lines_to_level_up(&self) -> u32 {
        self.level() * LINES_PER_LEVEL - self.lines
    }

    /// Gravity interval for the current level
    pub fn drop_interval_ms(&self) -> u32 {
        drop_interval_ms(self.level())
    }

    /// Count `cleared` lines
    pub fn add_lines(&mut self, cleared: usize) {
        if cleared == 0 {
            return;
        }
        let before = self.level();
        self.score = self.score.saturating_add(calculate_line_score(cleared));
        self.lines = self.lines.saturating_add(cleared as u32);

        if self.level() > before {
            info!(level = self.level(), lines = self.lines, "level up");
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl BoardObserver for ScoreTracker {
    fn on_event(&mut self, event: &BoardEvent) {
        if let BoardEvent::LinesCleared(rows) = event {
            self.add_lines(rows.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::ClearedRows;

    #[test]
    fn test_line_score() {
        assert_eq!(calculate_line_score(0), 0);
        assert_eq!(calculate_line_score(1), 10);
        assert_eq!(calculate_line_score(4), 40);
    }

    #[test]
    fn test_level_progression() {
        assert_eq!(level_for_lines(0), 1);
        assert_eq!(level_for_lines(9), 1);
        assert_eq!(level_for_lines(10), 2);
        assert_eq!(level_for_lines(25), 3);
    }

    #[test]
    fn test_drop_interval_floor() {
        assert_eq!(drop_interval_ms(1), 1000);
        assert_eq!(drop_interval_ms(2), 850);
        assert_eq!(drop_interval_ms(7), 100);
        assert_eq!(drop_interval_ms(30), 100);
    }

    #[test]
    fn test_tracker_counts_cleared_rows() {
        let mut tracker = ScoreTracker::new();
        let rows: ClearedRows = [16u8, 17, 18, 19].into_iter().collect();

        tracker.on_event(&BoardEvent::LinesCleared(rows));
        tracker.on_event(&BoardEvent::GameOver);

        assert_eq!(tracker.score(), 40);
        assert_eq!(tracker.lines(), 4);
        assert_eq!(tracker.level(), 1);
        assert_eq!(tracker.lines_to_level_up(), 6);
    }

    #[test]
    fn test_tracker_level_up_and_reset() {
        let mut tracker = ScoreTracker::new();
        for _ in 0..3 {
            tracker.add_lines(4);
        }

        assert_eq!(tracker.lines(), 12);
        assert_eq!(tracker.level(), 2);
        assert_eq!(tracker.lines_to_level_up(), 8);
        assert_eq!(tracker.drop_interval_ms(), 850);

        tracker.reset();
        assert_eq!(tracker, ScoreTracker::new());
    }
}
