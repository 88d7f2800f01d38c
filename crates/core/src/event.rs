//! Board notifications
//!
//! Every externally visible change is published as one [`BoardEvent`], queued
//! in the order the changes happen. Consumers drain the queue after a command
//! returns, so a handler can never re-enter a command that is still running.

use crate::grid::{ClearedRows, GridSnapshot};
use crate::pieces::Piece;

/// The active piece together with the preview piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceChange {
    pub active: Piece,
    pub next: Piece,
}

/// A single state change published by the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    /// The active piece moved or rotated, or a new piece spawned.
    PieceChanged(PieceChange),
    /// The settled cells changed (a lock, a clear, or a reset).
    GridChanged(GridSnapshot),
    /// Rows removed by the last lock, ascending.
    LinesCleared(ClearedRows),
    /// A freshly spawned piece collided with the settled cells.
    GameOver,
}

impl BoardEvent {
    /// Stable lowercase name, used for logging.
    pub fn name(&self) -> &'static str {
        match self {
            BoardEvent::PieceChanged(_) => "piece_changed",
            BoardEvent::GridChanged(_) => "grid_changed",
            BoardEvent::LinesCleared(_) => "lines_cleared",
            BoardEvent::GameOver => "game_over",
        }
    }
}

/// Receiver of board notifications.
pub trait BoardObserver {
    fn on_event(&mut self, event: &BoardEvent);
}

/// Deliver `events` in order to every observer.
///
/// Each event reaches all observers before the next event is delivered.
pub fn dispatch(
    events: impl IntoIterator<Item = BoardEvent>,
    observers: &mut [&mut dyn BoardObserver],
) {
    for event in events {
        for observer in observers.iter_mut() {
            observer.on_event(&event);
        }
    }
}

/// Observer that records every event; handy in tests and tools.
#[derive(Debug, Default, Clone)]
pub struct EventRecorder {
    pub events: Vec<BoardEvent>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, name: &str) -> usize {
        self.events.iter().filter(|e| e.name() == name).count()
    }
}

impl BoardObserver for EventRecorder {
    fn on_event(&mut self, event: &BoardEvent) {
        self.events.push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceKind;

    struct Counter(usize);

    impl BoardObserver for Counter {
        fn on_event(&mut self, _event: &BoardEvent) {
            self.0 += 1;
        }
    }

    #[test]
    fn dispatch_reaches_every_observer_in_order() {
        let mut recorder = EventRecorder::new();
        let mut counter = Counter(0);

        let change = PieceChange {
            active: Piece::spawn(PieceKind::T),
            next: Piece::spawn(PieceKind::I),
        };
        let events = vec![
            BoardEvent::GridChanged(GridSnapshot::empty()),
            BoardEvent::PieceChanged(change),
            BoardEvent::GameOver,
        ];

        dispatch(events.clone(), &mut [&mut recorder, &mut counter]);

        assert_eq!(recorder.events, events);
        assert_eq!(counter.0, 3);
        assert_eq!(recorder.count("piece_changed"), 1);
    }
}
