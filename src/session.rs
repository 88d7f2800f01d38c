//! Session - one player's game around a single board
//!
//! The session turns player intents and elapsed time into board commands and
//! routes the resulting board events to the collaborators that react to them:
//! the score tracker, the view state and the optional event log. It also owns
//! the things the board knows nothing about (pause, grid dots).

use std::fs::File;
use std::io::Write;

use anyhow::Result;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::core::{
    dispatch, Board, BoardEvent, BoardObserver, CommandOutcome, GameSnapshot, GridSnapshot,
    Piece, ScoreSnapshot, ScoreTracker,
};
use crate::event_log::EventLog;
use crate::types::{Command, InputAction};

/// Whether the event loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// What the player currently sees, rebuilt purely from board events
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub grid: GridSnapshot,
    pub active: Option<Piece>,
    pub next: Option<Piece>,
    pub game_over: bool,
}

impl BoardObserver for ViewState {
    fn on_event(&mut self, event: &BoardEvent) {
        match event {
            BoardEvent::PieceChanged(change) => {
                self.active = Some(change.active);
                self.next = Some(change.next);
                self.game_over = false;
            }
            BoardEvent::GridChanged(grid) => self.grid = *grid,
            BoardEvent::LinesCleared(_) => {}
            BoardEvent::GameOver => {
                self.active = None;
                self.game_over = true;
            }
        }
    }
}

pub struct Session<W: Write = File> {
    board: Board,
    score: ScoreTracker,
    view: ViewState,
    event_log: Option<EventLog<W>>,
    paused: bool,
    /// Game abandoned by the player; the board itself is still playable.
    ended: bool,
    show_grid: bool,
    /// Time accumulated towards the next gravity step.
    gravity_ms: u32,
    /// Reused buffer for drained events.
    pending: Vec<BoardEvent>,
}

impl Session<File> {
    /// Build a session from configuration, opening the event log if one is set
    pub fn from_config(config: &GameConfig) -> Result<Self> {
        let event_log = config
            .event_log
            .as_ref()
            .map(EventLog::<File>::create)
            .transpose()?;
        let mut session = Session::new(Board::with_generator(config.piece_generator()), event_log)?;
        session.show_grid = config.show_grid;
        info!(
            seed = config.seed,
            randomizer = config.randomizer.as_str(),
            "session started"
        );
        Ok(session)
    }
}

impl<W: Write> Session<W> {
    /// Wrap `board`; its construction events are delivered right away.
    pub fn new(board: Board, event_log: Option<EventLog<W>>) -> Result<Self> {
        let mut session = Self {
            board,
            score: ScoreTracker::new(),
            view: ViewState::default(),
            event_log,
            paused: false,
            ended: false,
            show_grid: false,
            gravity_ms: 0,
            pending: Vec::with_capacity(8),
        };
        session.pump_events()?;
        Ok(session)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> &ScoreTracker {
        &self.score
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether the game is over, by spawn collision or by [`InputAction::EndGame`]
    pub fn is_over(&self) -> bool {
        self.ended || self.board.is_game_over()
    }

    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    pub fn event_log(&self) -> Option<&EventLog<W>> {
        self.event_log.as_ref()
    }

    /// End the session, handing back its event log
    pub fn into_event_log(self) -> Option<EventLog<W>> {
        self.event_log
    }

    /// Apply one player intent
    pub fn handle(&mut self, action: InputAction) -> Result<Flow> {
        match action {
            InputAction::Quit => return Ok(Flow::Quit),
            InputAction::ToggleGrid => self.show_grid = !self.show_grid,
            InputAction::TogglePause => self.toggle_pause(),
            InputAction::EndGame => self.end_game(),
            InputAction::Command(Command::NewGame) => {
                self.paused = false;
                self.ended = false;
                self.gravity_ms = 0;
                self.score.reset();
                self.board.new_game();
            }
            InputAction::Command(command) => {
                if !self.paused && !self.ended {
                    let outcome = self.board.apply(command);
                    self.note_outcome(outcome);
                }
            }
        }
        self.pump_events()?;
        Ok(Flow::Continue)
    }

    /// Advance the gravity clock by `elapsed_ms`
    ///
    /// Steps the board once for every full drop interval that has passed.
    /// Nothing happens while paused or after game over.
    pub fn tick(&mut self, elapsed_ms: u32) -> Result<()> {
        if self.paused || self.is_over() {
            return Ok(());
        }

        self.gravity_ms = self.gravity_ms.saturating_add(elapsed_ms);
        loop {
            let interval = self.score.drop_interval_ms();
            if self.gravity_ms < interval {
                break;
            }
            self.gravity_ms -= interval;
            let outcome = self.board.step();
            self.note_outcome(outcome);
            // Level changes take effect on the next interval.
            self.pump_events()?;
            if self.board.is_game_over() {
                self.gravity_ms = 0;
                break;
            }
        }
        Ok(())
    }

    /// Deliver queued board events to every collaborator, in order
    pub fn pump_events(&mut self) -> Result<()> {
        self.pending.extend(self.board.drain_events());
        if self.pending.is_empty() {
            return Ok(());
        }

        let logged = match self.event_log.as_mut() {
            Some(log) => log.write_batch(&self.pending),
            None => Ok(()),
        };
        dispatch(self.pending.drain(..), &mut [&mut self.score, &mut self.view]);
        logged
    }

    /// Build the frame description for the view
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            grid: self.view.grid,
            active: self.view.active,
            next: self.view.next,
            score: ScoreSnapshot::from(&self.score),
            paused: self.paused,
            game_over: self.view.game_over || self.ended,
            show_grid: self.show_grid,
        }
    }

    fn toggle_pause(&mut self) {
        if self.is_over() {
            return;
        }
        self.paused = !self.paused;
        debug!(paused = self.paused, "pause toggled");
    }

    /// Stop the game where it stands: gravity halts, the board grays out and
    /// the score panel starts over. Only a new game resumes play.
    fn end_game(&mut self) {
        if self.is_over() {
            return;
        }
        info!(
            score = self.score.score(),
            lines = self.score.lines(),
            "game ended by player"
        );
        self.ended = true;
        self.paused = false;
        self.gravity_ms = 0;
        self.score.reset();
    }

    fn note_outcome(&self, outcome: CommandOutcome) {
        if outcome == CommandOutcome::GameOver {
            info!(
                score = self.score.score(),
                lines = self.score.lines(),
                level = self.score.level(),
                "game over"
            );
        }
    }
}
