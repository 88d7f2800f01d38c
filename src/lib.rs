//! Terminal falling-block puzzle (workspace facade crate).
//!
//! The rules engine, input mapping and terminal front end live in dedicated
//! crates under `crates/`; this package re-exports them as
//! `tetris_board::{core,input,term,types}` and adds the application layer:
//! configuration, the session that wires board events to their consumers, and
//! the JSON-lines event log.

pub mod config;
pub mod event_log;
pub mod session;

pub use tetris_board_core as core;
pub use tetris_board_input as input;
pub use tetris_board_term as term;
pub use tetris_board_types as types;

pub use config::GameConfig;
pub use event_log::{EventLog, EventRecord};
pub use session::{Flow, Session, ViewState};
