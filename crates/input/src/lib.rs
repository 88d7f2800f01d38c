//! Terminal input module.
//!
//! Maps `crossterm` key events into [`crate::types::InputAction`]. It holds no
//! state: key repeat comes from the terminal, one press is one action.

pub mod map;

pub use tetris_board_types as types;

pub use map::{handle_key_event, should_quit};
