//! Terminal front end.
//!
//! A small, game-oriented rendering layer: the view draws a
//! [`core::GameSnapshot`] into a framebuffer of styled glyphs and the renderer
//! flushes the difference to the terminal through `crossterm`.
//!
//! - Grid cells are drawn 2 columns wide to keep them roughly square.
//! - Nothing here mutates game state; the view only reads snapshots.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use tetris_board_core as core;
pub use tetris_board_types as types;

pub use fb::{FrameBuffer, Glyph, GlyphStyle, Rgb};
pub use game_view::{color_rgb, AnchorY, GameView, Viewport};
pub use renderer::{
    encode_diff_into, encode_full_into, for_each_changed_span, Span, TerminalRenderer,
};
