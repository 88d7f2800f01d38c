//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{get_shape, GameSnapshot, Piece};
use crate::fb::{FrameBuffer, Glyph, GlyphStyle, Rgb};
use crate::types::{Color, Rotation, BOARD_HEIGHT, BOARD_WIDTH};

const PLAYFIELD_BG: Rgb = Rgb::new(30, 30, 40);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);
const BLOCK: char = '█';

/// Key help shown under the preview, top to bottom.
const KEY_HELP: [&str; 9] = [
    "←/→  move",
    "↓    down",
    "SPC  drop",
    "Z/↑  rotate",
    "X    rotate ccw",
    "P    pause",
    "N    new game",
    "E    end game",
    "G    grid  Q quit",
];

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Vertical placement of the playfield.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// Terminal layout of the playfield and the side panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameView {
    /// Terminal columns per grid cell.
    cell_w: u16,
    /// Terminal rows per grid cell.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 makes cells look square in most terminal fonts.
        Self::new(2, 1)
    }
}

/// Top-left of the bordered playfield and its outer size.
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w,
            cell_h,
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Render a frame into an existing framebuffer.
    ///
    /// Callers keep one framebuffer across frames; it is resized only when the
    /// viewport changes.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.fill(Glyph::default());

        let frame = self.frame(viewport);
        let inner_w = frame.w - 2;
        let inner_h = frame.h - 2;

        fb.fill_rect(
            frame.x + 1,
            frame.y + 1,
            inner_w,
            inner_h,
            ' ',
            GlyphStyle::new(PLAYFIELD_BG, PLAYFIELD_BG),
        );
        draw_border(fb, frame, GlyphStyle::new(Rgb::new(200, 200, 200), PANEL_BG));

        for (y, row) in snap.grid.rows.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                let (x, y) = (x as u16, y as u16);
                match cell {
                    Some(_) if snap.game_over => {
                        self.fill_cell(fb, frame, x, y, BLOCK, game_over_style());
                    }
                    Some(color) => self.fill_cell(fb, frame, x, y, BLOCK, block_style(*color)),
                    None if snap.show_grid => {
                        let dot = GlyphStyle::new(Rgb::new(90, 90, 100), PLAYFIELD_BG).dim();
                        self.fill_cell(fb, frame, x, y, '·', dot);
                    }
                    None => {}
                }
            }
        }

        if let Some(active) = snap.active {
            for (x, y) in active.cells() {
                if (0..BOARD_WIDTH as i8).contains(&x) && (0..BOARD_HEIGHT as i8).contains(&y) {
                    let style = block_style(active.color()).bold();
                    self.fill_cell(fb, frame, x as u16, y as u16, BLOCK, style);
                }
            }
        }

        self.draw_side_panel(fb, snap, viewport, frame);

        if snap.game_over {
            draw_overlay_text(fb, frame, "GAME OVER");
        } else if snap.paused {
            draw_overlay_text(fb, frame, "PAUSED");
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn frame(&self, viewport: Viewport) -> Frame {
        let w = (BOARD_WIDTH as u16) * self.cell_w + 2;
        let h = (BOARD_HEIGHT as u16) * self.cell_h + 2;
        let x = viewport.width.saturating_sub(w) / 2;
        let y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(h) / 2,
            AnchorY::Top => 0,
        };
        Frame { x, y, w, h }
    }

    fn fill_cell(
        &self,
        fb: &mut FrameBuffer,
        frame: Frame,
        cell_x: u16,
        cell_y: u16,
        ch: char,
        style: GlyphStyle,
    ) {
        let px = frame.x + 1 + cell_x * self.cell_w;
        let py = frame.y + 1 + cell_y * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        viewport: Viewport,
        frame: Frame,
    ) {
        let panel_x = frame.x.saturating_add(frame.w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 12 {
            return;
        }

        let label = GlyphStyle::default().bold();
        let value = GlyphStyle::new(Rgb::new(200, 200, 200), PANEL_BG);

        let mut y = frame.y;
        let stats = [
            ("SCORE", snap.score.score),
            ("LEVEL", snap.score.level),
            ("LINES", snap.score.lines),
            ("LEVEL UP IN", snap.score.lines_to_level_up),
        ];
        for (name, number) in stats {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x, y.saturating_add(1), number, value);
            y = y.saturating_add(3);
        }

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        if let Some(next) = snap.next {
            draw_preview(fb, panel_x, y, next);
        }
        y = y.saturating_add(3);

        for line in KEY_HELP {
            if y >= viewport.height {
                break;
            }
            fb.put_str(panel_x, y, line, value.dim());
            y = y.saturating_add(1);
        }
    }
}

/// Draw `piece` in its spawn orientation as a mini shape, 2 columns per mino.
fn draw_preview(fb: &mut FrameBuffer, x: u16, y: u16, piece: Piece) {
    let style = block_style(piece.color());
    let shape = get_shape(piece.kind, Rotation::North);
    // The I bar sits on offset row 1; lift it so every preview starts at `y`.
    let top = shape.iter().map(|&(_, dy)| dy).min().unwrap_or(0);
    for (dx, dy) in shape {
        let px = x.saturating_add(dx as u16 * 2);
        let py = y.saturating_add((dy - top) as u16);
        fb.put_char(px, py, BLOCK, style);
        fb.put_char(px.saturating_add(1), py, BLOCK, style);
    }
}

fn draw_border(fb: &mut FrameBuffer, frame: Frame, style: GlyphStyle) {
    let Frame { x, y, w, h } = frame;
    if w < 2 || h < 2 {
        return;
    }
    let (right, bottom) = (x + w - 1, y + h - 1);

    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, bottom, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(right, y + dy, '│', style);
    }
    fb.put_char(x, y, '┌', style);
    fb.put_char(right, y, '┐', style);
    fb.put_char(x, bottom, '└', style);
    fb.put_char(right, bottom, '┘', style);
}

fn draw_overlay_text(fb: &mut FrameBuffer, frame: Frame, text: &str) {
    let text_w = text.chars().count() as u16;
    let x = frame.x.saturating_add(frame.w.saturating_sub(text_w) / 2);
    let y = frame.y.saturating_add(frame.h / 2);
    let style = GlyphStyle::new(Rgb::new(255, 255, 255), PANEL_BG).bold();
    fb.put_str(x, y, text, style);
}

/// Foreground for settled and falling blocks.
pub fn color_rgb(color: Color) -> Rgb {
    match color {
        Color::Cyan => Rgb::new(80, 220, 220),
        Color::Yellow => Rgb::new(240, 220, 80),
        Color::Purple => Rgb::new(200, 120, 220),
        Color::Green => Rgb::new(100, 220, 120),
        Color::Red => Rgb::new(220, 80, 80),
        Color::Blue => Rgb::new(80, 120, 220),
        Color::Orange => Rgb::new(255, 165, 0),
    }
}

fn block_style(color: Color) -> GlyphStyle {
    GlyphStyle::new(color_rgb(color), PLAYFIELD_BG)
}

/// Settled blocks turn dark gray once the game is over.
fn game_over_style() -> GlyphStyle {
    GlyphStyle::new(Rgb::new(70, 70, 70), PLAYFIELD_BG)
}
