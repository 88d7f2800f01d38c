//! TerminalRenderer: presents framebuffers on a real terminal.
//!
//! Each frame is compared with the previous one and only changed horizontal
//! spans are written. Output is staged in a byte buffer and written with a
//! single flush per frame.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{FrameBuffer, GlyphStyle, Rgb};

/// A run of changed glyphs on one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub x: u16,
    pub y: u16,
    pub len: u16,
}

pub struct TerminalRenderer<W: Write = io::Stdout> {
    out: W,
    /// Last presented frame; `None` forces a full redraw.
    previous: Option<FrameBuffer>,
    staging: Vec<u8>,
}

impl TerminalRenderer<io::Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for TerminalRenderer<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            previous: None,
            staging: Vec::with_capacity(64 * 1024),
        }
    }

    /// Switch to raw mode on the alternate screen.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.staging.clear();
        self.staging.queue(terminal::EnterAlternateScreen)?;
        self.staging.queue(cursor::Hide)?;
        self.staging.queue(terminal::DisableLineWrap)?;
        self.flush_staging()
    }

    /// Restore the terminal to its normal state.
    pub fn exit(&mut self) -> Result<()> {
        self.staging.clear();
        self.staging.queue(ResetColor)?;
        self.staging.queue(SetAttribute(Attribute::Reset))?;
        self.staging.queue(terminal::EnableLineWrap)?;
        self.staging.queue(cursor::Show)?;
        self.staging.queue(terminal::LeaveAlternateScreen)?;
        self.flush_staging()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Forget the previous frame (e.g. after a resize).
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    /// Present `frame`, then hand the previous frame back through `frame`.
    ///
    /// The caller keeps redrawing into the same buffer and no frame is ever
    /// cloned.
    pub fn present(&mut self, frame: &mut FrameBuffer) -> Result<()> {
        self.staging.clear();
        match self.previous.take() {
            Some(mut previous)
                if previous.width() == frame.width() && previous.height() == frame.height() =>
            {
                encode_diff_into(&previous, frame, &mut self.staging)?;
                std::mem::swap(&mut previous, frame);
                self.previous = Some(previous);
            }
            _ => {
                encode_full_into(frame, &mut self.staging)?;
                self.previous = Some(frame.clone());
            }
        }
        self.flush_staging()
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    fn flush_staging(&mut self) -> Result<()> {
        self.out.write_all(&self.staging)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Encode a full-frame redraw into `out`.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let mut pen = Pen::default();
    for y in 0..fb.height() {
        out.queue(cursor::MoveTo(0, y))?;
        pen.print_span(fb, Span { x: 0, y, len: fb.width() }, out)?;
    }
    pen.finish(out)
}

/// Encode only the spans that differ between `prev` and `next`.
///
/// Both buffers must have the same dimensions.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let mut pen = Pen::default();
    for_each_changed_span(prev, next, |span| {
        out.queue(cursor::MoveTo(span.x, span.y))?;
        pen.print_span(next, span, out)
    })?;
    pen.finish(out)
}

/// Call `f` for every maximal run of glyphs that differ, row by row.
///
/// Spans are handed out as they are found; nothing is buffered.
pub fn for_each_changed_span<F>(prev: &FrameBuffer, next: &FrameBuffer, mut f: F) -> Result<()>
where
    F: FnMut(Span) -> Result<()>,
{
    for y in 0..next.height() {
        let mut start: Option<u16> = None;
        for x in 0..next.width() {
            let dirty = prev.get(x, y) != next.get(x, y);
            match (dirty, start) {
                (true, None) => start = Some(x),
                (false, Some(s)) => {
                    f(Span { x: s, y, len: x - s })?;
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            f(Span {
                x: s,
                y,
                len: next.width() - s,
            })?;
        }
    }
    Ok(())
}

/// Tracks the active style so attributes are only emitted on change.
#[derive(Default)]
struct Pen {
    style: Option<GlyphStyle>,
}

impl Pen {
    fn print_span(&mut self, fb: &FrameBuffer, span: Span, out: &mut Vec<u8>) -> Result<()> {
        for x in span.x..span.x + span.len {
            let glyph = fb.get(x, span.y).unwrap_or_default();
            if self.style != Some(glyph.style) {
                apply_style(out, glyph.style)?;
                self.style = Some(glyph.style);
            }
            out.queue(Print(glyph.ch))?;
        }
        Ok(())
    }

    fn finish(self, out: &mut Vec<u8>) -> Result<()> {
        out.queue(ResetColor)?;
        out.queue(SetAttribute(Attribute::Reset))?;
        Ok(())
    }
}

fn apply_style(out: &mut Vec<u8>, style: GlyphStyle) -> Result<()> {
    out.queue(SetAttribute(Attribute::Reset))?;
    out.queue(SetForegroundColor(rgb_to_color(style.fg)))?;
    out.queue(SetBackgroundColor(rgb_to_color(style.bg)))?;
    if style.bold {
        out.queue(SetAttribute(Attribute::Bold))?;
    }
    if style.dim {
        out.queue(SetAttribute(Attribute::Dim))?;
    }
    Ok(())
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}
