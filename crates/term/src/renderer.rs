//! TerminalRenderer: flushes a framebuffer to a real terminal.
//!
//! Frames are diffed against the previous one and only changed runs are
//! written. A size change forces a full redraw.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};

pub struct TerminalRenderer {
    stdout: io::Stdout,
    last: Option<FrameBuffer>,
    buf: Vec<u8>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            last: None,
            buf: Vec::with_capacity(64 * 1024),
        }
    }

    /// Raw mode, alternate screen and mouse reporting.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(EnableMouseCapture)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()?;
        log::debug!("terminal entered");
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(DisableMouseCapture)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        log::debug!("terminal restored");
        Ok(())
    }

    /// Force the next draw to be a full redraw.
    ///
    /// Useful on terminal resize events.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    /// Draw a framebuffer, swapping it into internal state.
    ///
    /// Callers should keep one `FrameBuffer` and pass it in every frame.
    /// The renderer diffs against the previous frame and then swaps buffers
    /// so the caller can reuse the old one without cloning.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        self.buf.clear();
        let mut prev = match self.last.take() {
            Some(prev) if prev.width() == fb.width() && prev.height() == fb.height() => {
                let runs = encode_diff_into(&prev, fb, &mut self.buf)?;
                log::trace!("diff frame: {runs} runs, {} bytes", self.buf.len());
                prev
            }
            other => {
                encode_full_into(fb, &mut self.buf)?;
                let mut prev = other.unwrap_or_else(|| FrameBuffer::new(fb.width(), fb.height()));
                prev.resize(fb.width(), fb.height());
                prev
            }
        };
        self.flush_buf()?;

        // Swap current into prev so next frame can diff without cloning.
        std::mem::swap(&mut prev, fb);
        self.last = Some(prev);
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Changed runs separated by at most this many unchanged cells are merged.
const RUN_MERGE_GAP: u16 = 4;

/// Writes glyphs while tracking the terminal's current style, so only the
/// parts of a style that changed are emitted.
struct Painter<'a> {
    out: &'a mut Vec<u8>,
    style: Option<CellStyle>,
}

impl<'a> Painter<'a> {
    fn new(out: &'a mut Vec<u8>) -> Self {
        Self { out, style: None }
    }

    fn cell(&mut self, cell: Cell) -> Result<()> {
        self.set_style(cell.style)?;
        self.out.queue(Print(cell.ch))?;
        Ok(())
    }

    fn set_style(&mut self, next: CellStyle) -> Result<()> {
        let prev = match self.style {
            Some(prev) if prev == next => return Ok(()),
            // Attributes can only be cleared by a full reset, which also drops colors.
            Some(prev) if prev.bold == next.bold && prev.dim == next.dim => prev,
            _ => {
                self.out.queue(SetAttribute(Attribute::Reset))?;
                if next.bold {
                    self.out.queue(SetAttribute(Attribute::Bold))?;
                }
                if next.dim {
                    self.out.queue(SetAttribute(Attribute::Dim))?;
                }
                self.out.queue(SetForegroundColor(rgb_to_color(next.fg)))?;
                self.out.queue(SetBackgroundColor(rgb_to_color(next.bg)))?;
                self.style = Some(next);
                return Ok(());
            }
        };

        if prev.fg != next.fg {
            self.out.queue(SetForegroundColor(rgb_to_color(next.fg)))?;
        }
        if prev.bg != next.bg {
            self.out.queue(SetBackgroundColor(rgb_to_color(next.bg)))?;
        }
        self.style = Some(next);
        Ok(())
    }

    fn finish(self) -> Result<()> {
        self.out.queue(ResetColor)?;
        self.out.queue(SetAttribute(Attribute::Reset))?;
        Ok(())
    }
}

/// Encode a full-frame redraw into `out` without touching stdout.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let mut painter = Painter::new(out);
    for y in 0..fb.height() {
        painter.out.queue(cursor::MoveTo(0, y))?;
        for x in 0..fb.width() {
            painter.cell(fb.get(x, y).unwrap_or_default())?;
        }
    }
    painter.finish()
}

/// Encode only the cells that differ from `prev` into `out`.
///
/// Returns the number of cursor jumps (runs) written.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<u32> {
    let mut painter = Painter::new(out);
    let mut runs = 0;

    for_each_changed_run(prev, next, RUN_MERGE_GAP, |x, y, len| {
        runs += 1;
        painter.out.queue(cursor::MoveTo(x, y))?;
        for dx in 0..len {
            painter.cell(next.get(x + dx, y).unwrap_or_default())?;
        }
        Ok(())
    })?;

    painter.finish()?;
    Ok(runs)
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Call `f(x, y, len)` for each horizontal run of changed cells.
///
/// Runs on the same row at most `merge_gap` unchanged cells apart are
/// reported as one. A size mismatch reports every row in full.
fn for_each_changed_run(
    prev: &FrameBuffer,
    next: &FrameBuffer,
    merge_gap: u16,
    mut f: impl FnMut(u16, u16, u16) -> Result<()>,
) -> Result<()> {
    if prev.width() != next.width() || prev.height() != next.height() {
        for y in 0..next.height() {
            f(0, y, next.width())?;
        }
        return Ok(());
    }

    let w = next.width();
    for y in 0..next.height() {
        let changed = |x: u16| prev.get(x, y) != next.get(x, y);
        let mut open: Option<(u16, u16)> = None;

        for x in (0..w).filter(|&x| changed(x)) {
            open = match open {
                Some((start, end)) if x - end <= merge_gap => Some((start, x + 1)),
                Some((start, end)) => {
                    f(start, y, end - start)?;
                    Some((x, x + 1))
                }
                None => Some((x, x + 1)),
            };
        }
        if let Some((start, end)) = open {
            f(start, y, end - start)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runs(a: &FrameBuffer, b: &FrameBuffer, gap: u16) -> Vec<(u16, u16, u16)> {
        let mut runs = Vec::new();
        for_each_changed_run(a, b, gap, |x, y, len| {
            runs.push((x, y, len));
            Ok(())
        })
        .unwrap();
        runs
    }

    #[test]
    fn changed_runs_coalesce_adjacent_cells() {
        let style = CellStyle::default();
        let a = FrameBuffer::new(12, 2);
        let mut b = FrameBuffer::new(12, 2);

        for x in 1..=3 {
            b.set(x, 0, Cell { ch: 'X', style });
        }
        b.set(11, 0, Cell { ch: 'Z', style });
        b.set(5, 1, Cell { ch: 'Y', style });

        assert_eq!(runs(&a, &b, 0), vec![(1, 0, 3), (11, 0, 1), (5, 1, 1)]);
    }

    #[test]
    fn short_gaps_are_bridged() {
        let style = CellStyle::default();
        let a = FrameBuffer::new(12, 1);
        let mut b = FrameBuffer::new(12, 1);
        b.set(1, 0, Cell { ch: 'X', style });
        b.set(4, 0, Cell { ch: 'X', style });
        b.set(11, 0, Cell { ch: 'X', style });

        // 1 and 4 are two unchanged cells apart; 11 is six past 4.
        assert_eq!(runs(&a, &b, RUN_MERGE_GAP), vec![(1, 0, 4), (11, 0, 1)]);
    }

    #[test]
    fn size_change_repaints_every_row() {
        let a = FrameBuffer::new(4, 2);
        let b = FrameBuffer::new(6, 3);
        assert_eq!(runs(&a, &b, 0), vec![(0, 0, 6), (0, 1, 6), (0, 2, 6)]);
    }

    #[test]
    fn identical_frames_encode_no_glyphs() {
        let a = FrameBuffer::new(4, 2);
        let mut out = Vec::new();
        assert_eq!(encode_diff_into(&a, &a.clone(), &mut out).unwrap(), 0);

        let mut full = Vec::new();
        encode_full_into(&a, &mut full).unwrap();
        assert!(out.len() < full.len());
        assert!(!String::from_utf8_lossy(&out).contains(' '));
    }

    #[test]
    fn colour_only_change_skips_attribute_reset() {
        let base = CellStyle::new(Rgb::new(1, 1, 1), Rgb::new(9, 9, 9));
        let recoloured = CellStyle {
            fg: Rgb::new(2, 2, 2),
            ..base
        };

        let mut out = Vec::new();
        let mut painter = Painter::new(&mut out);
        painter.set_style(base).unwrap();
        let after_first = painter.out.len();
        painter.set_style(recoloured).unwrap();
        let delta = String::from_utf8_lossy(&out[after_first..]).into_owned();

        // Only a foreground sequence: no reset (0m) and no background (48;2).
        assert!(delta.contains("38;2;2;2;2"), "delta: {delta:?}");
        assert!(!delta.contains("48;2"), "delta: {delta:?}");
        assert!(!delta.contains("[0m"), "delta: {delta:?}");
    }

    #[test]
    fn style_conversion_is_truecolor() {
        assert_eq!(
            rgb_to_color(Rgb::new(1, 2, 3)),
            Color::Rgb { r: 1, g: 2, b: 3 }
        );
    }
}
