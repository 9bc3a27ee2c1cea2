use crate::state::config::Rgb;
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::widgets::{Block, BorderType, Borders, Widget};

/// Glyph cell of the panel's bitmap font, in pixels.
pub const FONT_WIDTH: u32 = 4;
pub const FONT_HEIGHT: u32 = 6;

/// Text grid that fits on a `width x height` pixel matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelGeometry {
    pub columns: usize,
    pub rows: usize,
}

impl PanelGeometry {
    pub fn for_pixels(width: u32, height: u32) -> Self {
        Self {
            columns: (width / FONT_WIDTH) as usize,
            rows: (height / FONT_HEIGHT) as usize,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelLine {
    pub text: String,
    pub color: Rgb,
}

impl PanelLine {
    pub fn new(text: impl Into<String>, color: Rgb) -> Self {
        Self { text: text.into(), color }
    }
}

/// One rendered frame: at most `geometry.rows` lines, each at most
/// `geometry.columns` characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayFrame {
    pub geometry: PanelGeometry,
    pub lines: Vec<PanelLine>,
}

impl DisplayFrame {
    pub fn new(geometry: PanelGeometry) -> Self {
        Self { geometry, lines: Vec::new() }
    }

    /// Append a line, truncated to fit. Lines past the last row are dropped.
    pub fn push(&mut self, text: &str, color: Rgb) {
        if self.lines.len() >= self.geometry.rows {
            return;
        }
        self.lines
            .push(PanelLine::new(truncate(text, self.geometry.columns), color));
    }

    pub fn is_full(&self) -> bool {
        self.lines.len() >= self.geometry.rows
    }

    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.text.as_str()).collect()
    }
}

/// Cut `text` to `max` characters, marking the cut with a trailing `.`.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_owned();
    }
    if max == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(max - 1).collect();
    out.push('.');
    out
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

/// Draws a [`DisplayFrame`] as a bordered character grid, one terminal cell
/// per font glyph, centered in the given area.
pub struct LedPanel<'a> {
    pub frame: &'a DisplayFrame,
    pub title: &'a str,
}

impl Widget for LedPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let columns = u16::try_from(self.frame.geometry.columns).unwrap_or(u16::MAX);
        let rows = u16::try_from(self.frame.geometry.rows).unwrap_or(u16::MAX);
        let width = columns.saturating_add(2).min(area.width);
        let height = rows.saturating_add(2).min(area.height);
        let panel = Rect::new(
            area.x + area.width.saturating_sub(width) / 2,
            area.y + area.height.saturating_sub(height) / 2,
            width,
            height,
        );

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(self.title);
        let inner = block.inner(panel);
        block.render(panel, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        for (row, line) in self.frame.lines.iter().enumerate() {
            let y = inner.y + row as u16;
            if y >= inner.y + inner.height {
                break;
            }
            buf.set_stringn(
                inner.x,
                y,
                &line.text,
                inner.width as usize,
                Style::default().fg(to_color(line.color)),
            );
        }
    }
}
