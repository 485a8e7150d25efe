use ratatui::buffer::Buffer;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Widget};

pub use ratatui::layout::Rect;

use super::style::Style;

/// Drawing surface for one frame, speaking our `Style`/`Color`.
pub struct RenderBuf<'a> {
    buf: &'a mut Buffer,
}

impl<'a> RenderBuf<'a> {
    pub fn new(buf: &'a mut Buffer) -> Self {
        Self { buf }
    }

    fn put(&mut self, x: u16, y: u16, ch: char, style: ratatui::style::Style) {
        if let Some(cell) = self.buf.cell_mut((x, y)) {
            cell.set_char(ch).set_style(style);
        }
    }

    /// Text at (x, y), clipped at the buffer edge.
    pub fn draw_str(&mut self, x: u16, y: u16, text: &str, style: Style) {
        let style = style.into();
        for (ch, col) in text.chars().zip(x..) {
            self.put(col, y, ch, style);
        }
    }

    /// Blank every cell of `area` in `style`.
    pub fn fill(&mut self, area: Rect, style: Style) {
        let style = style.into();
        for row in area.top()..area.bottom() {
            for col in area.left()..area.right() {
                self.put(col, row, ' ', style);
            }
        }
    }

    /// Bordered frame with a bold title; returns the space inside.
    pub fn draw_block(&mut self, area: Rect, title: &str, border: Style) -> Rect {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(border)
            .title_style(border.bold());
        let inner = block.inner(area);
        block.render(area, self.buf);
        inner
    }

    /// One line of differently styled segments, truncated to `area`.
    pub fn draw_line(&mut self, area: Rect, spans: &[(&str, Style)]) {
        let line: Line = spans
            .iter()
            .map(|&(text, style)| Span::styled(text, style))
            .collect();
        line.render(area, self.buf);
    }
}
