use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::Style,
    widgets::Widget,
};

/// A block of text lines drawn at an arbitrary, possibly negative, cell
/// position relative to the render area, clipped to that area. Whitespace
/// can be treated as transparent so layered sprites only overwrite cells
/// where they have ink.
#[derive(Debug)]
pub struct Sprite {
    lines: Vec<String>,
    x: i32,
    y: i32,
    style: Option<Style>,
    transparent_whitespace: bool,
}

impl Sprite {
    pub fn new(text: &str, x: i32, y: i32) -> Self {
        let lines = text.lines().filter(|line| !line.is_empty()).map(str::to_string).collect();
        Self::from_lines(lines, x, y)
    }

    pub fn from_lines(lines: Vec<String>, x: i32, y: i32) -> Self {
        Sprite { lines, x, y, style: None, transparent_whitespace: false }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }

    pub fn transparent_whitespace(mut self, transparent: bool) -> Self {
        self.transparent_whitespace = transparent;
        self
    }
}

impl Widget for Sprite {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (row, line) in self.lines.iter().enumerate() {
            let row_y = self.y + row as i32;
            if row_y < 0 || row_y >= area.height as i32 {
                continue;
            }
            for (col, ch) in line.chars().enumerate() {
                let col_x = self.x + col as i32;
                if col_x < 0 || col_x >= area.width as i32 {
                    continue;
                }
                if self.transparent_whitespace && ch.is_whitespace() {
                    continue;
                }
                let position = Position::new(area.x + col_x as u16, area.y + row_y as u16);
                if let Some(cell) = buf.cell_mut(position) {
                    cell.set_char(ch);
                    if let Some(style) = self.style {
                        cell.set_style(style);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn symbols(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf.cell(Position::new(x, y)).unwrap().symbol()).collect()
    }

    #[test]
    fn test_render_in_bounds() {
        let area = Rect::new(0, 0, 6, 3);
        let mut buf = Buffer::empty(area);
        Sprite::new("ab\ncd", 1, 1).render(area, &mut buf);

        assert_eq!(symbols(&buf, 0), "      ");
        assert_eq!(symbols(&buf, 1), " ab   ");
        assert_eq!(symbols(&buf, 2), " cd   ");
    }

    #[test]
    fn test_clips_at_every_edge() {
        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);
        Sprite::new("xxx\nyyy\nzzz", -1, -1).render(area, &mut buf);

        assert_eq!(symbols(&buf, 0), "yy  ");
        assert_eq!(symbols(&buf, 1), "zz  ");

        let mut buf = Buffer::empty(area);
        Sprite::new("xxx", 2, 0).render(area, &mut buf);
        assert_eq!(symbols(&buf, 0), "  xx");
    }

    #[test]
    fn test_transparent_whitespace_preserves_underlay() {
        let area = Rect::new(0, 0, 3, 1);
        let mut buf = Buffer::empty(area);
        Sprite::new("___", 0, 0).render(area, &mut buf);
        Sprite::new(" o ", 0, 0).transparent_whitespace(true).render(area, &mut buf);

        assert_eq!(symbols(&buf, 0), "_o_");
    }
}
