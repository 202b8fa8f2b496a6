//! The off-screen cell buffer primitives are composed into before a frame
//! is written to the terminal.

use scrim_core::{Color, Rect, Vec2};

/// One terminal cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::WHITE,
            bg: Color::BLACK,
        }
    }
}

/// Blend a premultiplied `src` over `dst`.
pub(crate) fn blend(dst: Color, src: Color) -> Color {
    let inv = 255 - src.a() as u16;
    let mix = |d: u8, s: u8| (s as u16 + (d as u16 * inv + 127) / 255).min(255) as u8;
    Color::from_rgb(
        mix(dst.r(), src.r()),
        mix(dst.g(), src.g()),
        mix(dst.b(), src.b()),
    )
}

/// A grid of cells, one unit per cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CellBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl CellBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// The whole buffer as a rectangle in cell units.
    pub fn viewport(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width as f32, self.height as f32)
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Cell> {
        self.index(x as i32, y as i32).map(|i| self.cells[i])
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let inside = (0..self.width as i32).contains(&x) && (0..self.height as i32).contains(&y);
        inside.then(|| y as usize * self.width as usize + x as usize)
    }

    /// Tint every cell whose centre lies in `rect`.
    pub fn fill(&mut self, rect: Rect, tint: Color) {
        let x0 = rect.min.x.round() as i32;
        let x1 = rect.max.x.round() as i32;
        let y0 = rect.min.y.round() as i32;
        let y1 = rect.max.y.round() as i32;
        for y in y0..y1 {
            for x in x0..x1 {
                if let Some(i) = self.index(x, y) {
                    let cell = &mut self.cells[i];
                    cell.bg = blend(cell.bg, tint);
                    cell.fg = blend(cell.fg, tint);
                }
            }
        }
    }

    /// Write `text` starting at the cell nearest `position`, clipped to the
    /// buffer.
    pub fn print(&mut self, position: Vec2, text: &str, tint: Color) {
        let x0 = position.x.round() as i32;
        let y = position.y.round() as i32;
        for (dx, ch) in text.chars().enumerate() {
            if let Some(i) = self.index(x0 + dx as i32, y) {
                let cell = &mut self.cells[i];
                cell.ch = ch;
                cell.fg = blend(cell.bg, tint);
            }
        }
    }

    /// Cells that differ from `other`, as `(x, y, cell)`. Every cell is
    /// reported when the sizes differ.
    pub fn diff<'a>(&'a self, other: &'a CellBuffer) -> impl Iterator<Item = (u16, u16, Cell)> + 'a {
        let full = self.width != other.width || self.height != other.height;
        let width = self.width.max(1) as usize;
        self.cells
            .iter()
            .enumerate()
            .filter(move |&(i, c)| full || other.cells[i] != *c)
            .map(move |(i, c)| ((i % width) as u16, (i / width) as u16, *c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_black_overlay_halves_colours() {
        let c = blend(Color::from_rgb(200, 100, 0), Color::BLACK.with_alpha(128));
        assert_eq!(c, Color::from_rgb(100, 50, 0));
        assert_eq!(blend(Color::BLACK, Color::WHITE), Color::WHITE);
        assert_eq!(blend(Color::CORAL, Color::TRANSPARENT), Color::CORAL);
    }

    #[test]
    fn print_clips_to_buffer() {
        let mut b = CellBuffer::new(4, 2);
        b.print(Vec2::new(2.0, 1.0), "abc", Color::YELLOW);
        assert_eq!(b.get(2, 1).map(|c| c.ch), Some('a'));
        assert_eq!(b.get(3, 1).map(|c| c.fg), Some(Color::YELLOW));
        assert_eq!(b.get(4, 1), None);
        b.print(Vec2::new(-1.0, 0.0), "xy", Color::WHITE);
        assert_eq!(b.get(0, 0).map(|c| c.ch), Some('y'));
    }

    #[test]
    fn fill_tints_covered_cells() {
        let mut b = CellBuffer::new(3, 3);
        b.fill(Rect::new(1.0, 1.0, 3.0, 2.0), Color::CORAL);
        assert_eq!(b.get(0, 1).map(|c| c.bg), Some(Color::BLACK));
        assert_eq!(b.get(1, 1).map(|c| c.bg), Some(Color::CORAL));
        assert_eq!(b.get(2, 1).map(|c| c.bg), Some(Color::CORAL));
        assert_eq!(b.get(1, 2).map(|c| c.bg), Some(Color::BLACK));
    }

    #[test]
    fn diff_reports_changes_only() {
        let shown = CellBuffer::new(3, 1);
        let mut next = shown.clone();
        next.print(Vec2::new(1.0, 0.0), "z", Color::WHITE);
        let changed: Vec<_> = next.diff(&shown).map(|(x, y, c)| (x, y, c.ch)).collect();
        assert_eq!(changed, vec![(1, 0, 'z')]);

        let empty = CellBuffer::default();
        assert_eq!(next.diff(&empty).count(), 3);
    }
}
