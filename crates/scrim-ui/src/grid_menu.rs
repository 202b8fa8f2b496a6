//! Multi-column directional menu navigation.
//!
//! A [`GridMenu`] holds one or more columns of [`MenuEntry`] values and a
//! cursor. Directional input moves the cursor along rows (wrapping, skipping
//! disabled entries) or across columns, either keeping the row index
//! ([`ColumnMode::Absolute`]) or jumping to the on-screen nearest entry
//! ([`ColumnMode::Relative`]). Every search is bounded: a column with no
//! enabled entry yields "no selection" instead of spinning.

use scrim_core::{Font, PlayerIndex, Renderer, TextMeasure, Vec2};

use crate::error::{Result, ScreenError};
use crate::menu_entry::{MenuEntry, MenuSelection};
use crate::screen::ScreenContext;

/// Axis along which the entries of a column are stacked.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

/// How the cursor picks a row when it changes column.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColumnMode {
    /// Keep the row index, clamped to the new column's length.
    #[default]
    Absolute,
    /// Pick the enabled entry nearest on screen along the stacking axis.
    Relative,
}

/// A cursor position.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Selection {
    pub column: usize,
    pub row: usize,
}

impl Selection {
    pub const fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }
}

/// Columns of entries plus a cursor.
#[derive(Debug)]
pub struct GridMenu {
    columns: Vec<Vec<MenuEntry>>,
    anchors: Vec<Vec2>,
    cursor: Option<Selection>,
    orientation: Orientation,
    mode: ColumnMode,
    allow_empty_selection: bool,
    layout_font: Option<Font>,
    layout_valid: bool,
}

impl GridMenu {
    /// Create a menu with `columns` empty columns.
    pub fn new(columns: usize, orientation: Orientation) -> Result<Self> {
        if columns == 0 {
            return Err(ScreenError::NoColumns);
        }
        Ok(Self::build(columns, orientation))
    }

    /// Create a single-column menu.
    pub fn single(orientation: Orientation) -> Self {
        Self::build(1, orientation)
    }

    fn build(columns: usize, orientation: Orientation) -> Self {
        Self {
            columns: (0..columns).map(|_| Vec::new()).collect(),
            anchors: vec![Vec2::ZERO; columns],
            cursor: None,
            orientation,
            mode: ColumnMode::Absolute,
            allow_empty_selection: false,
            layout_font: None,
            layout_valid: false,
        }
    }

    /// Set the column strategy (builder).
    pub fn with_mode(mut self, mode: ColumnMode) -> Self {
        self.mode = mode;
        self
    }

    /// Let pointer movement clear the cursor when it hovers nothing
    /// (builder).
    pub fn with_empty_selection(mut self, allow: bool) -> Self {
        self.allow_empty_selection = allow;
        self
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
        self.layout_valid = false;
    }

    pub fn mode(&self) -> ColumnMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ColumnMode) {
        self.mode = mode;
    }

    pub fn allows_empty_selection(&self) -> bool {
        self.allow_empty_selection
    }

    pub fn set_allow_empty_selection(&mut self, allow: bool) {
        self.allow_empty_selection = allow;
    }

    // -----------------------------------------------------------------------
    // Contents
    // -----------------------------------------------------------------------

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Entries of `column`, or `None` if the index is out of range.
    pub fn column(&self, column: usize) -> Option<&[MenuEntry]> {
        self.columns.get(column).map(Vec::as_slice)
    }

    pub fn entry(&self, sel: Selection) -> Option<&MenuEntry> {
        self.columns.get(sel.column)?.get(sel.row)
    }

    /// Mutable access to an entry. Marks the layout dirty, since text or
    /// scale may change.
    pub fn entry_mut(&mut self, sel: Selection) -> Option<&mut MenuEntry> {
        self.layout_valid = false;
        self.columns.get_mut(sel.column)?.get_mut(sel.row)
    }

    /// Append an entry to `column`.
    pub fn add_entry(&mut self, column: usize, entry: MenuEntry) -> Result<&mut MenuEntry> {
        let count = self.columns.len();
        let col = self
            .columns
            .get_mut(column)
            .ok_or(ScreenError::InvalidColumn { column, count })?;
        self.layout_valid = false;
        col.push(entry);
        let row = col.len() - 1;
        Ok(&mut col[row])
    }

    /// All entries in column-major order with their positions.
    pub fn iter(&self) -> impl Iterator<Item = (Selection, &MenuEntry)> {
        self.columns.iter().enumerate().flat_map(|(c, col)| {
            col.iter()
                .enumerate()
                .map(move |(r, e)| (Selection::new(c, r), e))
        })
    }

    /// Position of the first entry of `column`.
    pub fn anchor(&self, column: usize) -> Option<Vec2> {
        self.anchors.get(column).copied()
    }

    pub fn set_anchor(&mut self, column: usize, position: Vec2) -> Result<()> {
        let count = self.anchors.len();
        let anchor = self
            .anchors
            .get_mut(column)
            .ok_or(ScreenError::InvalidColumn { column, count })?;
        *anchor = position;
        self.layout_valid = false;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Cursor
    // -----------------------------------------------------------------------

    pub fn cursor(&self) -> Option<Selection> {
        self.cursor
    }

    /// The entry under the cursor.
    pub fn selected(&self) -> Option<&MenuEntry> {
        self.cursor.and_then(|sel| self.entry(sel))
    }

    /// Move the cursor to `sel`, which must name an enabled entry.
    pub fn set_cursor(&mut self, sel: Selection) -> Result<()> {
        self.check_selectable(sel)?;
        self.cursor = Some(sel);
        Ok(())
    }

    pub fn clear_cursor(&mut self) {
        self.cursor = None;
    }

    /// Put the cursor on the first enabled entry, column by column.
    pub fn select_first(&mut self) -> Option<Selection> {
        let first = self
            .iter()
            .find(|(_, e)| e.is_enabled())
            .map(|(sel, _)| sel);
        self.cursor = first;
        if first.is_none() {
            log::warn!("menu has no enabled entry");
        }
        self.cursor
    }

    fn check_selectable(&self, sel: Selection) -> Result<()> {
        let count = self.columns.len();
        let col = self.columns.get(sel.column).ok_or(ScreenError::InvalidColumn {
            column: sel.column,
            count,
        })?;
        let entry = col.get(sel.row).ok_or(ScreenError::InvalidRow {
            column: sel.column,
            row: sel.row,
            len: col.len(),
        })?;
        if !entry.is_enabled() {
            return Err(ScreenError::DisabledEntry {
                column: sel.column,
                row: sel.row,
            });
        }
        Ok(())
    }

    fn is_enabled(&self, column: usize, row: usize) -> bool {
        self.columns[column].get(row).is_some_and(MenuEntry::is_enabled)
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Apply one frame of directional input. `vertical` is the up/down
    /// delta, `horizontal` the left/right delta; a horizontal menu swaps
    /// them. Rows move before columns.
    pub fn navigate(&mut self, vertical: i32, horizontal: i32) -> Option<Selection> {
        let (rows, cols) = match self.orientation {
            Orientation::Vertical => (vertical, horizontal),
            Orientation::Horizontal => (horizontal, vertical),
        };
        if rows != 0 {
            self.move_row(rows.signum());
        }
        if cols != 0 {
            self.move_column(cols.signum());
        }
        self.cursor
    }

    /// Step the cursor `delta` rows within its column, wrapping and
    /// skipping disabled entries.
    ///
    /// Without a cursor the search starts in column 0 just outside the
    /// column, so `+1` lands on the first enabled row and `-1` on the last.
    pub fn move_row(&mut self, delta: i32) -> Option<Selection> {
        let (column, start) = match self.cursor {
            Some(sel) => (sel.column, sel.row as isize),
            None => {
                let len = self.columns[0].len() as isize;
                (0, if delta < 0 { len } else { -1 })
            }
        };
        self.cursor = self
            .next_enabled_row(column, start, delta as isize)
            .map(|row| Selection::new(column, row));
        if self.cursor.is_none() {
            log::warn!("column {column} has no enabled entry");
        }
        self.cursor
    }

    /// First enabled row reached from `start` by repeated `delta` steps.
    fn next_enabled_row(&self, column: usize, start: isize, delta: isize) -> Option<usize> {
        let len = self.columns[column].len() as isize;
        (1..=len)
            .map(|step| (start + delta * step).rem_euclid(len) as usize)
            .find(|&row| self.is_enabled(column, row))
    }

    /// Step the cursor `delta` columns, picking the row according to the
    /// column mode. Without a cursor, selects the first enabled entry.
    pub fn move_column(&mut self, delta: i32) -> Option<Selection> {
        let Some(from) = self.cursor else {
            return self.select_first();
        };
        let found = match self.mode {
            ColumnMode::Absolute => self.find_column_absolute(from, delta as isize),
            ColumnMode::Relative => self.find_column_relative(from, delta as isize),
        };
        if found.is_none() {
            log::warn!("no column reachable from {from:?} has an enabled entry");
        }
        self.cursor = found;
        self.cursor
    }

    /// The row carries over from column to column, clamped to each
    /// non-empty column it passes through, so a short column shortens the
    /// row for the rest of the search.
    fn find_column_absolute(&self, from: Selection, delta: isize) -> Option<Selection> {
        let count = self.columns.len() as isize;
        let mut row = from.row;
        for step in 1..=count {
            let column = (from.column as isize + delta * step).rem_euclid(count) as usize;
            let len = self.columns[column].len();
            if len == 0 {
                continue;
            }
            row = row.min(len - 1);
            if self.is_enabled(column, row) {
                return Some(Selection::new(column, row));
            }
        }
        None
    }

    fn find_column_relative(&self, from: Selection, delta: isize) -> Option<Selection> {
        let origin = self.axis(self.entry(from)?.position());
        let count = self.columns.len() as isize;
        for step in 1..=count {
            let column = (from.column as isize + delta * step).rem_euclid(count) as usize;
            let mut best: Option<(usize, f32)> = None;
            for (row, entry) in self.columns[column].iter().enumerate() {
                if !entry.is_enabled() {
                    continue;
                }
                let dist = (self.axis(entry.position()) - origin).abs();
                if dist == 0.0 {
                    return Some(Selection::new(column, row));
                }
                if best.is_none_or(|(_, d)| dist < d) {
                    best = Some((row, dist));
                }
            }
            if let Some((row, _)) = best {
                return Some(Selection::new(column, row));
            }
        }
        None
    }

    /// Coordinate along the stacking axis.
    fn axis(&self, p: Vec2) -> f32 {
        match self.orientation {
            Orientation::Vertical => p.y,
            Orientation::Horizontal => p.x,
        }
    }

    // -----------------------------------------------------------------------
    // Pointer
    // -----------------------------------------------------------------------

    /// First visible, enabled entry whose bounds contain `p`.
    pub fn hit_test(&self, p: Vec2) -> Option<Selection> {
        self.iter()
            .find(|(_, e)| e.is_visible() && e.is_enabled() && e.contains(p))
            .map(|(sel, _)| sel)
    }

    /// Move the cursor to the entry under the pointer. When nothing is hit
    /// the cursor is cleared if empty selection is allowed and kept
    /// otherwise. Returns the hit entry.
    pub fn pointer_at(&mut self, p: Vec2) -> Option<Selection> {
        let hit = self.hit_test(p);
        if hit.is_some() || self.allow_empty_selection {
            self.cursor = hit;
        }
        hit
    }

    // -----------------------------------------------------------------------
    // Selection events
    // -----------------------------------------------------------------------

    /// Run the handlers of the entry at `sel` on behalf of `player`.
    /// Returns `false` when there is no enabled entry there.
    pub fn fire(&mut self, sel: Selection, player: PlayerIndex, cx: &mut ScreenContext<'_>) -> bool {
        let screen = cx.id();
        let Some(entry) = self
            .columns
            .get_mut(sel.column)
            .and_then(|col| col.get_mut(sel.row))
        else {
            return false;
        };
        if !entry.is_enabled() {
            return false;
        }
        let selection = MenuSelection {
            player,
            screen,
            column: sel.column,
            row: sel.row,
            text: entry.text().to_string(),
        };
        entry.fire_selected(&selection, cx);
        true
    }

    // -----------------------------------------------------------------------
    // Layout and drawing
    // -----------------------------------------------------------------------

    pub fn is_layout_valid(&self) -> bool {
        self.layout_valid
    }

    /// Force a layout pass before the next draw.
    pub fn invalidate(&mut self) {
        self.layout_valid = false;
    }

    /// Stack each column's entries from its anchor, each advanced by the
    /// previous entry's size plus padding.
    pub fn layout<M: TextMeasure + ?Sized>(&mut self, measure: &M, font: Font) {
        let orientation = self.orientation;
        for (col, anchor) in self.columns.iter_mut().zip(&self.anchors) {
            let mut position = *anchor;
            for entry in col.iter_mut() {
                let size = entry.measure(measure, font);
                entry.place(position, size);
                match orientation {
                    Orientation::Vertical => position.y += size.y + entry.padding(),
                    Orientation::Horizontal => position.x += size.x + entry.padding(),
                }
            }
        }
        self.layout_font = Some(font);
        self.layout_valid = true;
    }

    /// Lay out again if the layout is dirty or the font changed.
    pub fn ensure_layout<M: TextMeasure + ?Sized>(&mut self, measure: &M, font: Font) {
        if !self.layout_valid || self.layout_font != Some(font) {
            self.layout(measure, font);
        }
    }

    /// Draw every entry shifted by `offset`. The cursor entry is
    /// highlighted only when `active`.
    pub fn draw(
        &mut self,
        renderer: &mut dyn Renderer,
        font: Font,
        offset: Vec2,
        active: bool,
        alpha: u8,
    ) {
        self.ensure_layout(&*renderer, font);
        let cursor = if active { self.cursor } else { None };
        for (sel, entry) in self.iter() {
            entry.draw(renderer, font, offset, cursor == Some(sel), alpha);
        }
    }
}
