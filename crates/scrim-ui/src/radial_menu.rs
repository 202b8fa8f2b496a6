//! A ring of entries chosen by direction rather than by stepping.

use std::f64::consts::TAU;
use std::time::Duration;

use scrim_core::{ContentError, Font, InputState, PlayerIndex, Vec2};

use crate::menu_entry::{MenuEntry, MenuSelection};
use crate::menu_screen::CancelHandler;
use crate::screen::{DrawContext, LoadContext, Screen, ScreenContext, ScreenCore};

/// Index of the sector `direction` points into, for a ring of `count`
/// entries whose first entry sits at angle `offset` (radians, clockwise on
/// screen from the +X axis). `direction` uses the thumbstick convention:
/// Y points up. Returns `None` for a zero vector or an empty ring.
pub fn sector(direction: Vec2, count: usize, offset: f32) -> Option<usize> {
    if count == 0 || direction.length_squared() == 0.0 {
        return None;
    }
    let theta = TAU / count as f64;
    let angle = f64::atan2(-direction.y as f64, direction.x as f64) + theta / 2.0 + TAU
        - offset as f64;
    let index = (angle / theta).floor() as i64;
    Some(index.rem_euclid(count as i64) as usize)
}

/// A menu laid out on a circle around `center`.
///
/// Pushing the left thumbstick, or moving the pointer, selects the entry in
/// that direction. With no controlling player every player's stick is read
/// and player one takes precedence.
pub struct RadialMenuScreen {
    core: ScreenCore,
    title: MenuEntry,
    title_position: Vec2,
    center: Vec2,
    radius: f32,
    offset: f32,
    entries: Vec<MenuEntry>,
    selected: usize,
    font: Option<Font>,
    on_cancel: Option<CancelHandler>,
}

impl RadialMenuScreen {
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_geometry(title, 100.0, 0.0)
    }

    /// A radial menu with the given ring radius and angle of the first
    /// entry.
    pub fn with_geometry(title: impl Into<String>, radius: f32, offset: f32) -> Self {
        Self {
            core: ScreenCore::new(),
            title: MenuEntry::label(title),
            title_position: Vec2::ZERO,
            center: Vec2::ZERO,
            radius,
            offset,
            entries: Vec::new(),
            selected: 0,
            font: None,
            on_cancel: None,
        }
    }

    pub fn with_center(mut self, center: Vec2) -> Self {
        self.center = center;
        self
    }

    pub fn with_title_position(mut self, position: Vec2) -> Self {
        self.title_position = position;
        self
    }

    pub fn with_core(mut self, core: ScreenCore) -> Self {
        self.core = core;
        self
    }

    pub fn on_cancel<F>(mut self, handler: F) -> Self
    where
        F: FnMut(PlayerIndex, &mut ScreenContext<'_>) + 'static,
    {
        self.on_cancel = Some(Box::new(handler));
        self
    }

    pub fn add_entry(&mut self, entry: MenuEntry) -> &mut MenuEntry {
        self.entries.push(entry);
        let last = self.entries.len() - 1;
        &mut self.entries[last]
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    fn point(&mut self, direction: Vec2) {
        if let Some(i) = sector(direction, self.entries.len(), self.offset) {
            self.selected = i;
        }
    }

    fn fire(&mut self, player: PlayerIndex, cx: &mut ScreenContext<'_>) {
        let screen = cx.id();
        let row = self.selected;
        if let Some(entry) = self.entries.get_mut(row) {
            if entry.is_enabled() {
                let selection = MenuSelection {
                    player,
                    screen,
                    column: 0,
                    row,
                    text: entry.text().to_string(),
                };
                entry.fire_selected(&selection, cx);
            }
        }
    }
}

impl Screen for RadialMenuScreen {
    fn core(&self) -> &ScreenCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ScreenCore {
        &mut self.core
    }

    fn name(&self) -> &str {
        self.title.text()
    }

    fn load_content(&mut self, cx: &mut LoadContext<'_>) -> Result<(), ContentError> {
        self.font.get_or_insert(cx.resources.font);
        Ok(())
    }

    fn handle_input(&mut self, cx: &mut ScreenContext<'_>, input: &InputState) {
        let players = &input.current().players;
        match self.core.controlling_player() {
            Some(p) => self.point(players[p.index()].left_thumbstick),
            None => {
                for p in PlayerIndex::ALL.into_iter().rev() {
                    self.point(players[p.index()].left_thumbstick);
                }
            }
        }

        if input.is_pointer_moved() {
            if let Some(pointer) = input.pointer() {
                let d = pointer.position - self.center;
                self.point(Vec2::new(d.x, -d.y));
            }
        }

        let player = self.core.controlling_player();
        if let Some(p) = input.is_menu_select(player) {
            self.fire(p, cx);
        } else if let Some(p) = input.is_menu_cancel(player) {
            match &mut self.on_cancel {
                Some(handler) => handler(p, cx),
                None => cx.exit(),
            }
        }
    }

    fn draw(&mut self, cx: &mut DrawContext<'_>) {
        let font = self.font.unwrap_or(cx.resources().font);
        let alpha = self.core.transition_alpha();
        let active = self.core.is_active();
        let mut batch = cx.batch();

        if !self.title.text().is_empty() {
            let size = self.title.measure(&*batch, font);
            self.title.place(self.title_position, size);
            self.title.draw(&mut *batch, font, Vec2::ZERO, false, alpha);
        }

        if self.entries.is_empty() {
            return;
        }
        let theta = std::f32::consts::TAU / self.entries.len() as f32;
        let mut angle = self.offset;
        for (i, entry) in self.entries.iter_mut().enumerate() {
            let position = self.center + Vec2::new(angle.cos(), angle.sin()) * self.radius;
            let size = entry.measure(&*batch, font);
            entry.place(position, size);
            entry.draw(&mut *batch, font, Vec2::ZERO, active && i == self.selected, alpha);
            angle += theta;
        }
    }

    fn update(
        &mut self,
        _cx: &mut ScreenContext<'_>,
        elapsed: Duration,
        other_screen_has_focus: bool,
        covered_by_other_screen: bool,
    ) {
        self.core
            .update(elapsed, other_screen_has_focus, covered_by_other_screen);
        if self.selected >= self.entries.len() {
            self.selected = 0;
        }
    }
}
