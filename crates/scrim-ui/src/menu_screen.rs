//! [`MenuScreen`]: a screen that hosts a [`GridMenu`], a title and an
//! optional pointer cursor.

use std::time::Duration;

use scrim_core::{
    Color, ContentError, ContentLoader, Destination, DrawParams, Font, Image, InputState,
    PlayerIndex, PointerButton, Vec2,
};

use crate::error::Result;
use crate::grid_menu::{ColumnMode, GridMenu, Orientation, Selection};
use crate::menu_entry::MenuEntry;
use crate::screen::{DrawContext, LoadContext, Screen, ScreenContext, ScreenCore, ScreenState};

/// Handler run when the menu is cancelled.
pub type CancelHandler = Box<dyn FnMut(PlayerIndex, &mut ScreenContext<'_>)>;

/// Horizontal slide distance while entering.
const SLIDE_ON: f32 = 256.0;
/// Horizontal slide distance while leaving.
const SLIDE_OFF: f32 = 512.0;
/// Vertical title lift at the start of a transition.
const TITLE_LIFT: f32 = 100.0;

/// A screen showing a menu.
///
/// Up/down/left/right drive the menu's cursor, select fires the entry under
/// the cursor, and cancel runs the cancel handler, which exits the screen
/// unless replaced. When the host has a pointer, hovering moves the cursor
/// and a left click selects.
pub struct MenuScreen {
    core: ScreenCore,
    title: MenuEntry,
    title_position: Vec2,
    menu: GridMenu,
    font: Option<Font>,
    title_font: Option<Font>,
    transition_movement: bool,
    cursor_asset: Option<String>,
    cursor_image: Option<Image>,
    pointer: Option<Vec2>,
    on_cancel: Option<CancelHandler>,
}

impl MenuScreen {
    /// A vertical, single-column menu.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_menu(title, GridMenu::single(Orientation::Vertical))
    }

    /// A menu with `columns` columns.
    pub fn grid(
        title: impl Into<String>,
        columns: usize,
        orientation: Orientation,
    ) -> Result<Self> {
        Ok(Self::with_menu(title, GridMenu::new(columns, orientation)?))
    }

    /// A menu screen around an existing grid.
    pub fn with_menu(title: impl Into<String>, menu: GridMenu) -> Self {
        let half = Duration::from_millis(500);
        Self {
            core: ScreenCore::new().with_transition_times(half, half),
            title: MenuEntry::label(title).with_text_colors(Color::WHITE, Color::WHITE),
            title_position: Vec2::ZERO,
            menu,
            font: None,
            title_font: None,
            transition_movement: true,
            cursor_asset: None,
            cursor_image: None,
            pointer: None,
            on_cancel: None,
        }
    }

    // -- builders --

    pub fn with_mode(mut self, mode: ColumnMode) -> Self {
        self.menu.set_mode(mode);
        self
    }

    /// Slide entries in and out during transitions (builder, on by default).
    pub fn with_transition_movement(mut self, enabled: bool) -> Self {
        self.transition_movement = enabled;
        self
    }

    /// Draw this image at the pointer position (builder).
    pub fn with_cursor(mut self, asset: impl Into<String>) -> Self {
        self.cursor_asset = Some(asset.into());
        self
    }

    pub fn with_title_position(mut self, position: Vec2) -> Self {
        self.title_position = position;
        self
    }

    /// Use `font` for entries instead of the manager's default (builder).
    pub fn with_font(mut self, font: Font) -> Self {
        self.font = Some(font);
        self.menu.invalidate();
        self
    }

    pub fn with_core(mut self, core: ScreenCore) -> Self {
        self.core = core;
        self
    }

    /// Replace the default cancel behaviour (builder).
    pub fn on_cancel<F>(mut self, handler: F) -> Self
    where
        F: FnMut(PlayerIndex, &mut ScreenContext<'_>) + 'static,
    {
        self.on_cancel = Some(Box::new(handler));
        self
    }

    // -- contents --

    pub fn menu(&self) -> &GridMenu {
        &self.menu
    }

    pub fn menu_mut(&mut self) -> &mut GridMenu {
        &mut self.menu
    }

    pub fn title(&self) -> &MenuEntry {
        &self.title
    }

    pub fn title_mut(&mut self) -> &mut MenuEntry {
        &mut self.title
    }

    /// Append an entry to `column`.
    pub fn add_entry(&mut self, column: usize, entry: MenuEntry) -> Result<&mut MenuEntry> {
        self.menu.add_entry(column, entry)
    }

    /// Append a disabled entry to `column`.
    pub fn add_label(&mut self, column: usize, text: impl Into<String>) -> Result<&mut MenuEntry> {
        self.menu.add_entry(column, MenuEntry::label(text))
    }

    /// Position the first entry of `column`.
    pub fn set_anchor(&mut self, column: usize, position: Vec2) -> Result<()> {
        self.menu.set_anchor(column, position)
    }

    /// Last known pointer position, if any.
    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    // -- events --

    /// Select the entry at `sel` as if `player` had chosen it.
    pub fn click(&mut self, sel: Selection, player: PlayerIndex, cx: &mut ScreenContext<'_>) -> bool {
        self.menu.fire(sel, player, cx)
    }

    /// Run the cancel handler, or exit when there is none.
    pub fn cancel(&mut self, player: PlayerIndex, cx: &mut ScreenContext<'_>) {
        match &mut self.on_cancel {
            Some(handler) => handler(player, cx),
            None => cx.exit(),
        }
    }

    fn handle_pointer(&mut self, cx: &mut ScreenContext<'_>, input: &InputState) {
        let Some(pointer) = input.pointer() else {
            return;
        };
        let clicked = input.is_new_pointer_press(PointerButton::Left);
        if !input.is_pointer_moved() && !clicked {
            return;
        }
        self.pointer = Some(pointer.position);
        if let Some(sel) = self.menu.pointer_at(pointer.position) {
            if clicked {
                self.menu.fire(sel, PlayerIndex::One, cx);
            }
        }
    }

    /// Horizontal entry shift for the current transition.
    fn slide(&self) -> f32 {
        if !self.transition_movement {
            return 0.0;
        }
        let p = self.core.transition_position();
        let offset = p * p;
        if self.core.state() == ScreenState::TransitionOn {
            offset * SLIDE_ON
        } else {
            offset * SLIDE_OFF
        }
    }
}

impl Screen for MenuScreen {
    fn core(&self) -> &ScreenCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ScreenCore {
        &mut self.core
    }

    fn name(&self) -> &str {
        self.title.text()
    }

    fn load_content(&mut self, cx: &mut LoadContext<'_>) -> std::result::Result<(), ContentError> {
        if self.font.is_none() {
            self.font = Some(cx.resources.font);
        }
        if self.title_font.is_none() {
            self.title_font = Some(cx.resources.big_font);
        }
        if let Some(asset) = &self.cursor_asset {
            self.cursor_image = Some(cx.content.load_image(asset)?);
        }
        self.menu.invalidate();
        Ok(())
    }

    fn unload_content(&mut self, _content: &mut dyn ContentLoader) {
        self.cursor_image = None;
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
        if self.menu.cursor().is_none()
            && !self.menu.allows_empty_selection()
            && self.menu.iter().any(|(_, e)| e.is_enabled())
        {
            self.menu.select_first();
        }
    }

    fn handle_input(&mut self, cx: &mut ScreenContext<'_>, input: &InputState) {
        let player = self.core.controlling_player();
        let vertical = input.is_menu_down(player) as i32 - input.is_menu_up(player) as i32;
        let horizontal = input.is_menu_right(player) as i32 - input.is_menu_left(player) as i32;
        self.menu.navigate(vertical, horizontal);

        if let Some(p) = input.is_menu_select(player) {
            if let Some(sel) = self.menu.cursor() {
                self.menu.fire(sel, p, cx);
            }
        } else if let Some(p) = input.is_menu_cancel(player) {
            self.cancel(p, cx);
        }

        self.handle_pointer(cx, input);
    }

    fn draw(&mut self, cx: &mut DrawContext<'_>) {
        let resources = cx.resources();
        let font = self.font.unwrap_or(resources.font);
        let title_font = self.title_font.unwrap_or(resources.big_font);
        let alpha = self.core.transition_alpha();
        let active = self.core.is_active();
        let shift = Vec2::new(self.slide(), 0.0);
        let p = self.core.transition_position();

        let mut batch = cx.batch();
        self.menu.draw(&mut *batch, font, shift, active, alpha);

        if !self.title.text().is_empty() {
            let size = self.title.measure(&*batch, title_font);
            self.title.place(self.title_position, size);
            let lift = Vec2::new(0.0, -p * p * TITLE_LIFT);
            self.title.draw(&mut *batch, title_font, lift, false, alpha);
        }

        if let (Some(image), Some(pointer)) = (self.cursor_image, self.pointer) {
            batch.draw_image(
                Some(image),
                Destination::Position(pointer - image.size() / 2.0),
                DrawParams::default(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::{Command, ScreenId, SharedResources};
    use scrim_core::testing::{DrawCall, MemoryContent, RecordingRenderer};
    use scrim_core::{DeviceState, Key, PointerState, Rect};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn resources() -> SharedResources {
        SharedResources {
            font: Font(1),
            small_font: Font(2),
            big_font: Font(3),
            blank: Image {
                id: 9,
                width: 1,
                height: 1,
            },
        }
    }

    /// Feed one frame where `press` goes down.
    fn press(input: &mut InputState, press: DeviceState) {
        input.update(DeviceState::default());
        input.update(press);
    }

    fn key(k: Key) -> DeviceState {
        DeviceState::default().with_down(PlayerIndex::One, k)
    }

    struct Harness {
        commands: Vec<Command>,
        next_id: u64,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                commands: Vec::new(),
                next_id: 100,
            }
        }

        fn cx(&mut self) -> ScreenContext<'_> {
            ScreenContext::new(
                ScreenId(1),
                Rect::new(0.0, 0.0, 80.0, 24.0),
                &mut self.commands,
                &mut self.next_id,
            )
        }
    }

    fn three_entries(log: &Rc<RefCell<Vec<String>>>) -> MenuScreen {
        let mut screen = MenuScreen::new("Main");
        for name in ["Play", "Options", "Quit"] {
            let log = log.clone();
            screen
                .add_entry(
                    0,
                    MenuEntry::new(name).on_selected(move |s, _| {
                        log.borrow_mut().push(format!("{} by {:?}", s.text, s.player))
                    }),
                )
                .unwrap();
        }
        screen
    }

    #[test]
    fn update_selects_first_entry() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut screen = three_entries(&log);
        let mut h = Harness::new();
        screen.update(&mut h.cx(), Duration::ZERO, false, false);
        assert_eq!(screen.menu().cursor(), Some(Selection::new(0, 0)));
    }

    #[test]
    fn keys_navigate_and_select() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut screen = three_entries(&log);
        let mut h = Harness::new();
        let mut input = InputState::new();
        screen.update(&mut h.cx(), Duration::ZERO, false, false);

        press(&mut input, key(Key::ArrowDown));
        screen.handle_input(&mut h.cx(), &input);
        press(&mut input, key(Key::ArrowDown));
        screen.handle_input(&mut h.cx(), &input);
        assert_eq!(screen.menu().cursor(), Some(Selection::new(0, 2)));

        press(
            &mut input,
            DeviceState::default().with_down(PlayerIndex::Three, Key::Enter),
        );
        screen.handle_input(&mut h.cx(), &input);
        assert_eq!(*log.borrow(), vec!["Quit by Three"]);
    }

    #[test]
    fn controlling_player_filters_input() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut screen = three_entries(&log);
        screen.core_mut().reset_for_add(Some(PlayerIndex::Two));
        let mut h = Harness::new();
        let mut input = InputState::new();
        screen.update(&mut h.cx(), Duration::ZERO, false, false);

        press(&mut input, key(Key::Enter));
        screen.handle_input(&mut h.cx(), &input);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn cancel_exits_by_default() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut screen = three_entries(&log);
        let mut h = Harness::new();
        let mut input = InputState::new();
        press(&mut input, key(Key::Escape));
        screen.handle_input(&mut h.cx(), &input);
        assert!(matches!(h.commands.as_slice(), [Command::Exit(ScreenId(1))]));
    }

    #[test]
    fn cancel_handler_replaces_exit() {
        let seen = Rc::new(RefCell::new(None));
        let s = seen.clone();
        let mut screen = MenuScreen::new("Pause").on_cancel(move |p, _| *s.borrow_mut() = Some(p));
        let mut h = Harness::new();
        let mut input = InputState::new();
        press(&mut input, key(Key::Escape));
        screen.handle_input(&mut h.cx(), &input);
        assert!(h.commands.is_empty());
        assert_eq!(*seen.borrow(), Some(PlayerIndex::One));
    }

    #[test]
    fn pointer_hover_and_click() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut screen = three_entries(&log);
        screen.set_anchor(0, Vec2::new(40.0, 0.0)).unwrap();
        screen.menu_mut().layout(&scrim_core::testing::FixedMeasure::default(), Font(1));
        let mut h = Harness::new();
        let mut input = InputState::new();

        // Rows sit at y = 0, 9, 18, each one unit tall.
        let hover = PointerState {
            position: Vec2::new(40.0, 9.5),
            ..PointerState::default()
        };
        input.update(DeviceState::default().with_pointer(PointerState::default()));
        input.update(DeviceState::default().with_pointer(hover));
        screen.handle_input(&mut h.cx(), &input);
        assert_eq!(screen.menu().cursor(), Some(Selection::new(0, 1)));
        assert!(log.borrow().is_empty());
        assert_eq!(screen.pointer(), Some(hover.position));

        let click = PointerState {
            position: Vec2::new(40.0, 18.5),
            left: true,
            ..PointerState::default()
        };
        input.update(DeviceState::default().with_pointer(click));
        screen.handle_input(&mut h.cx(), &input);
        assert_eq!(*log.borrow(), vec!["Quit by One"]);
    }

    #[test]
    fn click_fires_programmatically() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut screen = three_entries(&log);
        let mut h = Harness::new();
        assert!(screen.click(Selection::new(0, 1), PlayerIndex::Four, &mut h.cx()));
        assert_eq!(*log.borrow(), vec!["Options by Four"]);
    }

    #[test]
    fn entries_slide_while_transitioning() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut screen = three_entries(&log);
        let res = resources();
        let mut content = MemoryContent::lenient();
        screen
            .load_content(&mut LoadContext {
                content: &mut content,
                resources: &res,
            })
            .unwrap();
        let mut h = Harness::new();
        // Halfway on: offset = 0.25, shift = 64.
        screen.update(&mut h.cx(), Duration::from_millis(250), false, false);

        let mut r = RecordingRenderer::new(Rect::new(0.0, 0.0, 80.0, 24.0));
        screen.draw(&mut DrawContext::new(&mut r, &res, Duration::ZERO));
        let first = r.calls().iter().find_map(|c| match c {
            DrawCall::Text { text, position, .. } if text == "Play" => Some(*position),
            _ => None,
        });
        assert_eq!(first, Some(Vec2::new(64.0, 0.0)));
        assert_eq!(r.calls().first(), Some(&DrawCall::Begin));
        assert_eq!(r.calls().last(), Some(&DrawCall::End));
        assert!(r.texts().contains(&"Main"));
    }

    #[test]
    fn cursor_image_loads_with_content() {
        let mut screen = MenuScreen::new("").with_cursor("cursor");
        let res = resources();
        let mut content = MemoryContent::strict();
        let err = screen.load_content(&mut LoadContext {
            content: &mut content,
            resources: &res,
        });
        assert!(matches!(err, Err(ContentError::NotFound(name)) if name == "cursor"));

        let mut content = MemoryContent::strict().with_image("cursor", 4, 4);
        screen
            .load_content(&mut LoadContext {
                content: &mut content,
                resources: &res,
            })
            .unwrap();
        assert_eq!(screen.name(), "");
    }
}
