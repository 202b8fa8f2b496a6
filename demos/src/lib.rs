//! Screens for the terminal menu demo.
//!
//! Demonstrates: a background that stays active under every menu, a main
//! menu, a two-column options grid, a confirmation popup that darkens the
//! screens beneath it, and a gameplay screen with a pause menu.
//!
//! Coordinates are terminal cells: the layout assumes at least 80x24.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use scrim_core::{ContentError, Color, Destination, DrawParams, InputState, PlayerIndex, Vec2};
use scrim_ui::{
    ColumnMode, DrawContext, LoadContext, MenuEntry, MenuScreen, Orientation, Result, Screen,
    ScreenContext, ScreenCore, ScreenManager, ScreenState, Selection,
};

pub const WIDTH: f32 = 80.0;
pub const HEIGHT: f32 = 24.0;

/// Image drawn under the mouse pointer on every menu.
pub const CURSOR: &str = "cursor";

const COL_BACKGROUND: Color = Color::from_rgb(20, 20, 40);
const COL_GAME: Color = Color::from_rgb(10, 40, 20);
const COL_LABEL: Color = Color::from_rgb(170, 170, 190);

const CENTER_X: f32 = WIDTH / 2.0;
const TITLE_Y: f32 = 4.0;
const MENU_Y: f32 = 8.0;

fn half_second() -> Duration {
    Duration::from_millis(500)
}

fn entry(text: &str) -> MenuEntry {
    MenuEntry::new(text).with_padding(1.0)
}

/// Fill the manager with the screens the demo starts on.
pub fn populate(manager: &mut ScreenManager) -> Result<()> {
    manager.add_screen(Box::new(BackgroundScreen::new()), None)?;
    manager.add_screen(Box::new(main_menu(Options::shared())?), None)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Settings the options menu edits.
#[derive(Clone, Debug, PartialEq)]
pub struct Options {
    pub difficulty: usize,
    pub sound: bool,
    pub language: usize,
}

const DIFFICULTIES: [&str; 3] = ["Easy", "Normal", "Hard"];
const LANGUAGES: [&str; 3] = ["English", "Francais", "Deutsch"];

impl Default for Options {
    fn default() -> Self {
        Self {
            difficulty: 1,
            sound: true,
            language: 0,
        }
    }
}

impl Options {
    pub fn shared() -> Rc<RefCell<Options>> {
        Rc::new(RefCell::new(Options::default()))
    }

    /// Value shown for each row of the options grid.
    fn values(&self) -> [String; 3] {
        [
            DIFFICULTIES[self.difficulty].to_string(),
            if self.sound { "On" } else { "Off" }.to_string(),
            LANGUAGES[self.language].to_string(),
        ]
    }

    fn cycle(&mut self, row: usize) {
        match row {
            0 => self.difficulty = (self.difficulty + 1) % DIFFICULTIES.len(),
            1 => self.sound = !self.sound,
            2 => self.language = (self.language + 1) % LANGUAGES.len(),
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Background
// ---------------------------------------------------------------------------

/// Sits at the bottom of the stack and keeps drawing while menus cover it.
pub struct BackgroundScreen {
    core: ScreenCore,
}

impl BackgroundScreen {
    pub fn new() -> Self {
        Self {
            core: ScreenCore::new()
                .with_transition_times(half_second(), half_second())
                .ignoring_coverage(),
        }
    }
}

impl Default for BackgroundScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for BackgroundScreen {
    fn core(&self) -> &ScreenCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ScreenCore {
        &mut self.core
    }

    fn draw(&mut self, cx: &mut DrawContext<'_>) {
        let viewport = cx.viewport();
        let alpha = self.core.transition_alpha();
        let mut batch = cx.batch();
        batch.fill(viewport, COL_BACKGROUND.faded(alpha));
    }
}

// ---------------------------------------------------------------------------
// Menus
// ---------------------------------------------------------------------------

/// Push `screen` from a menu handler, logging construction failures.
fn open<S: Screen + 'static>(
    cx: &mut ScreenContext<'_>,
    screen: Result<S>,
    player: Option<PlayerIndex>,
) {
    match screen {
        Ok(screen) => {
            cx.add_screen(Box::new(screen), player);
        }
        Err(e) => log::error!("could not open screen: {e}"),
    }
}

fn titled(menu: MenuScreen) -> Result<MenuScreen> {
    let mut menu = menu
        .with_transition_movement(false)
        .with_cursor(CURSOR)
        .with_title_position(Vec2::new(CENTER_X, TITLE_Y));
    menu.set_anchor(0, Vec2::new(CENTER_X, MENU_Y))?;
    Ok(menu)
}

/// The first menu: play, options, exit.
pub fn main_menu(options: Rc<RefCell<Options>>) -> Result<MenuScreen> {
    let mut menu = titled(MenuScreen::new("Main Menu"))?.on_cancel(|_, cx| confirm_exit(cx));
    menu.add_entry(
        0,
        entry("Play Game").on_selected(|s, cx| {
            cx.remove_all_screens();
            cx.add_screen(Box::new(GameplayScreen::new()), Some(s.player));
        }),
    )?;
    menu.add_entry(
        0,
        entry("Options").on_selected(move |s, cx| {
            open(cx, OptionsScreen::new(options.clone()), Some(s.player));
        }),
    )?;
    menu.add_entry(0, entry("Exit").on_selected(|_, cx| confirm_exit(cx)))?;
    Ok(menu)
}

fn confirm_exit(cx: &mut ScreenContext<'_>) {
    let popup = MessageBoxScreen::new("Are you sure you want to exit?", |_, cx| {
        cx.remove_all_screens();
    });
    open(cx, popup, None);
}

/// Two columns: labels on the left (not selectable), values on the right.
/// Selecting a value cycles it.
pub struct OptionsScreen {
    menu: MenuScreen,
    options: Rc<RefCell<Options>>,
}

impl OptionsScreen {
    pub fn new(options: Rc<RefCell<Options>>) -> Result<Self> {
        let grid = MenuScreen::grid("Options", 2, Orientation::Vertical)?;
        let mut menu = titled(grid.with_mode(ColumnMode::Relative))?;
        menu.set_anchor(0, Vec2::new(CENTER_X - 12.0, MENU_Y))?;
        menu.set_anchor(1, Vec2::new(CENTER_X + 12.0, MENU_Y))?;

        for label in ["Difficulty", "Sound", "Language"] {
            menu.add_entry(
                0,
                MenuEntry::label(label)
                    .with_padding(1.0)
                    .with_text_colors(COL_LABEL, COL_LABEL),
            )?;
        }
        let values = options.borrow().values();
        for (row, value) in values.into_iter().enumerate() {
            let shared = options.clone();
            menu.add_entry(
                1,
                entry(&value).on_selected(move |_, _| shared.borrow_mut().cycle(row)),
            )?;
        }
        menu.add_entry(1, entry("Back").on_selected(|_, cx| cx.exit()))?;

        Ok(Self { menu, options })
    }

    pub fn menu(&self) -> &MenuScreen {
        &self.menu
    }

    fn refresh(&mut self) {
        let values = self.options.borrow().values();
        for (row, value) in values.into_iter().enumerate() {
            if let Some(e) = self.menu.menu_mut().entry_mut(Selection::new(1, row)) {
                if e.text() != value {
                    e.set_text(value);
                }
            }
        }
    }
}

impl Screen for OptionsScreen {
    fn core(&self) -> &ScreenCore {
        self.menu.core()
    }

    fn core_mut(&mut self) -> &mut ScreenCore {
        self.menu.core_mut()
    }

    fn name(&self) -> &str {
        self.menu.name()
    }

    fn load_content(&mut self, cx: &mut LoadContext<'_>) -> std::result::Result<(), ContentError> {
        self.menu.load_content(cx)
    }

    fn update(
        &mut self,
        cx: &mut ScreenContext<'_>,
        elapsed: Duration,
        other_screen_has_focus: bool,
        covered_by_other_screen: bool,
    ) {
        self.menu
            .update(cx, elapsed, other_screen_has_focus, covered_by_other_screen);
    }

    fn handle_input(&mut self, cx: &mut ScreenContext<'_>, input: &InputState) {
        self.menu.handle_input(cx, input);
        self.refresh();
    }

    fn draw(&mut self, cx: &mut DrawContext<'_>) {
        self.menu.draw(cx);
    }
}

// ---------------------------------------------------------------------------
// Message box
// ---------------------------------------------------------------------------

/// A yes/no popup. The screens beneath stay visible, darkened.
pub struct MessageBoxScreen {
    menu: MenuScreen,
}

impl MessageBoxScreen {
    pub fn new<F>(message: &str, mut on_accept: F) -> Result<Self>
    where
        F: FnMut(PlayerIndex, &mut ScreenContext<'_>) + 'static,
    {
        let quick = Duration::from_millis(200);
        let core = ScreenCore::new()
            .with_transition_times(quick, quick)
            .popup();
        let mut menu = titled(MenuScreen::new(message).with_core(core))?;
        menu.set_anchor(0, Vec2::new(CENTER_X, TITLE_Y + 6.0))?;
        menu.add_entry(
            0,
            entry("Yes").on_selected(move |s, cx| {
                on_accept(s.player, cx);
                cx.exit();
            }),
        )?;
        menu.add_entry(0, entry("No").on_selected(|_, cx| cx.exit()))?;
        Ok(Self { menu })
    }

    pub fn menu(&self) -> &MenuScreen {
        &self.menu
    }
}

impl Screen for MessageBoxScreen {
    fn core(&self) -> &ScreenCore {
        self.menu.core()
    }

    fn core_mut(&mut self) -> &mut ScreenCore {
        self.menu.core_mut()
    }

    fn name(&self) -> &str {
        "MessageBox"
    }

    fn load_content(&mut self, cx: &mut LoadContext<'_>) -> std::result::Result<(), ContentError> {
        self.menu.load_content(cx)
    }

    fn update(
        &mut self,
        cx: &mut ScreenContext<'_>,
        elapsed: Duration,
        other_screen_has_focus: bool,
        covered_by_other_screen: bool,
    ) {
        self.menu
            .update(cx, elapsed, other_screen_has_focus, covered_by_other_screen);
    }

    fn handle_input(&mut self, cx: &mut ScreenContext<'_>, input: &InputState) {
        self.menu.handle_input(cx, input);
    }

    fn draw(&mut self, cx: &mut DrawContext<'_>) {
        let alpha = self.core().transition_alpha();
        cx.fade_back_buffer_to_color(Color::BLACK, (alpha as u16 * 2 / 3) as u8);
        self.menu.draw(cx);
    }
}

// ---------------------------------------------------------------------------
// Gameplay
// ---------------------------------------------------------------------------

/// Stand-in for a game: a marker bouncing across the screen. The pause
/// control opens the pause menu.
pub struct GameplayScreen {
    core: ScreenCore,
    marker: Vec2,
    velocity: f32,
}

impl GameplayScreen {
    pub fn new() -> Self {
        Self {
            core: ScreenCore::new()
                .with_transition_times(Duration::from_millis(1500), half_second()),
            marker: Vec2::new(CENTER_X, HEIGHT / 2.0),
            velocity: 10.0,
        }
    }

    pub fn marker(&self) -> Vec2 {
        self.marker
    }
}

impl Default for GameplayScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for GameplayScreen {
    fn core(&self) -> &ScreenCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ScreenCore {
        &mut self.core
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
        // Frozen while fading in and while paused.
        if self.core.state() != ScreenState::Active || !self.core.is_active() {
            return;
        }
        self.marker.x += self.velocity * elapsed.as_secs_f32();
        if self.marker.x < 1.0 || self.marker.x > WIDTH - 2.0 {
            self.velocity = -self.velocity;
            self.marker.x = self.marker.x.clamp(1.0, WIDTH - 2.0);
        }
    }

    fn handle_input(&mut self, cx: &mut ScreenContext<'_>, input: &InputState) {
        let player = self.core.controlling_player();
        if input.is_pause_game(player) {
            open(cx, pause_menu(), player);
        }
    }

    fn draw(&mut self, cx: &mut DrawContext<'_>) {
        let viewport = cx.viewport();
        let font = cx.resources().font;
        let alpha = self.core.transition_alpha();
        let mut batch = cx.batch();
        batch.fill(viewport, COL_GAME.faded(alpha));
        batch.draw_text(
            font,
            "Insert gameplay here (Esc to pause)",
            Vec2::new(2.0, 1.0),
            DrawParams::tinted(Color::WHITE.faded(alpha)),
        );
        batch.draw_image(
            None,
            Destination::Position(self.marker),
            DrawParams::tinted(Color::CORAL.faded(alpha)),
        );
    }
}

/// Resume, or quit back to the main menu.
pub fn pause_menu() -> Result<MenuScreen> {
    let core = ScreenCore::new()
        .with_transition_times(half_second(), half_second())
        .popup();
    let mut menu = titled(MenuScreen::new("Paused").with_core(core))?;
    menu.add_entry(0, entry("Resume Game").on_selected(|_, cx| cx.exit()))?;
    menu.add_entry(
        0,
        entry("Quit Game").on_selected(|_, cx| {
            let popup = MessageBoxScreen::new("Quit to the main menu?", |_, cx| {
                cx.remove_all_screens();
                cx.add_screen(Box::new(BackgroundScreen::new()), None);
                open(cx, main_menu(Options::shared()), None);
            });
            open(cx, popup, None);
        }),
    )?;
    Ok(menu)
}
