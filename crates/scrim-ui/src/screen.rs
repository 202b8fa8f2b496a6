//! Screens: the [`Screen`] trait, its transition state machine
//! ([`ScreenCore`]) and the context values the manager lends to screen
//! callbacks.

use std::fmt;
use std::time::Duration;

use scrim_core::{
    Batch, Color, ContentError, ContentLoader, Destination, DrawParams, Font, Image, InputState,
    PlayerIndex, Rect, Renderer,
};

/// Progress within this distance of an end point counts as having reached it.
const TRANSITION_EPSILON: f64 = 1e-6;

// ---------------------------------------------------------------------------
// ScreenId / ScreenState
// ---------------------------------------------------------------------------

/// Identity issued by the manager when a screen joins the stack.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScreenId(pub(crate) u64);

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle state of a screen.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScreenState {
    TransitionOn,
    Active,
    TransitionOff,
    Hidden,
}

impl ScreenState {
    /// `TransitionOn` or `Active`: the states that can hold focus and cover
    /// the screens below.
    #[inline]
    pub fn is_showing(self) -> bool {
        matches!(self, Self::TransitionOn | Self::Active)
    }
}

// ---------------------------------------------------------------------------
// ScreenCore
// ---------------------------------------------------------------------------

/// Transition timers and flags shared by every screen.
///
/// `transition_position` runs from 1 (fully off) to 0 (fully on). Each
/// update moves it by `elapsed / duration` towards its target; a zero
/// duration jumps straight to the end.
#[derive(Clone, Debug)]
pub struct ScreenCore {
    state: ScreenState,
    transition_on_time: Duration,
    transition_off_time: Duration,
    transition_position: f64,
    is_popup: bool,
    is_exiting: bool,
    ignores_coverage: bool,
    other_screen_has_focus: bool,
    exit_complete: bool,
    controlling_player: Option<PlayerIndex>,
}

impl Default for ScreenCore {
    fn default() -> Self {
        Self {
            state: ScreenState::TransitionOn,
            transition_on_time: Duration::ZERO,
            transition_off_time: Duration::ZERO,
            transition_position: 1.0,
            is_popup: false,
            is_exiting: false,
            ignores_coverage: false,
            other_screen_has_focus: false,
            exit_complete: false,
            controlling_player: None,
        }
    }
}

impl ScreenCore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set both transition durations (builder).
    pub fn with_transition_times(mut self, on: Duration, off: Duration) -> Self {
        self.transition_on_time = on;
        self.transition_off_time = off;
        self
    }

    /// Mark the screen as a popup (builder).
    pub fn popup(mut self) -> Self {
        self.is_popup = true;
        self
    }

    /// Never transition off because of screens above (builder).
    pub fn ignoring_coverage(mut self) -> Self {
        self.ignores_coverage = true;
        self
    }

    pub fn state(&self) -> ScreenState {
        self.state
    }

    pub fn transition_on_time(&self) -> Duration {
        self.transition_on_time
    }

    pub fn set_transition_on_time(&mut self, d: Duration) {
        self.transition_on_time = d;
    }

    pub fn transition_off_time(&self) -> Duration {
        self.transition_off_time
    }

    pub fn set_transition_off_time(&mut self, d: Duration) {
        self.transition_off_time = d;
    }

    pub fn transition_position(&self) -> f32 {
        self.transition_position as f32
    }

    /// Opacity for fade-style rendering: 255 fully on, 0 fully off.
    pub fn transition_alpha(&self) -> u8 {
        ((1.0 - self.transition_position) * 255.0).round() as u8
    }

    pub fn is_popup(&self) -> bool {
        self.is_popup
    }

    pub fn set_popup(&mut self, popup: bool) {
        self.is_popup = popup;
    }

    pub fn ignores_coverage(&self) -> bool {
        self.ignores_coverage
    }

    pub fn set_ignores_coverage(&mut self, ignore: bool) {
        self.ignores_coverage = ignore;
    }

    /// Whether an exit has been requested.
    pub fn is_exiting(&self) -> bool {
        self.is_exiting
    }

    /// Whether the exit transition has finished and the screen is waiting
    /// to be removed.
    pub fn exit_complete(&self) -> bool {
        self.exit_complete
    }

    pub fn controlling_player(&self) -> Option<PlayerIndex> {
        self.controlling_player
    }

    /// Whether the screen can respond to input: it is on (or coming on) and
    /// no other screen holds focus.
    pub fn is_active(&self) -> bool {
        !self.other_screen_has_focus && self.state.is_showing()
    }

    /// Advance the transition state machine by one frame.
    pub fn update(
        &mut self,
        elapsed: Duration,
        other_screen_has_focus: bool,
        covered_by_other_screen: bool,
    ) {
        self.other_screen_has_focus = other_screen_has_focus;

        if self.is_exiting {
            self.state = ScreenState::TransitionOff;
            if !self.advance(elapsed, self.transition_off_time, 1.0) {
                self.exit_complete = true;
            }
        } else if covered_by_other_screen && !self.ignores_coverage {
            self.state = if self.advance(elapsed, self.transition_off_time, 1.0) {
                ScreenState::TransitionOff
            } else {
                ScreenState::Hidden
            };
        } else {
            self.state = if self.advance(elapsed, self.transition_on_time, -1.0) {
                ScreenState::TransitionOn
            } else {
                ScreenState::Active
            };
        }
    }

    /// Move the position towards 0 (`direction < 0`) or 1. Returns `true`
    /// while the transition is still running.
    fn advance(&mut self, elapsed: Duration, duration: Duration, direction: f64) -> bool {
        let delta = if duration.is_zero() {
            1.0
        } else {
            elapsed.as_secs_f64() / duration.as_secs_f64()
        };
        self.transition_position += delta * direction;

        if direction < 0.0 && self.transition_position <= TRANSITION_EPSILON {
            self.transition_position = 0.0;
            false
        } else if direction > 0.0 && self.transition_position >= 1.0 - TRANSITION_EPSILON {
            self.transition_position = 1.0;
            false
        } else {
            true
        }
    }

    pub(crate) fn begin_exit(&mut self) {
        self.is_exiting = true;
    }

    pub(crate) fn reset_for_add(&mut self, controlling_player: Option<PlayerIndex>) {
        self.controlling_player = controlling_player;
        self.is_exiting = false;
        self.exit_complete = false;
    }
}

// ---------------------------------------------------------------------------
// Shared resources and contexts
// ---------------------------------------------------------------------------

/// Resources the manager loads once and lends to every screen.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SharedResources {
    pub font: Font,
    pub small_font: Font,
    pub big_font: Font,
    /// A plain white image used for overlays and solid fills.
    pub blank: Image,
}

/// Handed to [`Screen::load_content`].
pub struct LoadContext<'a> {
    pub content: &'a mut dyn ContentLoader,
    pub resources: &'a SharedResources,
}

/// Structural changes a screen asks the manager for.
pub(crate) enum Command {
    Add {
        id: ScreenId,
        screen: Box<dyn Screen>,
        controlling_player: Option<PlayerIndex>,
    },
    Remove(ScreenId),
    Exit(ScreenId),
    RemoveAll,
}

/// Handed to [`Screen::update`] and [`Screen::handle_input`].
///
/// Requests made here are applied by the manager as soon as the callback
/// returns, so they never disturb the stack walk in progress.
pub struct ScreenContext<'a> {
    id: ScreenId,
    viewport: Rect,
    commands: &'a mut Vec<Command>,
    next_id: &'a mut u64,
}

impl<'a> ScreenContext<'a> {
    pub(crate) fn new(
        id: ScreenId,
        viewport: Rect,
        commands: &'a mut Vec<Command>,
        next_id: &'a mut u64,
    ) -> Self {
        Self {
            id,
            viewport,
            commands,
            next_id,
        }
    }

    /// The screen being called.
    pub fn id(&self) -> ScreenId {
        self.id
    }

    /// Drawable area as of the last draw.
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Push a new screen on top of the stack. It is first updated next frame.
    pub fn add_screen(
        &mut self,
        screen: Box<dyn Screen>,
        controlling_player: Option<PlayerIndex>,
    ) -> ScreenId {
        let id = ScreenId(*self.next_id);
        *self.next_id += 1;
        self.commands.push(Command::Add {
            id,
            screen,
            controlling_player,
        });
        id
    }

    /// Remove a screen immediately, skipping its exit transition.
    pub fn remove_screen(&mut self, id: ScreenId) {
        self.commands.push(Command::Remove(id));
    }

    /// Ask a screen to transition off and be removed afterwards.
    pub fn exit_screen(&mut self, id: ScreenId) {
        self.commands.push(Command::Exit(id));
    }

    /// Ask the calling screen to exit.
    pub fn exit(&mut self) {
        self.exit_screen(self.id);
    }

    /// Remove every screen, including the caller.
    pub fn remove_all_screens(&mut self) {
        self.commands.push(Command::RemoveAll);
    }
}

/// Handed to [`Screen::draw`].
pub struct DrawContext<'a> {
    renderer: &'a mut dyn Renderer,
    resources: &'a SharedResources,
    elapsed: Duration,
}

impl<'a> DrawContext<'a> {
    pub fn new(
        renderer: &'a mut dyn Renderer,
        resources: &'a SharedResources,
        elapsed: Duration,
    ) -> Self {
        Self {
            renderer,
            resources,
            elapsed,
        }
    }

    pub fn renderer(&mut self) -> &mut dyn Renderer {
        &mut *self.renderer
    }

    /// Begin a draw batch; it ends when the guard is dropped.
    pub fn batch(&mut self) -> Batch<'_, dyn Renderer + 'a> {
        Batch::begin(&mut *self.renderer)
    }

    pub fn resources(&self) -> &'a SharedResources {
        self.resources
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn viewport(&self) -> Rect {
        self.renderer.viewport()
    }

    /// Draw a translucent full-viewport overlay, used to darken everything
    /// beneath a popup or to fade between screens.
    pub fn fade_back_buffer_to_color(&mut self, color: Color, alpha: u8) {
        fade_back_buffer_to_color(&mut *self.renderer, self.resources.blank, color, alpha);
    }
}

pub(crate) fn fade_back_buffer_to_color(
    renderer: &mut dyn Renderer,
    blank: Image,
    color: Color,
    alpha: u8,
) {
    let viewport = renderer.viewport();
    let mut batch = Batch::begin(renderer);
    batch.draw_image(
        Some(blank),
        Destination::Rect(viewport),
        DrawParams::tinted(color.with_alpha(alpha)),
    );
}

// ---------------------------------------------------------------------------
// Screen trait
// ---------------------------------------------------------------------------

/// One layer of the UI stack.
///
/// Implementors embed a [`ScreenCore`] and expose it through
/// [`core`](Self::core) / [`core_mut`](Self::core_mut); the provided
/// [`update`](Self::update) drives its transition.
pub trait Screen {
    fn core(&self) -> &ScreenCore;

    fn core_mut(&mut self) -> &mut ScreenCore;

    /// Short name used in stack traces.
    fn name(&self) -> &str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }

    /// Load the screen's own content. Called when the screen joins an
    /// initialised manager, or when the manager is initialised.
    fn load_content(&mut self, _cx: &mut LoadContext<'_>) -> Result<(), ContentError> {
        Ok(())
    }

    /// Release the screen's content. Called when the screen leaves the stack.
    fn unload_content(&mut self, _content: &mut dyn ContentLoader) {}

    /// Per-frame logic. Runs for every screen, focused or not.
    fn update(
        &mut self,
        _cx: &mut ScreenContext<'_>,
        elapsed: Duration,
        other_screen_has_focus: bool,
        covered_by_other_screen: bool,
    ) {
        self.core_mut()
            .update(elapsed, other_screen_has_focus, covered_by_other_screen);
    }

    /// Respond to input. Only the focused screen is called, once per frame.
    fn handle_input(&mut self, _cx: &mut ScreenContext<'_>, _input: &InputState) {}

    /// Render the screen. Not called while it is hidden.
    fn draw(&mut self, cx: &mut DrawContext<'_>);
}
