//! Input snapshots: [`DeviceState`], [`InputSource`], and the
//! double-buffered [`InputState`] with edge-detection queries.
//!
//! The runtime never talks to a device API directly. A backend implements
//! [`InputSource`] and returns the raw state of every player and the
//! optional pointer; [`InputState`] keeps the current and previous snapshot
//! and answers "was this control newly pressed" questions.

use std::collections::HashSet;

use crate::geom::Vec2;

/// Number of logical players tracked by a snapshot.
pub const MAX_INPUTS: usize = 4;

// ---------------------------------------------------------------------------
// PlayerIndex
// ---------------------------------------------------------------------------

/// A logical player slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerIndex {
    One,
    Two,
    Three,
    Four,
}

impl PlayerIndex {
    /// Every player, in priority order.
    pub const ALL: [PlayerIndex; MAX_INPUTS] = [Self::One, Self::Two, Self::Three, Self::Four];

    /// Zero-based slot index.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Player for a zero-based slot index.
    pub const fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Self::One),
            1 => Some(Self::Two),
            2 => Some(Self::Three),
            3 => Some(Self::Four),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Controls
// ---------------------------------------------------------------------------

/// A keyboard key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Escape,
    Enter,
    Space,
    Tab,
    Backspace,
    /// A printable character.
    Char(char),
}

/// A gamepad button. Thumbstick directions are reported as digital
/// buttons once the stick passes the backend's dead zone.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Button {
    A,
    B,
    X,
    Y,
    Start,
    Back,
    LeftShoulder,
    RightShoulder,
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
    LeftThumbstickUp,
    LeftThumbstickDown,
    LeftThumbstickLeft,
    LeftThumbstickRight,
}

/// Anything a player can press.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Control {
    Key(Key),
    Button(Button),
}

impl From<Key> for Control {
    fn from(k: Key) -> Self {
        Self::Key(k)
    }
}

impl From<Button> for Control {
    fn from(b: Button) -> Self {
        Self::Button(b)
    }
}

/// A pointer (mouse) button.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PointerButton {
    Left,
    Middle,
    Right,
}

// ---------------------------------------------------------------------------
// Raw device state
// ---------------------------------------------------------------------------

/// Raw state of one player's keyboard and gamepad at one instant.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerState {
    /// Controls currently held down.
    pub down: HashSet<Control>,
    /// Whether a gamepad is connected for this player.
    pub connected: bool,
    /// Left thumbstick deflection, each axis in `[-1, 1]`, Y pointing up.
    pub left_thumbstick: Vec2,
}

impl PlayerState {
    /// Whether `control` is held.
    #[inline]
    pub fn is_down(&self, control: Control) -> bool {
        self.down.contains(&control)
    }
}

/// Raw state of the pointer device at one instant.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PointerState {
    pub position: Vec2,
    pub left: bool,
    pub middle: bool,
    pub right: bool,
    /// Cumulative scroll wheel value.
    pub wheel: i32,
}

impl PointerState {
    /// Whether `button` is held.
    pub fn is_down(&self, button: PointerButton) -> bool {
        match button {
            PointerButton::Left => self.left,
            PointerButton::Middle => self.middle,
            PointerButton::Right => self.right,
        }
    }
}

/// Raw state of every input device at one instant.
///
/// `pointer` is `None` when the host has no pointer device; pointer support
/// is a runtime capability rather than a compile-time platform switch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeviceState {
    pub players: [PlayerState; MAX_INPUTS],
    pub pointer: Option<PointerState>,
}

impl DeviceState {
    /// Mark `control` as held by `player` (builder).
    pub fn with_down(mut self, player: PlayerIndex, control: impl Into<Control>) -> Self {
        self.players[player.index()].down.insert(control.into());
        self
    }

    /// Set the pointer state (builder).
    pub fn with_pointer(mut self, pointer: PointerState) -> Self {
        self.pointer = Some(pointer);
        self
    }

    /// Set a player's left thumbstick deflection (builder).
    pub fn with_thumbstick(mut self, player: PlayerIndex, stick: Vec2) -> Self {
        self.players[player.index()].left_thumbstick = stick;
        self
    }
}

/// Back-end supplied device poller.
pub trait InputSource {
    /// Read the current state of every device.
    fn poll(&mut self) -> DeviceState;
}

// ---------------------------------------------------------------------------
// Bindings
// ---------------------------------------------------------------------------

/// Control bindings for the high-level menu actions.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bindings {
    pub select: Vec<Control>,
    pub cancel: Vec<Control>,
    pub up: Vec<Control>,
    pub down: Vec<Control>,
    pub left: Vec<Control>,
    pub right: Vec<Control>,
    pub pause: Vec<Control>,
}

impl Default for Bindings {
    fn default() -> Self {
        use Button as B;
        use Control::{Button as Btn, Key as K};
        Self {
            select: vec![K(Key::Space), K(Key::Enter), Btn(B::A), Btn(B::Start)],
            cancel: vec![K(Key::Escape), Btn(B::B), Btn(B::Back)],
            up: vec![K(Key::ArrowUp), Btn(B::DPadUp), Btn(B::LeftThumbstickUp)],
            down: vec![K(Key::ArrowDown), Btn(B::DPadDown), Btn(B::LeftThumbstickDown)],
            left: vec![K(Key::ArrowLeft), Btn(B::DPadLeft), Btn(B::LeftThumbstickLeft)],
            right: vec![K(Key::ArrowRight), Btn(B::DPadRight), Btn(B::LeftThumbstickRight)],
            pause: vec![K(Key::Escape), Btn(B::Back), Btn(B::Start)],
        }
    }
}

// ---------------------------------------------------------------------------
// InputState
// ---------------------------------------------------------------------------

/// Double-buffered input snapshot.
///
/// Queries taking a `controlling` player read only that player when it is
/// `Some`, and any player when it is `None`; the returned [`PlayerIndex`]
/// reports which player actually pressed the control.
#[derive(Clone, Debug, Default)]
pub struct InputState {
    current: DeviceState,
    last: DeviceState,
    gamepad_was_connected: [bool; MAX_INPUTS],
    bindings: Bindings,
}

impl InputState {
    /// Create an input state with the default bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an input state with custom bindings.
    pub fn with_bindings(bindings: Bindings) -> Self {
        Self {
            bindings,
            ..Self::default()
        }
    }

    /// Push a new snapshot; the previous current snapshot becomes `last`.
    pub fn update(&mut self, next: DeviceState) {
        for (seen, player) in self.gamepad_was_connected.iter_mut().zip(&next.players) {
            *seen |= player.connected;
        }
        self.last = std::mem::replace(&mut self.current, next);
    }

    /// Poll `source` and push the result.
    pub fn refresh(&mut self, source: &mut dyn InputSource) {
        self.update(source.poll());
    }

    pub fn current(&self) -> &DeviceState {
        &self.current
    }

    pub fn last(&self) -> &DeviceState {
        &self.last
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn set_bindings(&mut self, bindings: Bindings) {
        self.bindings = bindings;
    }

    /// Whether a gamepad has ever been seen connected for `player`, so an
    /// unplugged controller can be detected.
    pub fn gamepad_was_connected(&self, player: PlayerIndex) -> bool {
        self.gamepad_was_connected[player.index()]
    }

    /// Whether `control` went from released to held since the last snapshot.
    pub fn is_new_press(
        &self,
        control: Control,
        controlling: Option<PlayerIndex>,
    ) -> Option<PlayerIndex> {
        match controlling {
            Some(p) => self.is_new_press_for(control, p).then_some(p),
            None => PlayerIndex::ALL
                .into_iter()
                .find(|&p| self.is_new_press_for(control, p)),
        }
    }

    /// First newly pressed control among `controls`.
    pub fn any_new_press(
        &self,
        controls: &[Control],
        controlling: Option<PlayerIndex>,
    ) -> Option<PlayerIndex> {
        controls
            .iter()
            .find_map(|&c| self.is_new_press(c, controlling))
    }

    fn is_new_press_for(&self, control: Control, p: PlayerIndex) -> bool {
        let i = p.index();
        self.current.players[i].is_down(control) && !self.last.players[i].is_down(control)
    }

    // -- menu actions --

    pub fn is_menu_select(&self, controlling: Option<PlayerIndex>) -> Option<PlayerIndex> {
        self.any_new_press(&self.bindings.select, controlling)
    }

    pub fn is_menu_cancel(&self, controlling: Option<PlayerIndex>) -> Option<PlayerIndex> {
        self.any_new_press(&self.bindings.cancel, controlling)
    }

    pub fn is_menu_up(&self, controlling: Option<PlayerIndex>) -> bool {
        self.any_new_press(&self.bindings.up, controlling).is_some()
    }

    pub fn is_menu_down(&self, controlling: Option<PlayerIndex>) -> bool {
        self.any_new_press(&self.bindings.down, controlling).is_some()
    }

    pub fn is_menu_left(&self, controlling: Option<PlayerIndex>) -> bool {
        self.any_new_press(&self.bindings.left, controlling).is_some()
    }

    pub fn is_menu_right(&self, controlling: Option<PlayerIndex>) -> bool {
        self.any_new_press(&self.bindings.right, controlling).is_some()
    }

    pub fn is_pause_game(&self, controlling: Option<PlayerIndex>) -> bool {
        self.any_new_press(&self.bindings.pause, controlling).is_some()
    }

    // -- pointer --

    /// Current pointer state, if the host has a pointer device.
    pub fn pointer(&self) -> Option<&PointerState> {
        self.current.pointer.as_ref()
    }

    /// Pointer state from the previous snapshot.
    pub fn last_pointer(&self) -> Option<&PointerState> {
        self.last.pointer.as_ref()
    }

    /// Whether the pointer position changed since the last snapshot.
    pub fn is_pointer_moved(&self) -> bool {
        match (&self.current.pointer, &self.last.pointer) {
            (Some(c), Some(l)) => c.position != l.position,
            (Some(_), None) => true,
            _ => false,
        }
    }

    /// Whether `button` went from released to held since the last snapshot.
    pub fn is_new_pointer_press(&self, button: PointerButton) -> bool {
        let now = self.pointer().is_some_and(|p| p.is_down(button));
        let before = self.last_pointer().is_some_and(|p| p.is_down(button));
        now && !before
    }

    /// Whether the scroll wheel moved since the last snapshot.
    pub fn is_wheel_moved(&self) -> bool {
        match (&self.current.pointer, &self.last.pointer) {
            (Some(c), Some(l)) => c.wheel != l.wheel,
            _ => false,
        }
    }
}
