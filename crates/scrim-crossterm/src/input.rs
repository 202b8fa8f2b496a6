//! Translates crossterm events into scrim [`DeviceState`] snapshots.
//!
//! Terminals report key presses but rarely releases, so a key counts as
//! held for exactly one snapshot after each press event. The keyboard is
//! player one.

use std::collections::HashSet;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use scrim_core::{Control, DeviceState, Key, PlayerIndex, PointerState, Vec2};

// ---------------------------------------------------------------------------
// Keyboard
// ---------------------------------------------------------------------------

pub(crate) fn translate_key(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::Up => Key::ArrowUp,
        KeyCode::Down => Key::ArrowDown,
        KeyCode::Left => Key::ArrowLeft,
        KeyCode::Right => Key::ArrowRight,
        KeyCode::Esc => Key::Escape,
        KeyCode::Enter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Char(c) => Key::Char(c),
        _ => return None,
    };
    Some(key)
}

fn is_interrupt(ev: &KeyEvent) -> bool {
    ev.modifiers.contains(KeyModifiers::CONTROL) && ev.code == KeyCode::Char('c')
}

// ---------------------------------------------------------------------------
// Collector
// ---------------------------------------------------------------------------

/// Accumulates events between two polls.
#[derive(Debug, Default)]
pub(crate) struct EventCollector {
    pressed: HashSet<Control>,
    pointer: PointerState,
    pointer_seen: bool,
    pub(crate) focused: Option<bool>,
    pub(crate) resized: Option<(u16, u16)>,
    pub(crate) interrupted: bool,
}

impl EventCollector {
    pub(crate) fn apply(&mut self, ev: &Event) {
        match ev {
            Event::Key(key) => {
                if is_interrupt(key) {
                    self.interrupted = true;
                    return;
                }
                // Release events only arrive with keyboard enhancement on.
                if key.kind == KeyEventKind::Release {
                    return;
                }
                if let Some(k) = translate_key(key.code) {
                    self.pressed.insert(k.into());
                }
            }
            Event::Mouse(me) => self.apply_mouse(me),
            Event::FocusGained => self.focused = Some(true),
            Event::FocusLost => self.focused = Some(false),
            Event::Resize(w, h) => self.resized = Some((*w, *h)),
            _ => {}
        }
    }

    fn apply_mouse(&mut self, me: &MouseEvent) {
        self.pointer_seen = true;
        // Cell centres, so a pointer over a cell hits what is drawn there.
        self.pointer.position = Vec2::new(me.column as f32 + 0.5, me.row as f32 + 0.5);
        let set = |p: &mut PointerState, button: MouseButton, down: bool| match button {
            MouseButton::Left => p.left = down,
            MouseButton::Right => p.right = down,
            MouseButton::Middle => p.middle = down,
        };
        match me.kind {
            MouseEventKind::Down(b) => set(&mut self.pointer, b, true),
            MouseEventKind::Up(b) => set(&mut self.pointer, b, false),
            MouseEventKind::ScrollUp => self.pointer.wheel += 1,
            MouseEventKind::ScrollDown => self.pointer.wheel -= 1,
            _ => {}
        }
    }

    /// Build the snapshot for this frame and forget this frame's presses.
    /// `pointer` is reported only when mouse capture is on and the mouse
    /// has been seen at least once.
    pub(crate) fn snapshot(&mut self, mouse_enabled: bool) -> DeviceState {
        let mut state = DeviceState::default();
        state.players[PlayerIndex::One.index()].down = std::mem::take(&mut self.pressed);
        if mouse_enabled && self.pointer_seen {
            state.pointer = Some(self.pointer);
        }
        state
    }
}
