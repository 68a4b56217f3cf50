//! Input events as the host toolkit hands them to the view.

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CONTROL = 1 << 1;
        const ALT = 1 << 2;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Primary,
    Secondary,
    Middle,
}

/// A pointer event, in pixels relative to the top-left of the visible area
/// (before horizontal scrolling is applied).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub x: i64,
    pub y: i64,
    pub button: Button,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn primary(x: i64, y: i64) -> PointerEvent {
        PointerEvent { x, y, button: Button::Primary, modifiers: Modifiers::empty() }
    }

    pub fn with_modifiers(self, modifiers: Modifiers) -> PointerEvent {
        PointerEvent { modifiers, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> KeyEvent {
        KeyEvent { key, modifiers }
    }

    pub fn plain(key: Key) -> KeyEvent {
        KeyEvent { key, modifiers: Modifiers::empty() }
    }

    /// Ctrl+A, ignoring shift.
    pub fn is_select_all(&self) -> bool {
        self.modifiers.contains(Modifiers::CONTROL) && matches!(self.key, Key::Char('a') | Key::Char('A'))
    }
}
