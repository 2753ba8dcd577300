#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    A,
    B,
    C,
    Enter,
    Escape,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
}

const KEY_COUNT: usize = 13;

impl Key {
    const fn index(self) -> usize {
        match self {
            Key::Up => 0,
            Key::Down => 1,
            Key::Left => 2,
            Key::Right => 3,
            Key::A => 4,
            Key::B => 5,
            Key::C => 6,
            Key::Enter => 7,
            Key::Escape => 8,
            Key::Digit1 => 9,
            Key::Digit2 => 10,
            Key::Digit3 => 11,
            Key::Digit4 => 12,
        }
    }

    /// Zero-based slot for the number row keys.
    pub const fn digit_index(self) -> Option<usize> {
        match self {
            Key::Digit1 => Some(0),
            Key::Digit2 => Some(1),
            Key::Digit3 => Some(2),
            Key::Digit4 => Some(3),
            _ => None,
        }
    }

    pub const fn is_confirm(self) -> bool {
        matches!(self, Key::A | Key::Enter)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Pressed,
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub state: KeyState,
}

impl KeyEvent {
    pub const fn pressed(key: Key) -> Self {
        Self {
            key,
            state: KeyState::Pressed,
        }
    }

    pub const fn released(key: Key) -> Self {
        Self {
            key,
            state: KeyState::Released,
        }
    }

    pub fn is_press(&self) -> bool {
        self.state == KeyState::Pressed
    }
}

/// Tracks which keys are physically down so OS auto-repeat never produces a
/// second press for a held key, and a release is only reported for a key
/// that was reported pressed.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct KeyStates {
    down: [bool; KEY_COUNT],
}

impl KeyStates {
    pub(crate) fn filter(&mut self, key: Key, is_pressed: bool) -> Option<KeyEvent> {
        let slot = &mut self.down[key.index()];
        match (is_pressed, *slot) {
            (true, false) => {
                *slot = true;
                Some(KeyEvent::pressed(key))
            }
            (false, true) => {
                *slot = false;
                Some(KeyEvent::released(key))
            }
            _ => None,
        }
    }

    /// Produces release events for every held key, used when the window
    /// loses focus and release events may never arrive.
    pub(crate) fn release_all(&mut self) -> Vec<KeyEvent> {
        ALL_KEYS
            .iter()
            .filter_map(|key| self.filter(*key, false))
            .collect()
    }
}

const ALL_KEYS: [Key; KEY_COUNT] = [
    Key::Up,
    Key::Down,
    Key::Left,
    Key::Right,
    Key::A,
    Key::B,
    Key::C,
    Key::Enter,
    Key::Escape,
    Key::Digit1,
    Key::Digit2,
    Key::Digit3,
    Key::Digit4,
];
