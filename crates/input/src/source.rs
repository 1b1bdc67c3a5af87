use std::collections::VecDeque;

/// Controller buttons the demo reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Start,
    A,
    B,
}

impl Button {
    pub const ALL: [Button; 3] = [Button::Start, Button::A, Button::B];

    fn bit(self) -> u8 {
        match self {
            Self::Start => 1 << 0,
            Self::A => 1 << 1,
            Self::B => 1 << 2,
        }
    }
}

/// Set of buttons held down at one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ButtonSet(u8);

impl ButtonSet {
    pub const EMPTY: ButtonSet = ButtonSet(0);

    pub fn contains(self, button: Button) -> bool {
        self.0 & button.bit() != 0
    }

    pub fn with(self, button: Button) -> Self {
        Self(self.0 | button.bit())
    }

    pub fn without(self, button: Button) -> Self {
        Self(self.0 & !button.bit())
    }

    pub fn insert(&mut self, button: Button) {
        *self = self.with(button);
    }

    pub fn remove(&mut self, button: Button) {
        *self = self.without(button);
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Buttons held now that were not held in `previous`.
    pub fn pressed_since(self, previous: ButtonSet) -> ButtonSet {
        ButtonSet(self.0 & !previous.0)
    }
}

/// Turns successive polls into press transitions.
#[derive(Debug, Clone, Default)]
pub struct EdgeDetector {
    previous: ButtonSet,
}

impl EdgeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buttons newly pressed since the last update.
    pub fn update(&mut self, current: ButtonSet) -> ButtonSet {
        let pressed = current.pressed_since(self.previous);
        if !pressed.is_empty() {
            tracing::debug!(?pressed, "button press");
        }
        self.previous = current;
        pressed
    }
}

/// Anything that can be polled once per frame for held buttons.
pub trait InputSource {
    /// Held buttons, or `None` when no controller is attached.
    fn poll(&mut self) -> Option<ButtonSet>;
}

/// Source with no device attached.
#[derive(Debug, Default)]
pub struct NoInput;

impl InputSource for NoInput {
    fn poll(&mut self) -> Option<ButtonSet> {
        None
    }
}

/// Buttons held according to externally fed press/release events, such as
/// keyboard keys standing in for a controller.
#[derive(Debug, Default)]
pub struct HeldButtons {
    held: ButtonSet,
}

impl HeldButtons {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, button: Button, pressed: bool) {
        if pressed {
            self.held.insert(button);
        } else {
            self.held.remove(button);
        }
    }

    pub fn held(&self) -> ButtonSet {
        self.held
    }
}

impl InputSource for HeldButtons {
    fn poll(&mut self) -> Option<ButtonSet> {
        Some(self.held)
    }
}

/// Replays a fixed sequence of polls, then reports an idle controller.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    frames: VecDeque<ButtonSet>,
}

impl ScriptedInput {
    pub fn new(frames: impl IntoIterator<Item = ButtonSet>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Option<ButtonSet> {
        Some(self.frames.pop_front().unwrap_or(ButtonSet::EMPTY))
    }
}
