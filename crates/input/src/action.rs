use crate::source::{Button, ButtonSet};

/// A runtime action produced by input. The frame controller consumes actions,
/// never raw buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Stop the frame loop after the current frame.
    Quit,
    /// Switch between indexed and array-order geometry submission.
    ToggleSubmissionMode,
    /// Switch alpha blending on or off.
    ToggleBlending,
}

impl Action {
    /// Action bound to a controller button.
    pub fn for_button(button: Button) -> Self {
        match button {
            Button::Start => Self::Quit,
            Button::A => Self::ToggleSubmissionMode,
            Button::B => Self::ToggleBlending,
        }
    }

    /// Actions for every button in `pressed`, in [`Button::ALL`] order.
    pub fn from_pressed(pressed: ButtonSet) -> Vec<Self> {
        Button::ALL
            .iter()
            .filter(|b| pressed.contains(**b))
            .map(|b| Self::for_button(*b))
            .collect()
    }
}
