use super::dispatcher::{CompletionTicket, PendingCompletion};
use super::layout::MoveDirection;
use super::surface::EventTarget;
use crate::api::CompletionError;
use crate::config::prompts::ActionKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Arrow(MoveDirection),
    Char(char),
}

/// Ctrl and Cmd are interchangeable for every shortcut.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { ctrl: false, meta: false };
    pub const CTRL: Modifiers = Modifiers { ctrl: true, meta: false };

    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Inputs to the overlay, from the host page and from the completion worker.
#[derive(Debug)]
pub enum OverlayEvent {
    PointerUp { target: EventTarget },
    Click { target: EventTarget },
    KeyDown { key: Key, modifiers: Modifiers },
    Scroll,
    Resize,
    AnimationFrame,
    /// Timer wake-up; lets the opening guard expire without other input.
    Tick,
    CloseRequested,
    CopyRequested,
    ActionRequested(ActionKind),
    CustomPromptSubmitted,
    PanelTextEdited(String),
    PersonaSelected(String),
    SettingsReloaded { api_key_present: bool },
    CompletionFinished {
        ticket: CompletionTicket,
        outcome: Result<String, CompletionError>,
    },
}

/// Work the host must do on the controller's behalf.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Deliver one `AnimationFrame` event on the next frame.
    RequestFrame,
    /// Run the completion and report back with `CompletionFinished`.
    Complete(PendingCompletion),
}
