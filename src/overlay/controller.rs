use std::time::Instant;

use super::dispatcher::{render_outcome, ActionDispatcher, CompletionTicket, DispatchError};
use super::events::{Command, Key, Modifiers, OverlayEvent};
use super::highlight::HighlightOverlay;
use super::layout::MoveDirection;
use super::panel::PanelController;
use super::selection::{self, Capture, Resync, SelectionSnapshot};
use super::surface::{EventTarget, HostSurface};
use super::trigger::TriggerWidget;
use crate::api::CompletionError;
use crate::config::prompts::ActionKind;
use crate::config::Config;

/// Owns every piece of overlay state for one page. All input goes through
/// [`OverlayController::handle`].
pub struct OverlayController<S: HostSurface> {
    surface: S,
    snapshot: Option<SelectionSnapshot>,
    highlight: HighlightOverlay,
    trigger: TriggerWidget,
    panel: PanelController,
    dispatcher: ActionDispatcher,
    /// Mirror of the panel's editable text area.
    panel_text: String,
    frame_pending: bool,
    resize_pending: bool,
}

impl<S: HostSurface> OverlayController<S> {
    pub fn init(surface: S, config: &Config) -> Self {
        if !config.has_api_key() {
            tracing::warn!("No API key found. Actions will fail until one is set.");
        }
        Self {
            surface,
            snapshot: None,
            highlight: HighlightOverlay::default(),
            trigger: TriggerWidget::default(),
            panel: PanelController::default(),
            dispatcher: ActionDispatcher::new(&config.persona, config.has_api_key()),
            panel_text: String::new(),
            frame_pending: false,
            resize_pending: false,
        }
    }

    /// Remove everything the overlay injected and hand the surface back.
    pub fn teardown(mut self) -> S {
        self.close();
        self.surface
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn snapshot(&self) -> Option<&SelectionSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn panel(&self) -> &PanelController {
        &self.panel
    }

    pub fn trigger(&self) -> &TriggerWidget {
        &self.trigger
    }

    pub fn processing(&self) -> Option<ActionKind> {
        self.dispatcher.processing()
    }

    pub fn handle(&mut self, event: OverlayEvent, now: Instant) -> Vec<Command> {
        self.panel.tick(now);

        match event {
            OverlayEvent::PointerUp { target } => self.on_pointer_up(target, now),
            OverlayEvent::Click { target } => self.on_click(target, now),
            OverlayEvent::KeyDown { key, modifiers } => return self.on_key(key, modifiers),
            OverlayEvent::Scroll => return self.request_frame(),
            OverlayEvent::Resize => {
                self.resize_pending = true;
                return self.request_frame();
            }
            OverlayEvent::AnimationFrame => self.on_frame(now),
            OverlayEvent::Tick => {}
            OverlayEvent::CloseRequested => self.close(),
            OverlayEvent::CopyRequested => self.copy(),
            OverlayEvent::ActionRequested(kind) => return self.run_action(kind),
            OverlayEvent::CustomPromptSubmitted => return self.run_action(ActionKind::Custom),
            OverlayEvent::PanelTextEdited(text) => self.edit_panel_text(text),
            OverlayEvent::PersonaSelected(id) => self.select_persona(&id),
            OverlayEvent::SettingsReloaded { api_key_present } => {
                tracing::info!(api_key_present, "settings reloaded");
                self.dispatcher.set_credential(api_key_present);
            }
            OverlayEvent::CompletionFinished { ticket, outcome } => {
                self.finish_completion(ticket, outcome)
            }
        }
        Vec::new()
    }

    // ------------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------------

    fn on_pointer_up(&mut self, target: EventTarget, now: Instant) {
        if target != EventTarget::Page {
            return;
        }

        let captured = match selection::capture(&mut self.surface) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(error = %e, "selection read failed");
                Capture::Empty
            }
        };

        match captured {
            Capture::Selected { snapshot, fragments } => {
                self.highlight.sync(&mut self.surface, &fragments);
                if self.panel.is_open() {
                    self.panel.activate(&mut self.surface, &snapshot.text, now);
                } else {
                    self.trigger.show(&mut self.surface, &snapshot.rect, now);
                }
                if let Some(old) = self.snapshot.replace(snapshot) {
                    self.surface.release_range(old.range);
                }
            }
            Capture::Empty => {
                self.trigger.hide(&mut self.surface);
                if !self.panel.is_open() {
                    self.clear_selection();
                }
            }
        }
    }

    fn clear_selection(&mut self) {
        self.highlight.remove(&mut self.surface);
        if let Some(old) = self.snapshot.take() {
            self.surface.release_range(old.range);
        }
    }

    fn request_frame(&mut self) -> Vec<Command> {
        if self.frame_pending {
            return Vec::new();
        }
        self.frame_pending = true;
        vec![Command::RequestFrame]
    }

    fn on_frame(&mut self, now: Instant) {
        self.frame_pending = false;
        if std::mem::take(&mut self.resize_pending) {
            self.panel.reflow(&mut self.surface);
        }
        let Some(snapshot) = self.snapshot.as_ref() else {
            return;
        };

        match selection::resync(&self.surface, snapshot) {
            Ok(Resync::InView { bounds, fragments }) => {
                self.highlight.sync(&mut self.surface, &fragments);
                if self.panel.is_open() {
                    self.panel.set_visible(&mut self.surface, true);
                } else if self.trigger.is_shown() {
                    self.trigger.reposition(&mut self.surface, &bounds);
                } else {
                    self.trigger.show(&mut self.surface, &bounds, now);
                }
            }
            Ok(Resync::OutOfView) => {
                self.trigger.hide(&mut self.surface);
                self.highlight.remove(&mut self.surface);
                self.panel.set_visible(&mut self.surface, false);
            }
            Err(e) => {
                tracing::warn!(error = %e, "selection geometry lost");
                self.trigger.hide(&mut self.surface);
                self.highlight.remove(&mut self.surface);
            }
        }
    }

    // ------------------------------------------------------------------------
    // Trigger and panel lifecycle
    // ------------------------------------------------------------------------

    fn on_click(&mut self, target: EventTarget, now: Instant) {
        match target {
            EventTarget::Trigger => self.activate_trigger(now),
            EventTarget::Panel => {}
            EventTarget::Page => {
                if self.panel.accepts_click_outside() {
                    self.close();
                } else if !self.panel.is_open() && self.trigger.accepts_click_outside(now) {
                    self.trigger.hide(&mut self.surface);
                    self.clear_selection();
                }
            }
        }
    }

    fn activate_trigger(&mut self, now: Instant) {
        let Some(snapshot) = self.snapshot.as_ref() else {
            tracing::debug!("trigger activated without a selection");
            return;
        };
        self.trigger.hide(&mut self.surface);
        if self.panel.activate(&mut self.surface, &snapshot.text, now) {
            self.panel_text.clear();
            self.surface.set_panel_persona(self.dispatcher.persona());
        }
    }

    fn close(&mut self) {
        if self.panel.close(&mut self.surface) {
            tracing::debug!("panel closed");
        }
        self.trigger.hide(&mut self.surface);
        self.clear_selection();
        self.dispatcher.finish();
        self.panel_text.clear();
    }

    fn on_key(&mut self, key: Key, modifiers: Modifiers) -> Vec<Command> {
        if key == Key::Escape {
            self.close();
            return Vec::new();
        }
        if !self.panel.is_open() || !modifiers.command() {
            return Vec::new();
        }
        match key {
            Key::Arrow(dir) => self.move_panel(dir),
            Key::Char('k') | Key::Char('K') => self.copy(),
            Key::Enter => return self.run_action(ActionKind::Custom),
            _ => {}
        }
        Vec::new()
    }

    fn move_panel(&mut self, dir: MoveDirection) {
        if let Some(placement) = self.panel.move_to(&mut self.surface, dir) {
            tracing::debug!(?placement, "panel moved");
        }
    }

    // ------------------------------------------------------------------------
    // Panel content
    // ------------------------------------------------------------------------

    fn edit_panel_text(&mut self, text: String) {
        if !self.panel.is_open() {
            return;
        }
        self.panel.content_changed(&mut self.surface, &text);
        self.panel_text = text;
    }

    fn write_panel_text(&mut self, text: String) {
        self.surface.set_panel_text(&text);
        self.panel.content_changed(&mut self.surface, &text);
        self.panel_text = text;
    }

    fn select_persona(&mut self, id: &str) {
        if self.dispatcher.set_persona(id) {
            self.surface.set_panel_persona(id);
        } else {
            tracing::warn!(persona = id, "unknown persona ignored");
        }
    }

    /// Copy the panel text, or the original selection when the panel is empty.
    fn copy(&mut self) {
        let text = if !self.panel_text.trim().is_empty() {
            self.panel_text.clone()
        } else if let Some(snapshot) = self.snapshot.as_ref() {
            snapshot.text.clone()
        } else {
            return;
        };
        if let Err(e) = self.surface.write_clipboard(&text) {
            tracing::warn!(error = %e, "copy failed");
        }
    }

    // ------------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------------

    fn run_action(&mut self, kind: ActionKind) -> Vec<Command> {
        if !self.panel.is_open() {
            return Vec::new();
        }
        let source = self
            .snapshot
            .as_ref()
            .map(|s| s.text.clone())
            .unwrap_or_default();
        let instruction = (kind == ActionKind::Custom).then(|| self.panel_text.clone());

        match self
            .dispatcher
            .begin(kind, &source, instruction.as_deref(), self.panel.generation())
        {
            Ok(pending) => {
                self.surface.set_processing(Some(kind));
                vec![Command::Complete(pending)]
            }
            Err(DispatchError::NoCredential) => {
                self.write_panel_text(render_outcome(Err(CompletionError::NoApiKey)));
                Vec::new()
            }
            Err(e) => {
                tracing::debug!(error = %e, ?kind, "action not dispatched");
                Vec::new()
            }
        }
    }

    fn finish_completion(
        &mut self,
        ticket: CompletionTicket,
        outcome: Result<String, CompletionError>,
    ) {
        let current = self.panel.is_open()
            && self.surface.panel_mounted()
            && ticket.panel_generation == self.panel.generation();
        if !current {
            tracing::debug!(kind = ?ticket.kind, "discarding stale completion");
            return;
        }

        if let Err(e) = &outcome {
            tracing::warn!(error = %e, kind = ?ticket.kind, "action failed");
        }
        self.dispatcher.finish();
        self.surface.set_processing(None);
        self.write_panel_text(render_outcome(outcome));
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
