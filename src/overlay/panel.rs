use std::time::{Duration, Instant};

use super::geometry::{Point, Rect};
use super::layout::{
    next_placement, panel_height_for, panel_rect, placement_origin, top_after_resize,
    MoveDirection, PanelPlacement, PANEL_BASE_HEIGHT,
};
use super::surface::HostSurface;
use super::theme::{detect_theme, Theme};

/// How long a freshly opened panel ignores click-outside.
pub const OPENING_GUARD: Duration = Duration::from_millis(100);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelState {
    Closed,
    /// Open, but the gesture that opened it may still produce a click.
    Opening { until: Instant },
    Open,
}

/// Lifecycle and geometry of the single transformation panel.
#[derive(Debug)]
pub struct PanelController {
    state: PanelState,
    placement: Option<PanelPlacement>,
    origin: Point,
    height: f64,
    theme: Theme,
    visible: bool,
    /// Bumped on every close; completions tagged with an older value are stale.
    generation: u64,
}

impl Default for PanelController {
    fn default() -> Self {
        Self {
            state: PanelState::Closed,
            placement: None,
            origin: Point::default(),
            height: PANEL_BASE_HEIGHT,
            theme: Theme::default(),
            visible: false,
            generation: 0,
        }
    }
}

impl PanelController {
    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != PanelState::Closed
    }

    pub fn accepts_click_outside(&self) -> bool {
        self.state == PanelState::Open
    }

    pub fn placement(&self) -> Option<PanelPlacement> {
        self.placement
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn frame(&self) -> Rect {
        panel_rect(self.origin, self.height)
    }

    /// Open with `source_text`, or retarget the already-open panel. Returns
    /// true only when a new panel was mounted.
    pub fn activate(
        &mut self,
        surface: &mut dyn HostSurface,
        source_text: &str,
        now: Instant,
    ) -> bool {
        if self.is_open() {
            surface.set_panel_source(source_text);
            self.set_visible(surface, true);
            // A reselection is a fresh gesture; its trailing click must not close us.
            self.state = PanelState::Opening { until: now + OPENING_GUARD };
            return false;
        }

        self.theme = match surface.background_samples() {
            Ok(samples) => detect_theme(&samples),
            Err(e) => {
                tracing::warn!(error = %e, "theme detection failed, defaulting to dark");
                Theme::Dark
            }
        };
        self.height = PANEL_BASE_HEIGHT;
        self.placement = None;
        self.origin = placement_origin(PanelPlacement::Center, self.height, surface.viewport());
        surface.mount_panel(self.frame(), self.theme, source_text);
        self.visible = true;
        self.state = PanelState::Opening { until: now + OPENING_GUARD };
        tracing::debug!(theme = self.theme.as_str(), "panel mounted");
        true
    }

    pub fn tick(&mut self, now: Instant) {
        if let PanelState::Opening { until } = self.state {
            if now >= until {
                self.state = PanelState::Open;
            }
        }
    }

    /// Renegotiate height for new content. Returns true if the frame changed.
    pub fn content_changed(&mut self, surface: &mut dyn HostSurface, text: &str) -> bool {
        if !self.is_open() {
            return false;
        }
        let new_height = panel_height_for(text);
        if new_height == self.height {
            return false;
        }
        self.origin.y =
            top_after_resize(self.placement, self.origin.y, new_height, surface.viewport());
        self.height = new_height;
        surface.set_panel_frame(self.frame());
        true
    }

    pub fn move_to(
        &mut self,
        surface: &mut dyn HostSurface,
        dir: MoveDirection,
    ) -> Option<PanelPlacement> {
        if !self.is_open() {
            return None;
        }
        let Some(next) = next_placement(self.placement, dir) else {
            tracing::debug!(?dir, from = ?self.placement, "no move rule");
            return None;
        };
        self.origin = placement_origin(next, self.height, surface.viewport());
        self.placement = Some(next);
        surface.set_panel_frame(self.frame());
        Some(next)
    }

    /// Re-apply a corner placement after the viewport changed size.
    pub fn reflow(&mut self, surface: &mut dyn HostSurface) {
        if !self.is_open() {
            return;
        }
        match self.placement {
            Some(p) if p != PanelPlacement::Center => {
                self.origin = placement_origin(p, self.height, surface.viewport());
                surface.set_panel_frame(self.frame());
            }
            _ => {}
        }
    }

    pub fn set_visible(&mut self, surface: &mut dyn HostSurface, visible: bool) {
        if self.is_open() && self.visible != visible {
            surface.set_panel_visible(visible);
            self.visible = visible;
        }
    }

    pub fn is_visible(&self) -> bool {
        self.is_open() && self.visible
    }

    /// Tear down. Returns false when already closed.
    pub fn close(&mut self, surface: &mut dyn HostSurface) -> bool {
        if !self.is_open() {
            return false;
        }
        surface.unmount_panel();
        self.state = PanelState::Closed;
        self.placement = None;
        self.height = PANEL_BASE_HEIGHT;
        self.visible = false;
        self.generation += 1;
        true
    }
}
