use std::time::{Duration, Instant};

use super::geometry::{Point, Rect};
use super::layout::trigger_anchor;
use super::surface::HostSurface;

/// The gesture that revealed the trigger must not also dismiss it.
pub const CLICK_OUTSIDE_GRACE: Duration = Duration::from_millis(300);

/// The small glass button shown next to a selection.
#[derive(Debug, Default)]
pub struct TriggerWidget {
    at: Option<Point>,
    shown_since: Option<Instant>,
}

impl TriggerWidget {
    /// Show at the selection's bottom-right corner, or move it there if already
    /// shown. Each call starts a new click-outside grace period.
    pub fn show(&mut self, surface: &mut dyn HostSurface, selection: &Rect, now: Instant) {
        let at = trigger_anchor(selection, surface.viewport());
        surface.show_trigger(at);
        self.shown_since = Some(now);
        self.at = Some(at);
    }

    /// Follow the selection without touching the grace period. No-op when hidden.
    pub fn reposition(&mut self, surface: &mut dyn HostSurface, selection: &Rect) {
        if self.at.is_none() {
            return;
        }
        let at = trigger_anchor(selection, surface.viewport());
        surface.show_trigger(at);
        self.at = Some(at);
    }

    pub fn hide(&mut self, surface: &mut dyn HostSurface) {
        if self.at.take().is_some() {
            surface.remove_trigger();
        }
        self.shown_since = None;
    }

    pub fn is_shown(&self) -> bool {
        self.at.is_some()
    }

    pub fn position(&self) -> Option<Point> {
        self.at
    }

    pub fn accepts_click_outside(&self, now: Instant) -> bool {
        self.shown_since
            .is_some_and(|since| now.saturating_duration_since(since) >= CLICK_OUTSIDE_GRACE)
    }
}
