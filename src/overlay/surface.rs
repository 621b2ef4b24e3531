use serde::Deserialize;
use thiserror::Error;

use super::geometry::{Point, Rect, Viewport};
use super::theme::{BackgroundSamples, Theme};
use crate::config::prompts::ActionKind;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Selection API unavailable: {0}")]
    SelectionUnavailable(String),

    #[error("Range {0:?} is no longer attached to the document")]
    RangeDetached(RangeHandle),

    #[error("Computed style unavailable: {0}")]
    StyleUnavailable(String),

    #[error("Clipboard write failed: {0}")]
    Clipboard(String),
}

/// Opaque handle to a cloned range held by the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RangeHandle(pub u64);

/// Live selection as read at pointer-up.
#[derive(Clone, Debug)]
pub struct RawSelection {
    pub text: String,
    pub bounds: Rect,
    pub range: RangeHandle,
}

/// Which injected element (if any) an input event landed on.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventTarget {
    #[default]
    Page,
    Trigger,
    Panel,
}

/// Everything the overlay needs from the host page. Implementations only
/// append and remove their own elements; host content is never touched.
pub trait HostSurface {
    // --- reads ---

    /// Current selection, `None` when nothing is selected.
    fn read_selection(&mut self) -> Result<Option<RawSelection>, SurfaceError>;

    fn range_bounds(&self, range: RangeHandle) -> Result<Rect, SurfaceError>;

    fn range_client_rects(&self, range: RangeHandle) -> Result<Vec<Rect>, SurfaceError>;

    /// Drop a cloned range once no snapshot refers to it. Unknown handles are ignored.
    fn release_range(&mut self, range: RangeHandle);

    fn viewport(&self) -> Viewport;

    fn background_samples(&self) -> Result<BackgroundSamples, SurfaceError>;

    // --- highlight ---

    fn mount_highlight_boxes(&mut self, boxes: &[Rect]);

    fn remove_highlight_boxes(&mut self);

    // --- trigger ---

    fn show_trigger(&mut self, at: Point);

    fn remove_trigger(&mut self);

    // --- panel ---

    fn mount_panel(&mut self, frame: Rect, theme: Theme, source_text: &str);

    fn set_panel_frame(&mut self, frame: Rect);

    fn set_panel_visible(&mut self, visible: bool);

    fn set_panel_source(&mut self, source_text: &str);

    fn set_panel_text(&mut self, text: &str);

    fn set_panel_persona(&mut self, persona_id: &str);

    /// `Some(kind)` disables every action control and marks `kind` as running.
    fn set_processing(&mut self, running: Option<ActionKind>);

    fn unmount_panel(&mut self);

    fn panel_mounted(&self) -> bool;

    // --- misc ---

    fn write_clipboard(&mut self, text: &str) -> Result<(), SurfaceError>;
}
