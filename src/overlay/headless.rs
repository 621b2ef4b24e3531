//! In-memory page model implementing [`HostSurface`].
//!
//! Selection fragments are stored in document coordinates and projected into
//! client space through the current scroll offset, so scrolling moves them the
//! way a real layout engine would. Used by `replay` and by the tests.

use std::collections::HashMap;

use serde::Serialize;

use super::geometry::{Point, Rect, Viewport};
use super::surface::{HostSurface, RangeHandle, RawSelection, SurfaceError};
use super::theme::{BackgroundSamples, Theme};
use crate::config::prompts::ActionKind;

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct PanelView {
    pub frame: Rect,
    pub theme: Theme,
    pub source_text: String,
    pub text: String,
    pub persona: String,
    pub visible: bool,
    pub processing: Option<ActionKind>,
}

#[derive(Serialize, Clone, Debug, Default)]
pub struct PageCounters {
    pub trigger_mounts: usize,
    pub panel_mounts: usize,
    pub highlight_rebuilds: usize,
}

#[derive(Serialize, Debug)]
pub struct HeadlessPage {
    viewport: Viewport,
    scroll: Point,
    #[serde(skip)]
    live_selection: Option<(String, Vec<Rect>)>,
    #[serde(skip)]
    ranges: HashMap<u64, Vec<Rect>>,
    #[serde(skip)]
    next_range: u64,
    #[serde(skip)]
    selection_broken: bool,
    #[serde(skip)]
    backgrounds: BackgroundSamples,
    pub highlight_boxes: Vec<Rect>,
    pub trigger: Option<Point>,
    pub panel: Option<PanelView>,
    pub clipboard: Option<String>,
    pub counters: PageCounters,
}

impl HeadlessPage {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            scroll: Point::default(),
            live_selection: None,
            ranges: HashMap::new(),
            next_range: 1,
            selection_broken: false,
            backgrounds: BackgroundSamples {
                body: Some("rgb(255, 255, 255)".to_string()),
                html: None,
                containers: Vec::new(),
            },
            highlight_boxes: Vec::new(),
            trigger: None,
            panel: None,
            clipboard: None,
            counters: PageCounters::default(),
        }
    }

    /// Select `text` laid out over `fragments` (document coordinates).
    pub fn select(&mut self, text: &str, fragments: Vec<Rect>) {
        self.live_selection = Some((text.to_string(), fragments));
    }

    pub fn clear_selection(&mut self) {
        self.live_selection = None;
    }

    /// Make the next selection reads fail, like a throwing selection API.
    pub fn break_selection_api(&mut self, broken: bool) {
        self.selection_broken = broken;
    }

    pub fn scroll_by(&mut self, dx: f64, dy: f64) {
        self.scroll.x += dx;
        self.scroll.y += dy;
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn set_backgrounds(&mut self, samples: BackgroundSamples) {
        self.backgrounds = samples;
    }

    /// Cloned ranges the overlay has not released yet.
    pub fn live_ranges(&self) -> usize {
        self.ranges.len()
    }

    fn to_client(&self, doc: &Rect) -> Rect {
        doc.translated(-self.scroll.x, -self.scroll.y)
    }
}

impl HostSurface for HeadlessPage {
    fn read_selection(&mut self) -> Result<Option<RawSelection>, SurfaceError> {
        if self.selection_broken {
            return Err(SurfaceError::SelectionUnavailable(
                "getSelection() threw".to_string(),
            ));
        }
        let Some((text, fragments)) = self.live_selection.clone() else {
            return Ok(None);
        };
        let client: Vec<Rect> = fragments.iter().map(|r| self.to_client(r)).collect();
        let range = RangeHandle(self.next_range);
        self.next_range += 1;
        self.ranges.insert(range.0, fragments);
        Ok(Some(RawSelection {
            text,
            bounds: Rect::union_of(&client),
            range,
        }))
    }

    fn range_bounds(&self, range: RangeHandle) -> Result<Rect, SurfaceError> {
        Ok(Rect::union_of(&self.range_client_rects(range)?))
    }

    fn range_client_rects(&self, range: RangeHandle) -> Result<Vec<Rect>, SurfaceError> {
        let fragments = self
            .ranges
            .get(&range.0)
            .ok_or(SurfaceError::RangeDetached(range))?;
        Ok(fragments.iter().map(|r| self.to_client(r)).collect())
    }

    fn release_range(&mut self, range: RangeHandle) {
        self.ranges.remove(&range.0);
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn background_samples(&self) -> Result<BackgroundSamples, SurfaceError> {
        Ok(self.backgrounds.clone())
    }

    fn mount_highlight_boxes(&mut self, boxes: &[Rect]) {
        self.highlight_boxes.extend_from_slice(boxes);
        self.counters.highlight_rebuilds += 1;
    }

    fn remove_highlight_boxes(&mut self) {
        self.highlight_boxes.clear();
    }

    fn show_trigger(&mut self, at: Point) {
        if self.trigger.is_none() {
            self.counters.trigger_mounts += 1;
        }
        self.trigger = Some(at);
    }

    fn remove_trigger(&mut self) {
        self.trigger = None;
    }

    fn mount_panel(&mut self, frame: Rect, theme: Theme, source_text: &str) {
        self.counters.panel_mounts += 1;
        self.panel = Some(PanelView {
            frame,
            theme,
            source_text: source_text.to_string(),
            text: String::new(),
            persona: "default".to_string(),
            visible: true,
            processing: None,
        });
    }

    fn set_panel_frame(&mut self, frame: Rect) {
        if let Some(panel) = self.panel.as_mut() {
            panel.frame = frame;
        }
    }

    fn set_panel_visible(&mut self, visible: bool) {
        if let Some(panel) = self.panel.as_mut() {
            panel.visible = visible;
        }
    }

    fn set_panel_source(&mut self, source_text: &str) {
        if let Some(panel) = self.panel.as_mut() {
            panel.source_text = source_text.to_string();
        }
    }

    fn set_panel_text(&mut self, text: &str) {
        if let Some(panel) = self.panel.as_mut() {
            panel.text = text.to_string();
        }
    }

    fn set_panel_persona(&mut self, persona_id: &str) {
        if let Some(panel) = self.panel.as_mut() {
            panel.persona = persona_id.to_string();
        }
    }

    fn set_processing(&mut self, running: Option<ActionKind>) {
        if let Some(panel) = self.panel.as_mut() {
            panel.processing = running;
        }
    }

    fn unmount_panel(&mut self) {
        self.panel = None;
    }

    fn panel_mounted(&self) -> bool {
        self.panel.is_some()
    }

    fn write_clipboard(&mut self, text: &str) -> Result<(), SurfaceError> {
        self.clipboard = Some(text.to_string());
        Ok(())
    }
}
