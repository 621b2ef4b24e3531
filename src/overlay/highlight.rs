use super::geometry::Rect;
use super::surface::HostSurface;

/// Decorative boxes over the selected text, one per client-rect fragment.
/// Never patched in place; every sync tears down and rebuilds.
#[derive(Debug, Default)]
pub struct HighlightOverlay {
    boxes: usize,
}

impl HighlightOverlay {
    pub fn sync(&mut self, surface: &mut dyn HostSurface, fragments: &[Rect]) {
        self.remove(surface);
        let boxes: Vec<Rect> = fragments.iter().filter(|r| !r.is_empty()).copied().collect();
        if boxes.is_empty() {
            return;
        }
        surface.mount_highlight_boxes(&boxes);
        self.boxes = boxes.len();
    }

    pub fn remove(&mut self, surface: &mut dyn HostSurface) {
        if self.boxes > 0 {
            surface.remove_highlight_boxes();
            self.boxes = 0;
        }
    }

    pub fn box_count(&self) -> usize {
        self.boxes
    }
}
