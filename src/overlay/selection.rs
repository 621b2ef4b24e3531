use super::geometry::Rect;
use super::surface::{HostSurface, RangeHandle, SurfaceError};

/// Text and geometry of a selection at pointer-up time. The live selection
/// dies as soon as the user touches injected UI, so this is what the overlay
/// works from afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionSnapshot {
    pub text: String,
    pub rect: Rect,
    pub range: RangeHandle,
}

pub enum Capture {
    Selected {
        snapshot: SelectionSnapshot,
        fragments: Vec<Rect>,
    },
    Empty,
}

/// Read the live selection. All geometry is read here, before the caller
/// mutates any overlay element.
pub fn capture(surface: &mut dyn HostSurface) -> Result<Capture, SurfaceError> {
    let Some(raw) = surface.read_selection()? else {
        return Ok(Capture::Empty);
    };
    let text = raw.text.trim();
    if text.is_empty() {
        surface.release_range(raw.range);
        return Ok(Capture::Empty);
    }
    let fragments = match surface.range_client_rects(raw.range) {
        Ok(f) => f,
        Err(e) => {
            surface.release_range(raw.range);
            return Err(e);
        }
    };
    Ok(Capture::Selected {
        snapshot: SelectionSnapshot {
            text: text.to_string(),
            rect: raw.bounds,
            range: raw.range,
        },
        fragments,
    })
}

pub enum Resync {
    InView { bounds: Rect, fragments: Vec<Rect> },
    OutOfView,
}

/// Re-query the stored range after a scroll or resize.
pub fn resync(
    surface: &dyn HostSurface,
    snapshot: &SelectionSnapshot,
) -> Result<Resync, SurfaceError> {
    let bounds = surface.range_bounds(snapshot.range)?;
    if surface.viewport().is_out_of_view(&bounds) {
        return Ok(Resync::OutOfView);
    }
    let fragments = surface.range_client_rects(snapshot.range)?;
    Ok(Resync::InView { bounds, fragments })
}
