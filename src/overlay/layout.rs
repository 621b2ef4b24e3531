use serde::{Deserialize, Serialize};

use super::geometry::{Point, Rect, Viewport};

pub const PANEL_WIDTH: f64 = 672.0;
pub const PANEL_BASE_HEIGHT: f64 = 280.0;
pub const PANEL_MAX_HEIGHT: f64 = 600.0;

/// Gap between a corner-anchored panel and the viewport edges.
pub const CORNER_PADDING: f64 = 20.0;

/// Distance from the selection's bottom-right corner to the trigger.
pub const TRIGGER_OFFSET: f64 = 8.0;

// Height growth. The first three lines fit in the base height.
const FREE_LINES: usize = 3;
const LINE_STEP: f64 = 28.0;
const CHAR_THRESHOLD: usize = 200;
const CHAR_RATE: f64 = 0.25;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PanelPlacement {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Center,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expansion {
    Downward,
    Upward,
}

impl PanelPlacement {
    /// Corner adjacency. Only edge-sharing corners are reachable, so the panel
    /// never jumps diagonally.
    pub fn step(self, dir: MoveDirection) -> Option<PanelPlacement> {
        use MoveDirection::*;
        use PanelPlacement::*;
        match (self, dir) {
            (TopRight, Down) => Some(BottomRight),
            (TopRight, Left) => Some(TopLeft),
            (TopLeft, Down) => Some(BottomLeft),
            (TopLeft, Right) => Some(TopRight),
            (BottomLeft, Up) => Some(TopLeft),
            (BottomLeft, Right) => Some(BottomRight),
            (BottomRight, Up) => Some(TopRight),
            (BottomRight, Left) => Some(BottomLeft),
            _ => None,
        }
    }

    pub fn expansion(self) -> Expansion {
        match self {
            PanelPlacement::BottomLeft | PanelPlacement::BottomRight => Expansion::Upward,
            _ => Expansion::Downward,
        }
    }
}

/// Next placement for a move command. The first move from an unmoved panel
/// always lands on the home corner.
pub fn next_placement(
    current: Option<PanelPlacement>,
    dir: MoveDirection,
) -> Option<PanelPlacement> {
    match current {
        None => Some(PanelPlacement::TopRight),
        Some(p) => p.step(dir),
    }
}

/// Top-left coordinate of the panel for a placement.
pub fn placement_origin(placement: PanelPlacement, height: f64, vp: Viewport) -> Point {
    let right_x = vp.width - PANEL_WIDTH - CORNER_PADDING;
    let bottom_y = vp.height - height - CORNER_PADDING;
    match placement {
        PanelPlacement::TopLeft => Point { x: CORNER_PADDING, y: CORNER_PADDING },
        PanelPlacement::TopRight => Point { x: right_x, y: CORNER_PADDING },
        PanelPlacement::BottomLeft => Point { x: CORNER_PADDING, y: bottom_y },
        PanelPlacement::BottomRight => Point { x: right_x, y: bottom_y },
        PanelPlacement::Center => Point {
            x: (vp.width - PANEL_WIDTH) / 2.0,
            y: (vp.height - height) / 2.0,
        },
    }
}

pub fn panel_rect(origin: Point, height: f64) -> Rect {
    Rect::new(origin.x, origin.y, PANEL_WIDTH, height)
}

/// Panel height for the given content:
/// `clamp(base + max(0, lines-3)*step + max(0, chars-threshold)*rate, base, max)`.
pub fn panel_height_for(text: &str) -> f64 {
    let lines = text.split('\n').count();
    let chars = text.chars().count();
    let grown = PANEL_BASE_HEIGHT
        + lines.saturating_sub(FREE_LINES) as f64 * LINE_STEP
        + chars.saturating_sub(CHAR_THRESHOLD) as f64 * CHAR_RATE;
    grown.round().clamp(PANEL_BASE_HEIGHT, PANEL_MAX_HEIGHT)
}

/// New top edge after a height change. Bottom-anchored panels keep their
/// bottom edge on the padding line; everything else keeps its top.
pub fn top_after_resize(
    placement: Option<PanelPlacement>,
    current_top: f64,
    new_height: f64,
    vp: Viewport,
) -> f64 {
    match placement.map(PanelPlacement::expansion) {
        Some(Expansion::Upward) => vp.height - new_height - CORNER_PADDING,
        _ => current_top,
    }
}

/// Trigger anchor for a selection rect. Degenerate rects fall back to the viewport center.
pub fn trigger_anchor(selection: &Rect, vp: Viewport) -> Point {
    if selection.is_degenerate() {
        return vp.center();
    }
    Point {
        x: selection.right + TRIGGER_OFFSET,
        y: selection.bottom + TRIGGER_OFFSET,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VP: Viewport = Viewport { width: 1440.0, height: 900.0 };

    #[test]
    fn test_move_round_trip() {
        let mut at = None;
        let mut visited = Vec::new();
        for dir in [
            MoveDirection::Up, // any direction goes home first
            MoveDirection::Down,
            MoveDirection::Left,
            MoveDirection::Up,
            MoveDirection::Right,
        ] {
            if let Some(next) = next_placement(at, dir) {
                at = Some(next);
                visited.push(next);
            }
        }
        assert_eq!(
            visited,
            vec![
                PanelPlacement::TopRight,
                PanelPlacement::BottomRight,
                PanelPlacement::BottomLeft,
                PanelPlacement::TopLeft,
                PanelPlacement::TopRight,
            ]
        );
    }

    #[test]
    fn test_no_diagonal_moves() {
        assert_eq!(PanelPlacement::TopRight.step(MoveDirection::Up), None);
        assert_eq!(PanelPlacement::TopRight.step(MoveDirection::Right), None);
        assert_eq!(PanelPlacement::BottomLeft.step(MoveDirection::Down), None);
        assert_eq!(PanelPlacement::Center.step(MoveDirection::Left), None);
    }

    #[test]
    fn test_corner_origins() {
        let h = PANEL_BASE_HEIGHT;
        assert_eq!(
            placement_origin(PanelPlacement::TopRight, h, VP),
            Point { x: 1440.0 - 672.0 - 20.0, y: 20.0 }
        );
        assert_eq!(
            placement_origin(PanelPlacement::BottomLeft, h, VP),
            Point { x: 20.0, y: 900.0 - 280.0 - 20.0 }
        );
        assert_eq!(
            placement_origin(PanelPlacement::Center, h, VP),
            Point { x: 384.0, y: 310.0 }
        );
    }

    #[test]
    fn test_height_formula() {
        assert_eq!(panel_height_for(""), PANEL_BASE_HEIGHT);
        assert_eq!(panel_height_for("a\nb\nc"), PANEL_BASE_HEIGHT);
        assert_eq!(panel_height_for("a\nb\nc\nd\ne"), PANEL_BASE_HEIGHT + 2.0 * 28.0);

        let long = "x".repeat(400);
        assert_eq!(panel_height_for(&long), PANEL_BASE_HEIGHT + 50.0);

        let huge = "line\n".repeat(100);
        assert_eq!(panel_height_for(&huge), PANEL_MAX_HEIGHT);
    }

    #[test]
    fn test_height_monotonic() {
        let mut prev = 0.0;
        for lines in 0..40 {
            let h = panel_height_for(&"ab\n".repeat(lines));
            assert!(h >= prev, "height shrank at {lines} lines");
            prev = h;
        }
        prev = 0.0;
        for chars in (0..2000).step_by(37) {
            let h = panel_height_for(&"z".repeat(chars));
            assert!(h >= prev, "height shrank at {chars} chars");
            prev = h;
        }
    }

    #[test]
    fn test_resize_anchoring() {
        let top = top_after_resize(Some(PanelPlacement::BottomRight), 600.0, 400.0, VP);
        assert_eq!(top, 900.0 - 400.0 - 20.0);
        assert_eq!(top_after_resize(Some(PanelPlacement::TopLeft), 20.0, 400.0, VP), 20.0);
        assert_eq!(top_after_resize(None, 310.0, 400.0, VP), 310.0);
    }

    #[test]
    fn test_trigger_anchor() {
        let sel = Rect::new(100.0, 200.0, 150.0, 20.0);
        assert_eq!(trigger_anchor(&sel, VP), Point { x: 258.0, y: 228.0 });
        assert_eq!(trigger_anchor(&Rect::default(), VP), Point { x: 720.0, y: 450.0 });
    }
}
