use std::time::Duration;

use super::*;
use crate::config::prompts::{resolve_system_prompt, GRAMMAR_PROMPT};
use crate::overlay::dispatcher::PendingCompletion;
use crate::overlay::geometry::{Point, Rect, Viewport};
use crate::overlay::headless::HeadlessPage;
use crate::overlay::layout::{PanelPlacement, PANEL_BASE_HEIGHT};
use crate::overlay::panel::PanelState;

const VP: Viewport = Viewport { width: 1440.0, height: 900.0 };

struct Harness {
    ctl: OverlayController<HeadlessPage>,
    now: Instant,
}

impl Harness {
    fn new() -> Self {
        let config = Config {
            api_key: "sk-test".to_string(),
            ..Config::default()
        };
        Self::with_config(&config)
    }

    fn with_config(config: &Config) -> Self {
        Self {
            ctl: OverlayController::init(HeadlessPage::new(VP), config),
            now: Instant::now(),
        }
    }

    fn advance(&mut self, ms: u64) {
        self.now += Duration::from_millis(ms);
    }

    fn send(&mut self, event: OverlayEvent) -> Vec<Command> {
        self.ctl.handle(event, self.now)
    }

    fn page(&self) -> &HeadlessPage {
        self.ctl.surface()
    }

    /// Drag-select `text` over `fragments`: pointer-up, then the click of the same gesture.
    fn select(&mut self, text: &str, fragments: Vec<Rect>) {
        self.ctl.surface_mut().select(text, fragments);
        self.send(OverlayEvent::PointerUp { target: EventTarget::Page });
        self.send(OverlayEvent::Click { target: EventTarget::Page });
    }

    fn select_sentence(&mut self) {
        self.select("i has a cat", vec![Rect::new(100.0, 200.0, 150.0, 20.0)]);
    }

    /// Select, wait out the grace periods, open the panel and let it settle.
    fn open_panel(&mut self) {
        self.select_sentence();
        self.advance(10);
        self.send(OverlayEvent::Click { target: EventTarget::Trigger });
        self.advance(150);
        self.send(OverlayEvent::Tick);
    }

    fn ctrl(&mut self, key: Key) -> Vec<Command> {
        self.send(OverlayEvent::KeyDown { key, modifiers: Modifiers::CTRL })
    }

    fn frame(&mut self) {
        self.send(OverlayEvent::AnimationFrame);
    }

    fn panel_text(&self) -> String {
        self.page().panel.as_ref().map(|p| p.text.clone()).unwrap_or_default()
    }
}

fn pending(commands: Vec<Command>) -> PendingCompletion {
    match commands.as_slice() {
        [Command::Complete(p)] => p.clone(),
        other => panic!("expected one completion, got {other:?}"),
    }
}

// ----------------------------------------------------------------------------
// Selection and trigger
// ----------------------------------------------------------------------------

#[test]
fn test_selection_shows_one_trigger_at_corner() {
    let mut h = Harness::new();
    h.select_sentence();

    assert_eq!(h.page().trigger, Some(Point { x: 258.0, y: 228.0 }));
    assert_eq!(h.page().counters.trigger_mounts, 1);
    assert_eq!(h.page().highlight_boxes.len(), 1);
    assert_eq!(h.ctl.snapshot().unwrap().text, "i has a cat");

    h.advance(500);
    h.select("other words", vec![Rect::new(300.0, 400.0, 80.0, 20.0)]);
    assert_eq!(h.page().counters.trigger_mounts, 1);
    assert_eq!(h.page().trigger, Some(Point { x: 388.0, y: 428.0 }));
}

#[test]
fn test_degenerate_rect_falls_back_to_center() {
    let mut h = Harness::new();
    h.select("hidden text", vec![Rect::new(0.0, 0.0, 0.0, 0.0)]);
    assert_eq!(h.page().trigger, Some(Point { x: 720.0, y: 450.0 }));
}

#[test]
fn test_selection_api_failure_shows_nothing() {
    let mut h = Harness::new();
    h.ctl.surface_mut().break_selection_api(true);
    h.select_sentence();
    assert!(h.page().trigger.is_none());
    assert!(h.page().highlight_boxes.is_empty());
    assert!(h.ctl.snapshot().is_none());
}

#[test]
fn test_empty_selection_clears() {
    let mut h = Harness::new();
    h.select_sentence();
    h.ctl.surface_mut().clear_selection();
    h.send(OverlayEvent::PointerUp { target: EventTarget::Page });
    assert!(h.page().trigger.is_none());
    assert!(h.page().highlight_boxes.is_empty());
    assert!(h.ctl.snapshot().is_none());
}

#[test]
fn test_pointer_up_inside_widgets_ignored() {
    let mut h = Harness::new();
    h.select_sentence();
    h.ctl.surface_mut().clear_selection();
    h.send(OverlayEvent::PointerUp { target: EventTarget::Trigger });
    assert!(h.page().trigger.is_some());
}

#[test]
fn test_trigger_click_outside_after_grace() {
    let mut h = Harness::new();
    h.select_sentence();
    assert!(h.page().trigger.is_some(), "same-gesture click must not dismiss");

    h.advance(400);
    h.send(OverlayEvent::Click { target: EventTarget::Page });
    assert!(h.page().trigger.is_none());
    assert!(h.page().panel.is_none());
    assert!(h.page().highlight_boxes.is_empty());
}

// ----------------------------------------------------------------------------
// Panel lifecycle
// ----------------------------------------------------------------------------

#[test]
fn test_activation_opens_single_panel() {
    let mut h = Harness::new();
    h.select_sentence();
    h.send(OverlayEvent::Click { target: EventTarget::Trigger });
    h.send(OverlayEvent::Click { target: EventTarget::Trigger });

    assert_eq!(h.page().counters.panel_mounts, 1);
    assert!(h.page().trigger.is_none());
    let panel = h.page().panel.as_ref().unwrap();
    assert_eq!(panel.source_text, "i has a cat");
    assert_eq!(panel.frame.height, PANEL_BASE_HEIGHT);
}

#[test]
fn test_opening_guard_swallows_same_gesture_click() {
    let mut h = Harness::new();
    h.select_sentence();
    h.send(OverlayEvent::Click { target: EventTarget::Trigger });
    h.advance(20);
    h.send(OverlayEvent::Click { target: EventTarget::Page });
    assert!(h.page().panel.is_some());

    h.advance(200);
    h.send(OverlayEvent::Click { target: EventTarget::Page });
    assert!(h.page().panel.is_none());
    assert_eq!(h.ctl.panel().state(), PanelState::Closed);
}

#[test]
fn test_click_inside_panel_keeps_it() {
    let mut h = Harness::new();
    h.open_panel();
    h.send(OverlayEvent::Click { target: EventTarget::Panel });
    assert!(h.page().panel.is_some());
}

#[test]
fn test_escape_tears_everything_down() {
    let mut h = Harness::new();
    h.open_panel();
    h.ctrl(Key::Arrow(MoveDirection::Up));
    h.send(OverlayEvent::PanelTextEdited("a\nb\nc\nd\ne\nf".to_string()));

    h.send(OverlayEvent::KeyDown { key: Key::Escape, modifiers: Modifiers::NONE });
    assert!(h.page().panel.is_none());
    assert!(h.page().highlight_boxes.is_empty());
    assert!(h.ctl.snapshot().is_none());
    assert_eq!(h.ctl.panel().placement(), None);
    assert_eq!(h.ctl.panel().height(), PANEL_BASE_HEIGHT);

    // closing again is harmless
    h.send(OverlayEvent::CloseRequested);
    h.send(OverlayEvent::KeyDown { key: Key::Escape, modifiers: Modifiers::NONE });
    assert!(h.page().panel.is_none());
}

#[test]
fn test_reselection_retargets_open_panel() {
    let mut h = Harness::new();
    h.open_panel();
    h.select("second sentence", vec![Rect::new(50.0, 600.0, 140.0, 20.0)]);

    assert_eq!(h.page().counters.panel_mounts, 1);
    assert!(h.page().panel.is_some(), "trailing click of the reselect must not close");
    assert_eq!(h.page().panel.as_ref().unwrap().source_text, "second sentence");
    assert!(h.page().trigger.is_none());
    assert_eq!(h.page().highlight_boxes, vec![Rect::new(50.0, 600.0, 140.0, 20.0)]);
}

#[test]
fn test_move_round_trip() {
    let mut h = Harness::new();
    h.open_panel();

    let mut visited = Vec::new();
    for dir in [
        MoveDirection::Right,
        MoveDirection::Down,
        MoveDirection::Left,
        MoveDirection::Up,
        MoveDirection::Right,
    ] {
        h.ctrl(Key::Arrow(dir));
        visited.push(h.ctl.panel().placement().unwrap());
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
    assert_eq!(
        h.page().panel.as_ref().unwrap().frame,
        Rect::new(1440.0 - 672.0 - 20.0, 20.0, 672.0, PANEL_BASE_HEIGHT)
    );
}

#[test]
fn test_arrows_without_modifier_ignored() {
    let mut h = Harness::new();
    h.open_panel();
    h.send(OverlayEvent::KeyDown {
        key: Key::Arrow(MoveDirection::Down),
        modifiers: Modifiers::NONE,
    });
    assert_eq!(h.ctl.panel().placement(), None);
}

#[test]
fn test_bottom_anchored_panel_grows_upward() {
    let mut h = Harness::new();
    h.open_panel();
    h.ctrl(Key::Arrow(MoveDirection::Down));
    h.ctrl(Key::Arrow(MoveDirection::Down));
    h.send(OverlayEvent::PanelTextEdited("x\n".repeat(9)));

    let frame = h.page().panel.as_ref().unwrap().frame;
    assert_eq!(frame.bottom, VP.height - 20.0);
    assert_eq!(frame.height, PANEL_BASE_HEIGHT + 7.0 * 28.0);
}

// ----------------------------------------------------------------------------
// Scroll and resize
// ----------------------------------------------------------------------------

#[test]
fn test_scroll_is_throttled_to_one_frame() {
    let mut h = Harness::new();
    h.select_sentence();
    assert_eq!(h.send(OverlayEvent::Scroll), vec![Command::RequestFrame]);
    assert!(h.send(OverlayEvent::Scroll).is_empty());
    assert!(h.send(OverlayEvent::Resize).is_empty());
    h.frame();
    assert_eq!(h.send(OverlayEvent::Scroll), vec![Command::RequestFrame]);
}

#[test]
fn test_scroll_resyncs_highlight_and_trigger() {
    let mut h = Harness::new();
    h.select(
        "two line selection",
        vec![Rect::new(400.0, 300.0, 200.0, 18.0), Rect::new(20.0, 318.0, 100.0, 18.0)],
    );
    h.ctl.surface_mut().scroll_by(0.0, 120.0);
    h.send(OverlayEvent::Scroll);
    h.frame();

    assert_eq!(
        h.page().highlight_boxes,
        vec![Rect::new(400.0, 180.0, 200.0, 18.0), Rect::new(20.0, 198.0, 100.0, 18.0)]
    );
    assert_eq!(h.page().trigger, Some(Point { x: 608.0, y: 224.0 }));
}

#[test]
fn test_scroll_out_of_view_hides_and_returns() {
    let mut h = Harness::new();
    h.open_panel();

    h.ctl.surface_mut().scroll_by(0.0, 400.0);
    h.send(OverlayEvent::Scroll);
    h.frame();
    assert!(h.page().highlight_boxes.is_empty());
    assert!(h.page().trigger.is_none());
    assert!(!h.page().panel.as_ref().unwrap().visible);

    h.ctl.surface_mut().scroll_by(0.0, -400.0);
    h.send(OverlayEvent::Scroll);
    h.frame();
    assert_eq!(h.page().highlight_boxes.len(), 1);
    assert!(h.page().panel.as_ref().unwrap().visible);
    assert_eq!(h.page().counters.panel_mounts, 1);
}

#[test]
fn test_scroll_out_of_view_hides_trigger() {
    let mut h = Harness::new();
    h.select_sentence();
    h.ctl.surface_mut().scroll_by(0.0, -800.0);
    h.send(OverlayEvent::Scroll);
    h.frame();
    assert!(h.page().trigger.is_none());
    assert!(h.page().highlight_boxes.is_empty());
}

#[test]
fn test_resize_keeps_corner() {
    let mut h = Harness::new();
    h.open_panel();
    h.ctrl(Key::Arrow(MoveDirection::Up));
    h.ctl.surface_mut().resize(Viewport { width: 1000.0, height: 700.0 });
    h.send(OverlayEvent::Resize);
    h.frame();
    assert_eq!(h.page().panel.as_ref().unwrap().frame.left, 1000.0 - 672.0 - 20.0);
}

// ----------------------------------------------------------------------------
// Actions
// ----------------------------------------------------------------------------

#[test]
fn test_grammar_dispatch_and_failure() {
    let mut h = Harness::new();
    h.open_panel();

    let p = pending(h.send(OverlayEvent::ActionRequested(ActionKind::Grammar)));
    assert_eq!(p.request.system_prompt, GRAMMAR_PROMPT);
    assert_eq!(p.request.user_message, "i has a cat");
    assert_eq!(h.page().panel.as_ref().unwrap().processing, Some(ActionKind::Grammar));

    // everything is disabled while one request is in flight
    assert!(h.send(OverlayEvent::ActionRequested(ActionKind::Improve)).is_empty());

    h.send(OverlayEvent::CompletionFinished {
        ticket: p.ticket,
        outcome: Err(CompletionError::Http("timed out".to_string())),
    });
    assert!(h.panel_text().starts_with("Error:"));
    assert_eq!(h.page().panel.as_ref().unwrap().processing, None);
    assert_eq!(h.ctl.processing(), None);
}

#[test]
fn test_success_replaces_text_and_grows() {
    let mut h = Harness::new();
    h.open_panel();
    let p = pending(h.send(OverlayEvent::ActionRequested(ActionKind::Improve)));
    let result = "A much longer rewrite.\n".repeat(6);
    h.send(OverlayEvent::CompletionFinished {
        ticket: p.ticket,
        outcome: Ok(result.clone()),
    });
    assert_eq!(h.panel_text(), result);
    assert!(h.page().panel.as_ref().unwrap().frame.height > PANEL_BASE_HEIGHT);
}

#[test]
fn test_stale_completion_discarded() {
    let mut h = Harness::new();
    h.open_panel();
    let p = pending(h.send(OverlayEvent::ActionRequested(ActionKind::Grammar)));
    h.send(OverlayEvent::CloseRequested);

    h.send(OverlayEvent::CompletionFinished {
        ticket: p.ticket,
        outcome: Ok("I have a cat.".to_string()),
    });
    assert!(h.page().panel.is_none());

    // a new panel is not polluted by the old result either
    h.advance(500);
    h.open_panel();
    h.send(OverlayEvent::CompletionFinished {
        ticket: p.ticket,
        outcome: Ok("I have a cat.".to_string()),
    });
    assert_eq!(h.panel_text(), "");
    assert!(h.send(OverlayEvent::ActionRequested(ActionKind::Shorter)).len() == 1);
}

#[test]
fn test_missing_credential_fails_inline() {
    let mut h = Harness::with_config(&Config::default());
    h.open_panel();
    assert!(h.send(OverlayEvent::ActionRequested(ActionKind::Grammar)).is_empty());
    assert!(h.panel_text().starts_with("Error: No API key"));
    assert_eq!(h.ctl.processing(), None);

    h.send(OverlayEvent::SettingsReloaded { api_key_present: true });
    assert_eq!(h.send(OverlayEvent::ActionRequested(ActionKind::Grammar)).len(), 1);
}

#[test]
fn test_custom_prompt_via_shortcut() {
    let mut h = Harness::new();
    h.open_panel();

    // nothing typed yet
    assert!(h.ctrl(Key::Enter).is_empty());

    h.send(OverlayEvent::PanelTextEdited("  make it a question ".to_string()));
    h.send(OverlayEvent::PersonaSelected("my-boss".to_string()));
    let p = pending(h.ctrl(Key::Enter));
    assert_eq!(p.ticket.kind, ActionKind::Custom);
    assert_eq!(
        p.request.system_prompt,
        resolve_system_prompt(ActionKind::Custom, "my-boss", Some("make it a question"))
    );
    assert_ne!(p.request.system_prompt, crate::config::prompts::CUSTOM_INSTRUCTION_PROMPT);
    assert!(p.request.user_message.contains("<instruction>\nmake it a question\n</instruction>"));
    assert!(p.request.user_message.contains("<text>\ni has a cat\n</text>"));
    assert_eq!(h.page().panel.as_ref().unwrap().persona, "my-boss");
}

#[test]
fn test_actions_need_open_panel() {
    let mut h = Harness::new();
    h.select_sentence();
    assert!(h.send(OverlayEvent::ActionRequested(ActionKind::Grammar)).is_empty());
}

#[test]
fn test_copy_prefers_panel_text() {
    let mut h = Harness::new();
    h.open_panel();
    h.ctrl(Key::Char('k'));
    assert_eq!(h.page().clipboard.as_deref(), Some("i has a cat"));

    h.send(OverlayEvent::PanelTextEdited("I have a cat.".to_string()));
    h.send(OverlayEvent::CopyRequested);
    assert_eq!(h.page().clipboard.as_deref(), Some("I have a cat."));
}

#[test]
fn test_teardown_returns_clean_surface() {
    let mut h = Harness::new();
    h.open_panel();
    let page = h.ctl.teardown();
    assert!(page.panel.is_none());
    assert!(page.trigger.is_none());
    assert!(page.highlight_boxes.is_empty());
}

#[test]
fn test_ranges_released_with_their_snapshot() {
    let mut h = Harness::new();
    h.select_sentence();
    assert_eq!(h.page().live_ranges(), 1);

    h.advance(500);
    h.select("other words", vec![Rect::new(300.0, 400.0, 80.0, 20.0)]);
    assert_eq!(h.page().live_ranges(), 1);

    // whitespace-only selections never keep a range
    h.ctl.surface_mut().select("   ", vec![Rect::new(0.0, 0.0, 10.0, 10.0)]);
    h.send(OverlayEvent::PointerUp { target: EventTarget::Page });
    assert_eq!(h.page().live_ranges(), 0);

    h.advance(500);
    h.open_panel();
    assert_eq!(h.page().live_ranges(), 1);
    h.send(OverlayEvent::CloseRequested);
    assert_eq!(h.page().live_ranges(), 0);
}
