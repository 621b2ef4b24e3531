//! Scripted sessions against a [`HeadlessPage`].
//!
//! A script is JSON lines, one step per line (`#` starts a comment):
//!
//! ```text
//! {"step":"select","text":"i has a cat","rects":[[100,200,150,20]]}
//! {"step":"pointer_up"}
//! {"step":"click","target":"trigger"}
//! {"step":"wait","ms":150}
//! {"step":"action","kind":"grammar"}
//! {"step":"wait","ms":10}
//! ```
//!
//! Completions run on a worker thread. `wait` first delivers any pending
//! animation frame, then blocks until every in-flight completion has been fed
//! back, then advances the clock.

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::api::CompletionBackend;
use crate::config::prompts::ActionKind;
use crate::config::Config;
use crate::overlay::{
    Command, EventTarget, HeadlessPage, Key, Modifiers, MoveDirection, OverlayController,
    OverlayEvent, PendingCompletion, Rect, Viewport,
};

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// Replace the live selection. Rects are `[left, top, width, height]` in
    /// document coordinates.
    Select { text: String, rects: Vec<[f64; 4]> },
    Clear,
    PointerUp {
        #[serde(default)]
        target: EventTarget,
    },
    Click {
        #[serde(default)]
        target: EventTarget,
    },
    Key {
        key: String,
        #[serde(default)]
        ctrl: bool,
        #[serde(default)]
        meta: bool,
    },
    Scroll {
        #[serde(default)]
        dx: f64,
        dy: f64,
    },
    Resize { width: f64, height: f64 },
    Frame,
    Wait { ms: u64 },
    Action { kind: ActionKind },
    Custom,
    Edit { text: String },
    Persona { id: String },
    Copy,
    Close,
    Reload { api_key_present: bool },
}

/// Parse a JSON-lines script. Blank lines and `#` comments are skipped.
pub fn parse_script(source: &str) -> Result<Vec<Step>> {
    let mut steps = Vec::new();
    for (idx, line) in source.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let step = serde_json::from_str(line)
            .with_context(|| format!("Invalid step on line {}", idx + 1))?;
        steps.push(step);
    }
    Ok(steps)
}

pub fn parse_key(name: &str) -> Result<Key> {
    let key = match name {
        "Escape" | "Esc" => Key::Escape,
        "Enter" => Key::Enter,
        "ArrowUp" => Key::Arrow(MoveDirection::Up),
        "ArrowDown" => Key::Arrow(MoveDirection::Down),
        "ArrowLeft" => Key::Arrow(MoveDirection::Left),
        "ArrowRight" => Key::Arrow(MoveDirection::Right),
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Key::Char(c),
                _ => bail!("Unknown key: {}", other),
            }
        }
    };
    Ok(key)
}

/// Runs completions off the event loop and hands results back as events.
pub struct CompletionWorker {
    jobs: Sender<PendingCompletion>,
    results: Receiver<OverlayEvent>,
}

impl CompletionWorker {
    pub fn spawn(backend: Arc<dyn CompletionBackend>) -> Self {
        let (jobs, job_rx) = channel::<PendingCompletion>();
        let (result_tx, results) = channel();

        thread::spawn(move || {
            for job in job_rx {
                let outcome = backend.complete(&job.request);
                let event = OverlayEvent::CompletionFinished {
                    ticket: job.ticket,
                    outcome,
                };
                if result_tx.send(event).is_err() {
                    break;
                }
            }
        });

        Self { jobs, results }
    }

    pub fn submit(&self, job: PendingCompletion) -> Result<()> {
        self.jobs
            .send(job)
            .context("Completion worker stopped")
    }

    /// Block for the next finished completion.
    pub fn recv(&self) -> Result<OverlayEvent> {
        self.results.recv().context("Completion worker stopped")
    }
}

pub struct Replay {
    controller: OverlayController<HeadlessPage>,
    worker: CompletionWorker,
    clock: Instant,
    frame_requested: bool,
    in_flight: usize,
}

impl Replay {
    pub fn new(viewport: Viewport, config: &Config, backend: Arc<dyn CompletionBackend>) -> Self {
        Self {
            controller: OverlayController::init(HeadlessPage::new(viewport), config),
            worker: CompletionWorker::spawn(backend),
            clock: Instant::now(),
            frame_requested: false,
            in_flight: 0,
        }
    }

    pub fn controller(&self) -> &OverlayController<HeadlessPage> {
        &self.controller
    }

    pub fn run(&mut self, steps: &[Step]) -> Result<()> {
        for (idx, step) in steps.iter().enumerate() {
            tracing::debug!(step = idx + 1, ?step, "replay");
            self.apply(step)
                .with_context(|| format!("Step {} failed", idx + 1))?;
        }
        self.settle()
    }

    /// Tear the overlay down and return the final page.
    pub fn finish(mut self) -> Result<HeadlessPage> {
        self.settle()?;
        Ok(self.controller.teardown())
    }

    fn apply(&mut self, step: &Step) -> Result<()> {
        let event = match step {
            Step::Select { text, rects } => {
                let fragments = rects
                    .iter()
                    .map(|[left, top, w, h]| Rect::new(*left, *top, *w, *h))
                    .collect();
                self.controller.surface_mut().select(text, fragments);
                return Ok(());
            }
            Step::Clear => {
                self.controller.surface_mut().clear_selection();
                return Ok(());
            }
            Step::PointerUp { target } => OverlayEvent::PointerUp { target: *target },
            Step::Click { target } => OverlayEvent::Click { target: *target },
            Step::Key { key, ctrl, meta } => OverlayEvent::KeyDown {
                key: parse_key(key)?,
                modifiers: Modifiers {
                    ctrl: *ctrl,
                    meta: *meta,
                },
            },
            Step::Scroll { dx, dy } => {
                self.controller.surface_mut().scroll_by(*dx, *dy);
                OverlayEvent::Scroll
            }
            Step::Resize { width, height } => {
                self.controller.surface_mut().resize(Viewport {
                    width: *width,
                    height: *height,
                });
                OverlayEvent::Resize
            }
            Step::Frame => {
                self.deliver_frame()?;
                return Ok(());
            }
            Step::Wait { ms } => {
                self.settle()?;
                self.clock += Duration::from_millis(*ms);
                OverlayEvent::Tick
            }
            Step::Action { kind } => OverlayEvent::ActionRequested(*kind),
            Step::Custom => OverlayEvent::CustomPromptSubmitted,
            Step::Edit { text } => OverlayEvent::PanelTextEdited(text.clone()),
            Step::Persona { id } => OverlayEvent::PersonaSelected(id.clone()),
            Step::Copy => OverlayEvent::CopyRequested,
            Step::Close => OverlayEvent::CloseRequested,
            Step::Reload { api_key_present } => OverlayEvent::SettingsReloaded {
                api_key_present: *api_key_present,
            },
        };
        self.dispatch(event)
    }

    fn dispatch(&mut self, event: OverlayEvent) -> Result<()> {
        for command in self.controller.handle(event, self.clock) {
            match command {
                Command::RequestFrame => self.frame_requested = true,
                Command::Complete(job) => {
                    self.worker.submit(job)?;
                    self.in_flight += 1;
                }
            }
        }
        Ok(())
    }

    fn deliver_frame(&mut self) -> Result<()> {
        if std::mem::take(&mut self.frame_requested) {
            self.dispatch(OverlayEvent::AnimationFrame)?;
        }
        Ok(())
    }

    fn settle(&mut self) -> Result<()> {
        self.deliver_frame()?;
        while self.in_flight > 0 {
            let event = self.worker.recv()?;
            self.in_flight -= 1;
            self.dispatch(event)?;
        }
        Ok(())
    }
}
