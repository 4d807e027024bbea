//! Dashboard projection state
//!
//! The dashboard owns no stream state — only the last-observed projection:
//! current phase, progress, latest preview, latest validated spec. Messages
//! fold in through `apply`; the stream client remains the sole producer.

use std::collections::VecDeque;
use std::time::Instant;

use crate::exports::ExportsState;
use crate::message::{Phase, StreamMsg, TablePreview};
use crate::types::{SessionId, TemplateId};
use crate::viz::PlotlySpec;

// ─────────────────────────────────────────────────────────────────────────────
// Activity log
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityLevel {
    Info,
    Error,
}

/// One line in the activity panel.
#[derive(Debug, Clone)]
pub struct ActivityEvent {
    pub at: Instant,
    pub level: ActivityLevel,
    pub text: String,
}

impl ActivityEvent {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            at: Instant::now(),
            level: ActivityLevel::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            at: Instant::now(),
            level: ActivityLevel::Error,
            text: text.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Dashboard state
// ─────────────────────────────────────────────────────────────────────────────

/// Main dashboard state.
#[derive(Debug)]
pub struct DashboardState {
    /// Template selected for runs
    pub template_id: TemplateId,

    // Latest-message projection
    pub phase: Phase,
    pub progress: f64,
    pub preview: Option<TablePreview>,
    pub live_spec: Option<PlotlySpec>,
    pub last_error: Option<String>,
    pub session: Option<SessionId>,

    // Notebook exports
    pub exports: ExportsState,

    // Activity log (newest first, bounded)
    pub events: VecDeque<ActivityEvent>,
    pub max_events: usize,

    // Run loop bookkeeping
    pub start_time: Option<Instant>,
    pub should_quit: bool,
}

impl DashboardState {
    pub fn new(template_id: TemplateId) -> Self {
        Self {
            template_id,
            phase: Phase::Idle,
            progress: 0.0,
            preview: None,
            live_spec: None,
            last_error: None,
            session: None,
            exports: ExportsState::default(),
            events: VecDeque::new(),
            max_events: 100,
            start_time: None,
            should_quit: false,
        }
    }

    /// Fold one stream message into the projection.
    pub fn apply(&mut self, msg: StreamMsg) {
        let entry = if msg.is_error() {
            ActivityEvent::error(msg.description())
        } else {
            ActivityEvent::info(msg.description())
        };
        self.push_event(entry);

        match msg {
            StreamMsg::Status { phase, progress } => {
                self.phase = phase;
                if let Some(p) = progress {
                    self.progress = p;
                }
            }
            StreamMsg::Table { preview } => {
                self.preview = Some(preview);
            }
            StreamMsg::Viz { spec } => {
                // Consumer-side validity check: an unrenderable payload
                // leaves the slot empty, silently.
                self.live_spec = PlotlySpec::from_value(&spec);
            }
            StreamMsg::Error { message } => {
                // Terminal until a manual re-run.
                self.phase = Phase::Error;
                self.last_error = Some(message);
            }
        }
    }

    /// Optimistic local update when a run is started, before the first
    /// status message lands.
    pub fn on_run(&mut self) {
        self.phase = Phase::Running;
        self.progress = 5.0;
        self.preview = None;
        self.live_spec = None;
        self.last_error = None;
        self.start_time = Some(Instant::now());
        self.push_event(ActivityEvent::info(format!(
            "Run started: {}",
            self.template_id
        )));
    }

    /// Back to idle. The exports-loaded preview survives a reset; only the
    /// live run projection is cleared.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.progress = 0.0;
        self.live_spec = None;
        self.last_error = None;
        self.start_time = None;
        self.preview = self.exports.preview;
        self.push_event(ActivityEvent::info("Reset"));
    }

    /// Install a refreshed exports state; adopts its preview when no live
    /// run has produced one.
    pub fn set_exports(&mut self, exports: ExportsState) {
        if self.preview.is_none() {
            self.preview = exports.preview;
        }
        self.push_event(ActivityEvent::info(format!(
            "Exports refreshed: {} figure(s)",
            exports.loaded_figures()
        )));
        self.exports = exports;
    }

    /// Add an activity event, newest first, dropping the oldest past cap.
    pub fn push_event(&mut self, event: ActivityEvent) {
        self.events.push_front(event);
        if self.events.len() > self.max_events {
            self.events.pop_back();
        }
    }
}
