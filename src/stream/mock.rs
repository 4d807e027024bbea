//! Mock stream client
//!
//! Fabricates a fixed five-step timeline via deferred emissions. Fixture
//! data for UI development, not a real scheduling policy.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use super::timeline::Timeline;
use super::{MessageCallback, StreamClient};
use crate::error::DashError;
use crate::message::{Phase, StreamMsg, TablePreview};
use crate::request::ExecuteRequest;
use crate::types::SessionId;

/// Relative emission offsets of the demo timeline, in ms.
const TIMELINE_OFFSETS_MS: [u64; 5] = [0, 900, 1600, 1800, 2600];

/// Preview summary the demo table step reports.
const DEMO_PREVIEW: TablePreview = TablePreview { rows: 120, cols: 14 };

/// Mock stream client emitting the fixed demo timeline.
pub struct MockStreamClient {
    inner: Arc<Inner>,
}

struct Inner {
    callback: Mutex<Option<MessageCallback>>,
    timeline: Mutex<Timeline>,
    session: Mutex<Option<SessionId>>,
    closed: AtomicBool,
}

impl Inner {
    fn deliver(&self, msg: StreamMsg) {
        let cb = self.callback.lock().unwrap().clone();
        if let Some(cb) = cb {
            cb(msg);
        }
    }
}

impl MockStreamClient {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                callback: Mutex::new(None),
                timeline: Mutex::new(Timeline::new()),
                session: Mutex::new(None),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Demo stacked-bar spec, titled after the requested template. Must
    /// satisfy `viz::is_plotly_spec` so the live slot actually renders.
    fn demo_spec(request: &ExecuteRequest) -> Value {
        json!({
            "library": "plotly",
            "data": [
                { "type": "bar", "x": ["A", "B", "C"], "y": [2, 5, 3], "name": "Group 1" },
                { "type": "bar", "x": ["A", "B", "C"], "y": [4, 1, 2], "name": "Group 2" },
            ],
            "layout": {
                "barmode": "stack",
                "title": format!("{} (demo)", request.template_id),
                "margin": { "t": 32, "r": 16, "b": 40, "l": 40 },
                "height": 380,
            },
            "config": { "displayModeBar": false, "responsive": true },
        })
    }

    /// The fixed five-step timeline:
    /// running 5% → table preview → processing 60% → viz → done 100%.
    fn timeline_steps(request: &ExecuteRequest) -> Vec<(Duration, StreamMsg)> {
        let messages = [
            StreamMsg::Status { phase: Phase::Running, progress: Some(5.0) },
            StreamMsg::Table { preview: DEMO_PREVIEW },
            StreamMsg::Status { phase: Phase::Processing, progress: Some(60.0) },
            StreamMsg::Viz { spec: Self::demo_spec(request) },
            StreamMsg::Status { phase: Phase::Done, progress: Some(100.0) },
        ];
        TIMELINE_OFFSETS_MS
            .into_iter()
            .map(Duration::from_millis)
            .zip(messages)
            .collect()
    }
}

impl Default for MockStreamClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StreamClient for MockStreamClient {
    fn on_message(&self, cb: MessageCallback) {
        if self.inner.closed.load(Ordering::SeqCst) {
            return;
        }
        *self.inner.callback.lock().unwrap() = Some(cb);
    }

    async fn connect(&self) -> Result<(), DashError> {
        if self.inner.closed.load(Ordering::SeqCst) {
            return Err(DashError::ClientClosed);
        }
        Ok(())
    }

    async fn execute(&self, request: ExecuteRequest) -> Result<(), DashError> {
        if self.inner.closed.load(Ordering::SeqCst) {
            return Err(DashError::ClientClosed);
        }

        let session = SessionId::mint("mock");
        debug!(session = %session, template = %request.template_id, "mock execute");
        *self.inner.session.lock().unwrap() = Some(session);

        // Cancel-then-schedule under one lock: the prior generation is
        // invalidated before any new emission exists.
        let mut timeline = self.inner.timeline.lock().unwrap();
        timeline.cancel_all();
        for (delay, msg) in Self::timeline_steps(&request) {
            let inner = Arc::clone(&self.inner);
            timeline.schedule(delay, move || inner.deliver(msg));
        }

        Ok(())
    }

    fn simulate_error(&self) {
        self.inner.timeline.lock().unwrap().cancel_all();
        self.inner.deliver(StreamMsg::Error {
            message: "Simulated error from mock client.".to_string(),
        });
    }

    fn cancel(&self) {
        self.inner.timeline.lock().unwrap().cancel_all();
    }

    fn close(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
        self.inner.timeline.lock().unwrap().cancel_all();
        *self.inner.callback.lock().unwrap() = None;
    }

    fn session_id(&self) -> Option<SessionId> {
        self.inner.session.lock().unwrap().clone()
    }
}
