//! Stream client abstraction
//!
//! An executable, cancellable, observable unit of work that emits a
//! sequence of `StreamMsg` over time. One shared contract, swappable
//! implementations selected at construction time: `MockStreamClient`
//! fabricates a fixed timeline for UI development, `BackendClient` is the
//! placeholder for a real backend connection.

mod backend;
mod mock;
pub mod timeline;

pub use backend::BackendClient;
pub use mock::MockStreamClient;

use std::sync::Arc;

use async_trait::async_trait;
use clap::ValueEnum;

use crate::error::DashError;
use crate::message::StreamMsg;
use crate::request::ExecuteRequest;
use crate::types::SessionId;

/// The single registered message consumer. Invoked from timer tasks, so it
/// must be shareable and thread-safe.
pub type MessageCallback = Arc<dyn Fn(StreamMsg) + Send + Sync>;

// ─────────────────────────────────────────────────────────────────────────────
// Stream Client Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Capability set every stream client satisfies.
///
/// Lifecycle per instance: idle → executing → {completed, errored,
/// cancelled}, with closed reachable from any state as a terminal absorbing
/// state. `execute` re-enters from any non-closed state and implicitly
/// cancels the prior run first — two overlapping timelines are never both
/// active. All methods are expected to be invoked from the same
/// single-threaded caller context.
#[async_trait]
pub trait StreamClient: Send + Sync {
    /// Install the single active message consumer, replacing any previous
    /// one. At most one observer at a time — this is not a broadcast.
    fn on_message(&self, cb: MessageCallback);

    /// Establish whatever session/connection is needed before `execute`.
    /// May be a no-op.
    async fn connect(&self) -> Result<(), DashError>;

    /// Start a new unit of work: cancel any in-flight timeline, mint a new
    /// session id, then begin emitting messages to the registered callback
    /// per this client's timeline policy.
    async fn execute(&self, request: ExecuteRequest) -> Result<(), DashError>;

    /// Cancel in-flight work and synchronously emit a single `error`
    /// message. Fault-injection hook for UI development.
    fn simulate_error(&self);

    /// Stop any scheduled-but-unfired emissions without notifying the
    /// callback. Idempotent; safe to call when nothing is in flight.
    fn cancel(&self);

    /// Cancel in-flight work and detach the callback permanently. The
    /// client is not reusable afterwards.
    fn close(&self);

    /// Current session identifier, or `None` before the first execute.
    fn session_id(&self) -> Option<SessionId>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Construction-time selection
// ─────────────────────────────────────────────────────────────────────────────

/// Environment variable consulted when no `--mode` flag is given.
pub const STREAM_MODE_ENV: &str = "DAPDASH_STREAM_MODE";

/// Which client implementation to construct.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum StreamMode {
    /// Fixed five-step demo timeline
    #[default]
    Mock,
    /// Placeholder for the real backend connection
    Backend,
}

impl std::fmt::Display for StreamMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mock => write!(f, "mock"),
            Self::Backend => write!(f, "backend"),
        }
    }
}

/// Construct the client for the given mode.
pub fn make_stream_client(mode: StreamMode) -> Box<dyn StreamClient> {
    match mode {
        StreamMode::Mock => Box::new(MockStreamClient::new()),
        StreamMode::Backend => Box::new(BackendClient::new()),
    }
}
