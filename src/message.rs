//! Stream message model
//!
//! The closed set of four event shapes exchanged between a stream client
//! (producer) and the dashboard (consumer). Serializes to the same wire
//! shape the adapter consumes: `{"type": "status", ...}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ─────────────────────────────────────────────────────────────────────────────
// Phase
// ─────────────────────────────────────────────────────────────────────────────

/// Execution lifecycle stage shown to the user.
///
/// `Idle` is dashboard-initial only: the adapter never produces it, and an
/// unknown inbound phase normalizes to `Running` (see `adapter::adapt`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
    Processing,
    Done,
    Error,
}

impl Phase {
    /// A run is in flight (messages may still arrive).
    pub fn is_executing(&self) -> bool {
        matches!(self, Self::Running | Self::Processing)
    }

    /// No further messages will arrive without a new execute.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "IDLE"),
            Self::Running => write!(f, "RUNNING"),
            Self::Processing => write!(f, "PROCESSING"),
            Self::Done => write!(f, "DONE"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Table preview
// ─────────────────────────────────────────────────────────────────────────────

/// Row/column count summary of tabular data, not the data itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablePreview {
    pub rows: u64,
    pub cols: u64,
}

impl TablePreview {
    pub fn new(rows: u64, cols: u64) -> Self {
        Self { rows, cols }
    }
}

impl std::fmt::Display for TablePreview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} rows x {} cols", self.rows, self.cols)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Stream message
// ─────────────────────────────────────────────────────────────────────────────

/// One event from a stream client. Exactly one variant tag per message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamMsg {
    /// Execution lifecycle update. `progress` is passed through as received
    /// (no clamping to [0, 100], no monotonicity check).
    Status {
        phase: Phase,
        #[serde(skip_serializing_if = "Option::is_none")]
        progress: Option<f64>,
    },
    /// A renderable visualization became available. The spec is opaque here;
    /// consumers apply `viz::is_plotly_spec` before trusting it.
    Viz { spec: Value },
    /// A tabular preview summary.
    Table { preview: TablePreview },
    /// A terminal failure with user-facing text.
    Error { message: String },
}

impl StreamMsg {
    /// Short description for the activity log.
    pub fn description(&self) -> String {
        match self {
            Self::Status { phase, progress } => match progress {
                Some(p) => format!("Status: {} ({:.0}%)", phase, p),
                None => format!("Status: {}", phase),
            },
            Self::Viz { .. } => "Visualization received".to_string(),
            Self::Table { preview } => format!("Table preview: {}", preview),
            Self::Error { message } => format!("Error: {}", message),
        }
    }

    /// True for the `error` variant.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Progress value, if this is a status message carrying one.
    pub fn progress(&self) -> Option<f64> {
        match self {
            Self::Status { progress, .. } => *progress,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_serializes_to_wire_shape() {
        let msg = StreamMsg::Status {
            phase: Phase::Running,
            progress: Some(5.0),
        };
        let wire = serde_json::to_value(&msg).unwrap();
        assert_eq!(wire, json!({"type": "status", "phase": "running", "progress": 5.0}));
    }

    #[test]
    fn status_without_progress_omits_field() {
        let msg = StreamMsg::Status {
            phase: Phase::Done,
            progress: None,
        };
        let wire = serde_json::to_value(&msg).unwrap();
        assert_eq!(wire, json!({"type": "status", "phase": "done"}));
    }

    #[test]
    fn table_round_trips() {
        let msg = StreamMsg::Table {
            preview: TablePreview::new(120, 14),
        };
        let wire = serde_json::to_string(&msg).unwrap();
        let back: StreamMsg = serde_json::from_str(&wire).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn phase_display_is_uppercase() {
        assert_eq!(Phase::Processing.to_string(), "PROCESSING");
        assert!(Phase::Processing.is_executing());
        assert!(Phase::Error.is_terminal());
        assert!(!Phase::Idle.is_terminal());
    }
}
