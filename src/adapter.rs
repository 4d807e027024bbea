//! Inbound event normalization
//!
//! Converts an arbitrary, possibly malformed inbound record into a valid
//! `StreamMsg` or signals "ignore" with `None`. If a backend ever uses
//! different field names, change only here.
//!
//! Normalization rules:
//! - non-object input, or a missing/unknown `type` discriminant → dropped
//! - `status`: unknown or missing phase defaults to `running` (never
//!   `idle`); `progress` passes through only when already numeric
//! - `viz`: the raw spec passes through unvalidated — the envelope check
//!   belongs to the consumer, not the adapter
//! - `table`: preview accepted under `dfPreview` (legacy) or `preview`;
//!   counts coerced via numeric parsing, 0 on failure
//! - `error`: message text only when already a string, else a generic
//!   fallback

use serde_json::Value;
use tracing::debug;

use crate::message::{Phase, StreamMsg, TablePreview};

/// Fallback text for an `error` event with no usable message.
const FALLBACK_ERROR_TEXT: &str = "Error";

/// Normalize any incoming event into a `StreamMsg`. Pure function.
pub fn adapt(incoming: &Value) -> Option<StreamMsg> {
    let rec = match incoming.as_object() {
        Some(rec) => rec,
        None => return None,
    };

    match rec.get("type").and_then(Value::as_str) {
        Some("status") => {
            let phase = match rec.get("phase").and_then(Value::as_str) {
                Some("running") => Phase::Running,
                Some("processing") => Phase::Processing,
                Some("done") => Phase::Done,
                Some("error") => Phase::Error,
                other => {
                    debug!(phase = ?other, "unknown status phase, defaulting to running");
                    Phase::Running
                }
            };
            let progress = rec.get("progress").and_then(Value::as_f64);
            Some(StreamMsg::Status { phase, progress })
        }
        Some("viz") => Some(StreamMsg::Viz {
            spec: rec.get("spec").cloned().unwrap_or(Value::Null),
        }),
        Some("table") => {
            // Legacy name first, current name second.
            let raw = rec
                .get("dfPreview")
                .or_else(|| rec.get("preview"))
                .and_then(Value::as_object);
            let preview = match raw {
                Some(p) => TablePreview::new(
                    coerce_count(p.get("rows")),
                    coerce_count(p.get("cols")),
                ),
                None => TablePreview::default(),
            };
            Some(StreamMsg::Table { preview })
        }
        Some("error") => {
            let message = rec
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or(FALLBACK_ERROR_TEXT)
                .to_string();
            Some(StreamMsg::Error { message })
        }
        other => {
            debug!(event_type = ?other, "unknown event type, dropping");
            None
        }
    }
}

/// Coerce a row/column count to a non-negative integer. Numbers are taken
/// as-is, strings go through numeric parsing; anything else — and negative
/// or non-finite results — falls back to 0.
fn coerce_count(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && *f >= 0.0)
            .map(|f| f as u64)
            .unwrap_or(0),
        _ => 0,
    }
}
