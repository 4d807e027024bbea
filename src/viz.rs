//! Visualization spec envelope
//!
//! A spec is an opaque, producer-defined chart description. Consumers only
//! ever inspect the envelope: `library` must equal `"plotly"` and `data`
//! must be an array. Everything else (`layout`, `config`, trace contents)
//! passes through untouched — chart rendering itself is out of scope.
//!
//! The envelope check is a compiled JSON Schema so the contract is stated
//! declaratively in one place. The adapter never applies it: an invalid
//! spec still travels inside a `viz` message and is treated as absent only
//! at the consumer.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// The only chart library the envelope admits.
pub const PLOTLY_LIBRARY: &str = "plotly";

/// Envelope schema: `library` is the known constant, `data` is a sequence.
/// Deliberately says nothing about `layout`/`config` — those are opaque.
static SPEC_SCHEMA: Lazy<jsonschema::Validator> = Lazy::new(|| {
    let schema = json!({
        "type": "object",
        "required": ["library", "data"],
        "properties": {
            "library": { "const": PLOTLY_LIBRARY },
            "data": { "type": "array" }
        }
    });
    jsonschema::validator_for(&schema).expect("viz envelope schema is valid")
});

/// Consumer-side validity predicate. Any other `library` value or a
/// missing/non-array `data` fails, and the consumer renders the slot empty.
pub fn is_plotly_spec(value: &Value) -> bool {
    SPEC_SCHEMA.is_valid(value)
}

/// Typed view of a valid spec envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotlySpec {
    pub library: String,
    pub data: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
}

impl PlotlySpec {
    /// Parse a raw spec, returning `None` when the envelope is invalid.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !is_plotly_spec(value) {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }

    /// Number of traces in the spec.
    pub fn trace_count(&self) -> usize {
        self.data.len()
    }

    /// Chart title, when the layout carries one.
    pub fn title(&self) -> Option<&str> {
        self.layout.as_ref()?.get("title")?.as_str()
    }
}
