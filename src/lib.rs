//! Dapdash - terminal dashboard POC for data-analysis notebook streams

pub mod adapter;
pub mod catalog;
pub mod dashboard;
pub mod error;
pub mod exports;
pub mod message;
pub mod request;
pub mod stream;
pub mod types;
pub mod viz;

pub use adapter::adapt;
pub use error::{DashError, FixSuggestion};
pub use exports::{ExportsState, FigureSlot};
pub use message::{Phase, StreamMsg, TablePreview};
pub use request::{ExecuteRequest, ResourceRequest};
pub use stream::{
    make_stream_client, BackendClient, MessageCallback, MockStreamClient, StreamClient, StreamMode,
};
pub use types::{SessionId, TemplateId};
pub use viz::{is_plotly_spec, PlotlySpec};
