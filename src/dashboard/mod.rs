//! Terminal dashboard
//!
//! Stateless rendering driven by the latest received message of each kind.
//! The dashboard owns only the projection in `state`; the stream client
//! owns the timeline.

pub mod app;
pub mod events;
pub mod state;
pub mod theme;

pub use app::DashboardApp;
pub use state::DashboardState;
