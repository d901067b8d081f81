//! # Event Bus Module
//!
//! Publish/subscribe channel for the engine's side-channel notifications
//! (audio cues, status line updates, diagnostics). Publishers emit typed
//! events without knowing who listens; subscribers filter by category.
//! Events are strictly best-effort: the engine never waits on delivery and
//! no model state depends on a subscriber being present.

mod bus;
mod events;

pub use bus::*;
pub use events::*;
